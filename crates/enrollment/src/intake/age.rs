use chrono::{Datelike, NaiveDate};

/// Whole years between `dob` and `today`, dropping one year when this year's
/// birthday is still ahead. A Feb 29 birthday counts as reached on Mar 1 in
/// common years. Never negative: a `dob` after `today` yields zero.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> u32 {
    if dob > today {
        return 0;
    }

    let birthday_pending = (today.month(), today.day()) < (dob.month(), dob.day());
    let years = today.year() - dob.year() - i32::from(birthday_pending);
    u32::try_from(years).unwrap_or(0)
}
