use std::io;

use super::domain::EnrollmentRecord;

/// Write enrollments as CSV with a header row, one record per line.
pub fn write_csv<W: io::Write>(records: &[EnrollmentRecord], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "id",
        "parent_name",
        "child_name",
        "dob",
        "age",
        "gender",
        "email",
        "phone_number",
        "message",
        "created_at",
    ])?;

    for record in records {
        writer.write_record([
            record.id.to_string(),
            record.parent_name.clone(),
            record.child_name.clone(),
            record.dob.format("%Y-%m-%d").to_string(),
            record.age.to_string(),
            record.gender.clone(),
            record.email.clone(),
            record.phone_number.clone(),
            record.message.clone().unwrap_or_default(),
            record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
