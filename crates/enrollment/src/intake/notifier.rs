use tracing::{debug, info, warn};

use super::domain::EnrollmentRecord;

/// Shape of the outbound mail capability the notifier needs.
pub trait MailTransport: Send + Sync {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotificationError>;
}

/// Best-effort announcement of a freshly stored enrollment.
///
/// Infallible by signature: implementations log their own failures, so the
/// outcome of a submission is settled before `notify` runs.
pub trait Notifier: Send + Sync {
    fn notify(&self, record: &EnrollmentRecord);
}

/// Notification dispatch error. Never surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("invalid mailbox '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("failed to build notification message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
}

/// E-mails the program administrator once per enrollment.
#[derive(Debug)]
pub struct AdminNotifier<T> {
    transport: T,
    recipient: String,
}

impl<T: MailTransport> AdminNotifier<T> {
    pub fn new(transport: T, recipient: impl Into<String>) -> Self {
        Self {
            transport,
            recipient: recipient.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: MailTransport> Notifier for AdminNotifier<T> {
    fn notify(&self, record: &EnrollmentRecord) {
        let subject = notification_subject(record);
        let body = render_notification(record);

        match self.transport.send(&self.recipient, &subject, &body) {
            Ok(()) => info!(enrollment_id = %record.id, "enrollment notification sent"),
            Err(error) => warn!(
                enrollment_id = %record.id,
                error = %error,
                "enrollment notification failed; record kept"
            ),
        }
    }
}

/// Stand-in used when mail settings are incomplete.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn notify(&self, record: &EnrollmentRecord) {
        debug!(enrollment_id = %record.id, "mail notifications disabled; skipping");
    }
}

pub fn notification_subject(record: &EnrollmentRecord) -> String {
    format!("New enrollment: {}", escape_html(&record.child_name))
}

/// HTML body for the administrator. Caller-supplied text is escaped;
/// id, dates and age are server-produced and rendered as-is.
pub fn render_notification(record: &EnrollmentRecord) -> String {
    let message = match record.message.as_deref() {
        Some(message) => escape_html(message).replace('\n', "<br>"),
        None => "<em>(none)</em>".to_string(),
    };

    format!(
        "<h2>New enrollment submission</h2>\n\
         <table>\n\
         <tr><th align=\"left\">Enrollment ID</th><td>{id}</td></tr>\n\
         <tr><th align=\"left\">Parent name</th><td>{parent_name}</td></tr>\n\
         <tr><th align=\"left\">Child name</th><td>{child_name}</td></tr>\n\
         <tr><th align=\"left\">Date of birth</th><td>{dob}</td></tr>\n\
         <tr><th align=\"left\">Age</th><td>{age}</td></tr>\n\
         <tr><th align=\"left\">Gender</th><td>{gender}</td></tr>\n\
         <tr><th align=\"left\">Email</th><td>{email}</td></tr>\n\
         <tr><th align=\"left\">Phone number</th><td>{phone_number}</td></tr>\n\
         <tr><th align=\"left\">Message</th><td>{message}</td></tr>\n\
         <tr><th align=\"left\">Submitted at</th><td>{created_at} UTC</td></tr>\n\
         </table>\n",
        id = record.id,
        parent_name = escape_html(&record.parent_name),
        child_name = escape_html(&record.child_name),
        dob = record.dob.format("%Y-%m-%d"),
        age = record.age,
        gender = escape_html(&record.gender),
        email = escape_html(&record.email),
        phone_number = escape_html(&record.phone_number),
        message = message,
        created_at = record.created_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }
}
