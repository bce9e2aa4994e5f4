use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};

use super::notifier::{MailTransport, NotificationError};
use crate::config::MailConfig;

/// Port on which relays expect TLS from the first byte instead of STARTTLS.
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP relay with TLS and credential authentication.
///
/// Building the transport does not connect; each `send` opens, uses and
/// closes its own session.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, NotificationError> {
        let from = parse_mailbox(&config.from)?;

        let builder = if config.port == IMPLICIT_TLS_PORT {
            SmtpTransport::relay(&config.host)?
        } else {
            SmtpTransport::starttls_relay(&config.host)?
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();

        Ok(Self { transport, from })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotificationError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(to)?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        self.transport.send(&message)?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse::<Mailbox>()
        .map_err(|source| NotificationError::Address {
            address: address.to_string(),
            source,
        })
}
