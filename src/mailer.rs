use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::warn;

use crate::config::Config;

/// SMTPS port; anything else negotiates STARTTLS when the server offers it.
const IMPLICIT_TLS_PORT: u16 = 465;

/// One department report, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub cc: Vec<String>,
    pub html_body: String,
}

#[async_trait]
pub trait Notifier {
    async fn send(&self, mail: &Mail) -> Result<()>;
}

pub struct SmtpNotifier {
    from: Mailbox,
    subject: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(config: &Config) -> Result<Self> {
        let tls_parameters = TlsParameters::builder(config.mail_host.clone())
            .dangerous_accept_invalid_certs(config.mail_accept_invalid_certs)
            .build()
            .context("Error when build TLS parameters for mail")?;

        let tls = if config.mail_port == IMPLICIT_TLS_PORT {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.mail_host)
            .port(config.mail_port)
            .credentials(Credentials::new(
                config.mail_user.clone(),
                config.mail_pass.clone(),
            ))
            .tls(tls)
            .build();

        let from = config
            .mail_user
            .parse()
            .with_context(|| format!("Invalid MAIL_USER address: {}", config.mail_user))?;

        Ok(Self {
            from,
            subject: config.mail_subject.clone(),
            transport,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, mail: &Mail) -> Result<()> {
        let message = build_message(&self.from, &self.subject, mail)?;

        self.transport
            .send(message)
            .await
            .with_context(|| format!("Error when send mail to {}", mail.to))?;

        Ok(())
    }
}

/// Builds the HTML message. A malformed Cc address is skipped, a malformed To
/// address fails the whole message.
pub fn build_message(from: &Mailbox, subject: &str, mail: &Mail) -> Result<Message> {
    let to: Mailbox = mail
        .to
        .parse()
        .with_context(|| format!("Invalid recipient address: {}", mail.to))?;

    let mut builder = Message::builder()
        .from(from.clone())
        .to(to)
        .subject(subject);

    for cc in &mail.cc {
        match cc.parse::<Mailbox>() {
            Ok(mailbox) => builder = builder.cc(mailbox),
            Err(e) => warn!(address = %cc, error = %e, "Skipping invalid cc address"),
        }
    }

    builder
        .header(ContentType::TEXT_HTML)
        .body(mail.html_body.clone())
        .context("Error when build mail message")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(mail: &Mail) -> Result<String> {
        let from: Mailbox = "alerts@corp.test".parse().unwrap();
        let message = build_message(&from, "Attendance report", mail)?;
        Ok(String::from_utf8(message.formatted()).unwrap())
    }

    fn mail(cc: &[&str]) -> Mail {
        Mail {
            to: "boss@corp.test".to_string(),
            cc: cc.iter().map(|c| c.to_string()).collect(),
            html_body: "<p>late: 2</p>".to_string(),
        }
    }

    #[test]
    fn message_addresses_manager_and_copies_team() {
        let raw = render(&mail(&["a@corp.test", "b@corp.test"])).unwrap();

        assert!(raw.contains("From: alerts@corp.test"));
        assert!(raw.contains("To: boss@corp.test"));
        assert!(raw.contains("Cc: a@corp.test, b@corp.test"));
        assert!(raw.contains("Subject: Attendance report"));
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("<p>late: 2</p>"));
    }

    #[test]
    fn cc_header_is_omitted_when_nobody_is_copied() {
        let raw = render(&mail(&[])).unwrap();
        assert!(!raw.contains("Cc:"));
    }

    #[test]
    fn invalid_cc_is_skipped() {
        let raw = render(&mail(&["not an address", "b@corp.test"])).unwrap();
        assert!(raw.contains("Cc: b@corp.test"));
        assert!(!raw.contains("not an address"));
    }

    #[test]
    fn invalid_recipient_fails() {
        let mut broken = mail(&[]);
        broken.to = "nobody".to_string();
        assert!(render(&broken).is_err());
    }
}
