//! High-level mailer interface.

use std::sync::Arc;

use crate::{Address, Email, Result, SentEmail, SmtpConfig, SmtpTransport, Transport};

/// Mailer configuration.
#[derive(Debug, Clone, Default)]
pub struct MailerConfig {
    /// Default from address, applied when an email doesn't set one.
    pub default_from: Option<Address>,
    /// Default reply-to address, applied when an email doesn't set one.
    pub default_reply_to: Option<Address>,
}

impl MailerConfig {
    /// Set the default from address.
    pub fn from(mut self, from: &str) -> Result<Self> {
        self.default_from = Some(Address::parse(from)?);
        Ok(self)
    }

    /// Set the default reply-to address.
    pub fn reply_to(mut self, reply_to: &str) -> Result<Self> {
        self.default_reply_to = Some(Address::parse(reply_to)?);
        Ok(self)
    }
}

/// High-level mailer for sending emails through a single [`Transport`].
///
/// Transport-failure retries are the caller's responsibility (the delay
/// queue owns backoff and retry-limit bookkeeping); this type just applies
/// defaults and forwards to the transport once.
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn Transport>,
    config: MailerConfig,
}

impl Mailer {
    /// Create a new mailer with an SMTP transport.
    pub async fn smtp(smtp_config: SmtpConfig) -> Result<Self> {
        let transport = SmtpTransport::new(smtp_config).await?;
        Ok(Self {
            transport: Arc::new(transport),
            config: MailerConfig::default(),
        })
    }

    /// Create a new mailer with a custom transport.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            config: MailerConfig::default(),
        }
    }

    /// Set the mailer configuration.
    pub fn with_config(mut self, config: MailerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default from address.
    pub fn default_from(mut self, from: &str) -> Result<Self> {
        self.config.default_from = Some(Address::parse(from)?);
        Ok(self)
    }

    /// Send an email, applying configured defaults first.
    pub async fn send(&self, email: Email) -> Result<SentEmail> {
        let email = self.apply_defaults(email);
        self.transport.send(&email).await
    }

    /// Check if the transport is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.transport.is_healthy().await
    }

    fn apply_defaults(&self, mut email: Email) -> Email {
        if email.from.is_none() {
            email.from = self.config.default_from.clone();
        }
        if email.reply_to.is_none() {
            email.reply_to = self.config.default_reply_to.clone();
        }
        email
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MailError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockTransport {
        sent: Mutex<Vec<Email>>,
        healthy: bool,
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, email: &Email) -> Result<SentEmail> {
            if email.subject.as_deref() == Some("reject me") {
                return Err(MailError::Smtp("rejected".into()));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(SentEmail {
                message_id: "mock-id@outbox".to_string(),
                preview_url: Some("https://mock.example/preview".to_string()),
            })
        }

        async fn is_healthy(&self) -> bool {
            self.healthy
        }
    }

    #[tokio::test]
    async fn send_applies_default_from_when_email_has_none() {
        let mock = MockTransport {
            sent: Mutex::new(Vec::new()),
            healthy: true,
        };
        let mailer = Mailer::new(mock)
            .default_from("default@example.com")
            .unwrap();

        let email = Email::new().to("recipient@example.com").subject("Hi").text("hello");
        let sent = mailer.send(email).await.unwrap();
        assert_eq!(sent.message_id, "mock-id@outbox");
    }

    #[tokio::test]
    async fn send_propagates_transport_errors() {
        let mock = MockTransport {
            sent: Mutex::new(Vec::new()),
            healthy: true,
        };
        let mailer = Mailer::new(mock).default_from("default@example.com").unwrap();

        let email = Email::new()
            .to("recipient@example.com")
            .subject("reject me")
            .text("hello");

        assert!(mailer.send(email).await.is_err());
    }

    #[tokio::test]
    async fn is_healthy_reflects_transport_state() {
        let mock = MockTransport {
            sent: Mutex::new(Vec::new()),
            healthy: false,
        };
        let mailer = Mailer::new(mock);
        assert!(!mailer.is_healthy().await);
    }
}
