//! Mail transport seam and its SMTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Failure reported by a [`MailTransport`].
#[derive(Debug, thiserror::Error)]
pub enum MailTransportError {
    /// SMTP-level failure (connection, TLS, authentication, rejection).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The server answered but refused the connection test.
    #[error("Mail server refused the connection test")]
    Refused,

    /// Any other transport failure.
    #[error("Mail transport error: {0}")]
    Other(String),
}

/// Something that can check connectivity and deliver a built message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Check the server is reachable and accepts our credentials.
    async fn verify(&self) -> Result<(), MailTransportError>;

    /// Hand a message over for delivery.
    async fn send(&self, message: Message) -> Result<(), MailTransportError>;
}

/// STARTTLS SMTP relay with username/password authentication.
#[derive(Clone)]
pub struct SmtpMailTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    pub fn new(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, MailTransportError> {
        let inner = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .timeout(Some(timeout))
            .build();
        Ok(Self { inner })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn verify(&self) -> Result<(), MailTransportError> {
        if self.inner.test_connection().await? {
            Ok(())
        } else {
            Err(MailTransportError::Refused)
        }
    }

    async fn send(&self, message: Message) -> Result<(), MailTransportError> {
        self.inner.send(message).await?;
        Ok(())
    }
}
