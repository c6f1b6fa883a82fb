use std::sync::Arc;

use lettre::message::{Mailbox, MultiPart};
use lettre::{Address, Message};
use teckel_core::contact::{ContactInquiry, ContactViolation};
use teckel_core::error::CoreError;
use teckel_core::types::Timestamp;

use crate::config::MailConfig;
use crate::message::{render_html, render_text};
use crate::transport::{MailTransport, MailTransportError, SmtpMailTransport};

/// Confirmation returned to the visitor once the message is handed over.
pub const DELIVERED_MESSAGE: &str = "Message sent successfully";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Why a submission was not relayed.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid phone number format. Please include the country code, e.g. +33 6 12 34 56 78")]
    InvalidPhone,

    /// No sending identity is configured.
    #[error("Mail sender unavailable")]
    NoSender,

    #[error("Failed to connect to the mail service")]
    VerifyFailed(#[source] MailTransportError),

    #[error("Failed to send the message")]
    DeliveryFailed(#[source] MailTransportError),
}

impl RelayError {
    /// Whether the submission itself was at fault (as opposed to the relay).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            RelayError::MissingFields | RelayError::InvalidEmail | RelayError::InvalidPhone
        )
    }
}

impl From<ContactViolation> for RelayError {
    fn from(violation: ContactViolation) -> Self {
        match violation {
            ContactViolation::MissingFields => RelayError::MissingFields,
            ContactViolation::InvalidEmail => RelayError::InvalidEmail,
            ContactViolation::InvalidPhone => RelayError::InvalidPhone,
        }
    }
}

// ---------------------------------------------------------------------------
// Relay
// ---------------------------------------------------------------------------

/// Sending identity plus the transport authenticated as it.
#[derive(Clone)]
pub struct MailSender {
    pub address: Address,
    pub recipient: Mailbox,
    pub transport: Arc<dyn MailTransport>,
}

/// Validates inquiries and relays them to the operator mailbox.
#[derive(Clone)]
pub struct ContactRelay {
    sender: Option<MailSender>,
    business_name: String,
}

impl std::fmt::Debug for ContactRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactRelay")
            .field("has_sender", &self.sender.is_some())
            .field("business_name", &self.business_name)
            .finish_non_exhaustive()
    }
}

impl ContactRelay {
    pub fn new(sender: Option<MailSender>, business_name: impl Into<String>) -> Self {
        Self {
            sender,
            business_name: business_name.into(),
        }
    }

    /// Build the SMTP relay described by `config`.
    ///
    /// Without `EMAIL_USER` the relay is still built and reports
    /// [`RelayError::NoSender`] per submission. Malformed addresses are a
    /// configuration error.
    pub fn from_config(config: &MailConfig) -> Result<Self, CoreError> {
        let Some(user) = &config.sender else {
            tracing::warn!("EMAIL_USER not set, contact submissions will be refused");
            return Ok(Self::new(None, config.business_name.clone()));
        };

        let address: Address = user
            .parse()
            .map_err(|e| CoreError::Configuration(format!("EMAIL_USER is not an address: {e}")))?;
        let recipient = match &config.recipient {
            Some(r) => r.parse::<Mailbox>().map_err(|e| {
                CoreError::Configuration(format!("CONTACT_RECIPIENT is not an address: {e}"))
            })?,
            None => Mailbox::new(None, address.clone()),
        };
        let transport = SmtpMailTransport::new(
            &config.smtp_host,
            config.smtp_port,
            user,
            config.password.as_deref().unwrap_or_default(),
            config.timeout,
        )
        .map_err(|e| CoreError::Configuration(format!("SMTP relay: {e}")))?;

        tracing::info!(host = %config.smtp_host, port = config.smtp_port, "Contact relay configured");
        Ok(Self::new(
            Some(MailSender {
                address,
                recipient,
                transport: Arc::new(transport),
            }),
            config.business_name.clone(),
        ))
    }

    pub fn has_sender(&self) -> bool {
        self.sender.is_some()
    }

    /// Validate `inquiry` and relay it. Returns the confirmation shown to the
    /// visitor.
    pub async fn submit(&self, inquiry: &ContactInquiry) -> Result<String, RelayError> {
        self.submit_at(inquiry, chrono::Utc::now()).await
    }

    pub async fn submit_at(
        &self,
        inquiry: &ContactInquiry,
        now: Timestamp,
    ) -> Result<String, RelayError> {
        tracing::debug!(subject = %inquiry.subject, "Validating contact inquiry");
        if let Err(violation) = inquiry.validate_server() {
            tracing::info!(reason = %violation, "Contact inquiry rejected");
            return Err(violation.into());
        }

        let Some(sender) = &self.sender else {
            tracing::error!("Contact inquiry dropped: no sending identity configured");
            return Err(RelayError::NoSender);
        };

        let message = self.build_message(sender, inquiry, now)?;

        tracing::debug!("Verifying mail transport");
        if let Err(e) = sender.transport.verify().await {
            tracing::error!(error = %e, "Mail transport verification failed");
            return Err(RelayError::VerifyFailed(e));
        }

        if let Err(e) = sender.transport.send(message).await {
            tracing::error!(error = %e, "Contact message delivery failed");
            return Err(RelayError::DeliveryFailed(e));
        }

        tracing::info!(subject = %inquiry.subject, "Contact message relayed");
        Ok(DELIVERED_MESSAGE.to_string())
    }

    fn build_message(
        &self,
        sender: &MailSender,
        inquiry: &ContactInquiry,
        now: Timestamp,
    ) -> Result<Message, RelayError> {
        let display_name = inquiry.name.trim().to_string();

        let mut builder = Message::builder()
            .from(Mailbox::new(Some(display_name.clone()), sender.address.clone()));
        // The visitor's address is already accepted; one that lettre cannot
        // carry in a header still reaches the operator through the body.
        match inquiry.email.trim().parse::<Address>() {
            Ok(reply_to) => builder = builder.reply_to(Mailbox::new(Some(display_name), reply_to)),
            Err(e) => tracing::warn!(error = %e, "Visitor address unusable as Reply-To, omitting it"),
        }

        builder
            .to(sender.recipient.clone())
            .subject(inquiry.subject.trim())
            .multipart(MultiPart::alternative_plain_html(
                render_text(inquiry, &self.business_name, now),
                render_html(inquiry, &self.business_name, now),
            ))
            .map_err(|e| RelayError::DeliveryFailed(MailTransportError::Other(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeTransport {
        fail_verify: bool,
        fail_send: bool,
        verifications: AtomicUsize,
        sent: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl MailTransport for FakeTransport {
        async fn verify(&self) -> Result<(), MailTransportError> {
            self.verifications.fetch_add(1, Ordering::SeqCst);
            if self.fail_verify {
                return Err(MailTransportError::Refused);
            }
            Ok(())
        }

        async fn send(&self, message: Message) -> Result<(), MailTransportError> {
            if self.fail_send {
                return Err(MailTransportError::Other("421 try later".into()));
            }
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    fn relay(transport: Arc<FakeTransport>) -> ContactRelay {
        ContactRelay::new(
            Some(MailSender {
                address: "breeder@example.com".parse().unwrap(),
                recipient: "owner@example.com".parse().unwrap(),
                transport,
            }),
            "Royal Teckel Home",
        )
    }

    fn inquiry() -> ContactInquiry {
        ContactInquiry {
            name: "Jeanne".to_string(),
            email: "jeanne@example.fr".to_string(),
            phone: "+33 6 12 34 56 78".to_string(),
            subject: "Puppy".to_string(),
            message: "Is Oscar still available?".to_string(),
        }
    }

    #[tokio::test]
    async fn valid_inquiry_is_verified_then_sent() {
        let transport = Arc::new(FakeTransport::default());
        let confirmation = relay(transport.clone()).submit(&inquiry()).await.unwrap();
        assert_eq!(confirmation, DELIVERED_MESSAGE);
        assert_eq!(transport.verifications.load(Ordering::SeqCst), 1);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let message = &sent[0];
        let to: Vec<String> = message.envelope().to().iter().map(|a| a.to_string()).collect();
        assert_eq!(to, vec!["owner@example.com".to_string()]);
        assert_eq!(
            message.envelope().from().map(|a| a.to_string()).as_deref(),
            Some("breeder@example.com")
        );
        let reply_to = message.headers().get_raw("Reply-To").unwrap();
        assert!(reply_to.contains("jeanne@example.fr"), "{reply_to}");
        assert_eq!(message.headers().get_raw("Subject"), Some("Puppy"));
    }

    #[tokio::test]
    async fn invalid_inquiry_never_reaches_the_transport() {
        let transport = Arc::new(FakeTransport::default());
        let relay = relay(transport.clone());

        let mut missing = inquiry();
        missing.message = "  ".into();
        assert_matches!(relay.submit(&missing).await, Err(RelayError::MissingFields));

        let mut bad_email = inquiry();
        bad_email.email = "jeanne@".into();
        assert_matches!(relay.submit(&bad_email).await, Err(RelayError::InvalidEmail));

        let mut no_phone = inquiry();
        no_phone.phone = String::new();
        let err = relay.submit(&no_phone).await.unwrap_err();
        assert_matches!(err, RelayError::InvalidPhone);
        assert!(err.is_rejection());

        assert_eq!(transport.verifications.load(Ordering::SeqCst), 0);
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn address_outside_header_grammar_is_sent_without_reply_to() {
        let transport = Arc::new(FakeTransport::default());
        let mut unusual = inquiry();
        unusual.email = "jean(ne@example.com".into();

        let confirmation = relay(transport.clone()).submit(&unusual).await.unwrap();
        assert_eq!(confirmation, DELIVERED_MESSAGE);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].headers().get_raw("Reply-To").is_none());
        let raw = String::from_utf8(sent[0].formatted()).unwrap();
        assert!(raw.contains("jean(ne@example.com"));
    }

    #[tokio::test]
    async fn missing_sender_is_reported_after_validation() {
        let relay = ContactRelay::new(None, "Royal Teckel Home");
        assert!(!relay.has_sender());
        assert_matches!(relay.submit(&inquiry()).await, Err(RelayError::NoSender));

        let mut missing = inquiry();
        missing.name = String::new();
        assert_matches!(relay.submit(&missing).await, Err(RelayError::MissingFields));
    }

    #[tokio::test]
    async fn verify_failure_skips_sending() {
        let transport = Arc::new(FakeTransport {
            fail_verify: true,
            ..Default::default()
        });
        let err = relay(transport.clone()).submit(&inquiry()).await.unwrap_err();
        assert_matches!(err, RelayError::VerifyFailed(_));
        assert!(!err.is_rejection());
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_failure_is_delivery_failed() {
        let transport = Arc::new(FakeTransport {
            fail_send: true,
            ..Default::default()
        });
        assert_matches!(
            relay(transport).submit(&inquiry()).await,
            Err(RelayError::DeliveryFailed(_))
        );
    }

    #[test]
    fn config_without_user_builds_a_senderless_relay() {
        let config = MailConfig {
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
            sender: None,
            password: None,
            recipient: None,
            timeout: std::time::Duration::from_secs(5),
            business_name: "Royal Teckel Home".into(),
        };
        assert!(!ContactRelay::from_config(&config).unwrap().has_sender());

        let malformed = MailConfig {
            sender: Some("not an address".into()),
            ..config
        };
        assert_matches!(
            ContactRelay::from_config(&malformed),
            Err(CoreError::Configuration(_))
        );
    }
}
