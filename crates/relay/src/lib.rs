//! Contact relay: forwards validated inquiries from the public site to the
//! breeder's mailbox over SMTP.
//!
//! Every submission is validated again here, whatever the browser checked,
//! then the transport is verified before the message is handed over.

pub mod config;
pub mod message;
pub mod relay;
pub mod transport;

pub use config::MailConfig;
pub use relay::{ContactRelay, MailSender, RelayError};
pub use transport::{MailTransport, MailTransportError, SmtpMailTransport};
