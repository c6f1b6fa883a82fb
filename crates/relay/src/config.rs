use std::time::Duration;

/// Default SMTP relay host.
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default SMTP command timeout in seconds.
const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;

/// Business name printed in the footer of relayed messages.
pub const DEFAULT_BUSINESS_NAME: &str = "Royal Teckel Home";

/// Configuration of the contact relay.
///
/// A missing sending identity is not a startup error: the relay answers each
/// submission with [`crate::RelayError::NoSender`] instead.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Mailbox the relay authenticates as and sends from.
    pub sender: Option<String>,
    pub password: Option<String>,
    /// Operator mailbox receiving inquiries. Defaults to `sender`.
    pub recipient: Option<String>,
    pub timeout: Duration,
    pub business_name: String,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable            | Default            |
    /// |---------------------|--------------------|
    /// | `SMTP_HOST`         | `smtp.gmail.com`   |
    /// | `SMTP_PORT`         | `587`              |
    /// | `EMAIL_USER`        | unset (no sender)  |
    /// | `EMAIL_PASSWORD`    | unset              |
    /// | `CONTACT_RECIPIENT` | `EMAIL_USER`       |
    /// | `SMTP_TIMEOUT_SECS` | `30`               |
    /// | `BUSINESS_NAME`     | `Royal Teckel Home`|
    pub fn from_env() -> Self {
        let sender = non_empty_var("EMAIL_USER");
        Self {
            smtp_host: non_empty_var("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.into()),
            smtp_port: std::env::var("SMTP_PORT")
                .map(|p| p.parse().expect("SMTP_PORT must be a valid u16"))
                .unwrap_or(DEFAULT_SMTP_PORT),
            recipient: non_empty_var("CONTACT_RECIPIENT").or_else(|| sender.clone()),
            sender,
            password: non_empty_var("EMAIL_PASSWORD"),
            timeout: Duration::from_secs(
                std::env::var("SMTP_TIMEOUT_SECS")
                    .map(|t| t.parse().expect("SMTP_TIMEOUT_SECS must be a valid u64"))
                    .unwrap_or(DEFAULT_SMTP_TIMEOUT_SECS),
            ),
            business_name: non_empty_var("BUSINESS_NAME")
                .unwrap_or_else(|| DEFAULT_BUSINESS_NAME.into()),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
