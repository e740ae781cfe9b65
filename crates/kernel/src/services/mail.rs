//! Mail delivery using lettre/SMTP.
//!
//! Delivery sits outside the validation protocol: accepted submissions are
//! handed to a [`Mailer`] as a [`MailMessage`].

use anyhow::Context;
use lettre::address::AddressError;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

/// Mail composition and delivery errors.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail needs at least one To or BCC recipient")]
    NoRecipients,

    #[error("mail sender address is empty")]
    EmptySender,

    #[error("mail subject is empty")]
    EmptySubject,

    #[error("invalid email address '{address}'")]
    Address {
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("failed to build mail message")]
    Build(#[from] lettre::error::Error),

    #[error("failed to send mail")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// A message assembled line by line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailMessage {
    from_email: String,
    from_name: Option<String>,
    subject: String,
    is_html: bool,
    to: Vec<String>,
    bcc: Vec<String>,
    lines: Vec<String>,
}

impl MailMessage {
    pub fn new(from_email: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from_email: from_email.into(),
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Display name shown with the sender address.
    pub fn from_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.from_name = (!name.is_empty()).then_some(name);
        self
    }

    /// Send the body as HTML instead of plain text.
    pub fn html(mut self, is_html: bool) -> Self {
        self.is_html = is_html;
        self
    }

    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Append a body line.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.push_line(line);
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> String {
        self.lines.join("\n")
    }

    /// Build the lettre message, checking preconditions first.
    pub fn build(&self) -> Result<Message, MailError> {
        if self.to.is_empty() && self.bcc.is_empty() {
            return Err(MailError::NoRecipients);
        }
        if self.from_email.trim().is_empty() {
            return Err(MailError::EmptySender);
        }
        if self.subject.trim().is_empty() {
            return Err(MailError::EmptySubject);
        }

        let from = Mailbox::new(self.from_name.clone(), parse_address(&self.from_email)?);
        let mut builder = Message::builder().from(from).subject(self.subject.clone());
        for address in &self.to {
            builder = builder.to(Mailbox::new(None, parse_address(address)?));
        }
        for address in &self.bcc {
            builder = builder.bcc(Mailbox::new(None, parse_address(address)?));
        }

        let content_type = if self.is_html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };

        Ok(builder.header(content_type).body(self.body())?)
    }
}

fn parse_address(address: &str) -> Result<Address, MailError> {
    address
        .trim()
        .parse()
        .map_err(|source| MailError::Address {
            address: address.to_string(),
            source,
        })
}

/// SMTP mailer.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    /// Create a new mailer.
    ///
    /// `encryption` controls the SMTP transport mode:
    /// - `"starttls"` (default): Opportunistic STARTTLS on port 587
    /// - `"tls"`: Implicit TLS (SMTPS) on port 465
    /// - `"none"`: Unencrypted (for local dev only)
    pub fn new(
        smtp_host: &str,
        smtp_port: u16,
        smtp_username: Option<&str>,
        smtp_password: Option<&str>,
        encryption: &str,
    ) -> anyhow::Result<Self> {
        let mut builder = match encryption {
            "tls" => AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)
                .context("failed to create SMTP relay transport")?
                .port(smtp_port),
            "none" => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp_host).port(smtp_port)
            }
            _ => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_host)
                .context("failed to create SMTP STARTTLS transport")?
                .port(smtp_port),
        };

        if let (Some(user), Some(pass)) = (smtp_username, smtp_password) {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    /// Send a message.
    pub async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let email = message.build()?;
        self.transport.send(email).await?;
        info!(subject = %message.subject(), "Mail sent");
        Ok(())
    }
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer").finish_non_exhaustive()
    }
}
