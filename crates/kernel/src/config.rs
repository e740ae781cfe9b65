//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Directory with templates overriding the built-in ones.
    pub templates_dir: Option<PathBuf>,

    /// TOML description of the contact form. The built-in form is used when
    /// unset.
    pub contact_form: Option<PathBuf>,

    /// URL the contact form submits to (default: /contact).
    pub contact_target: String,

    /// Protect the contact form with an arithmetic challenge (default: true).
    pub anti_spam: bool,

    /// SMTP host for mail delivery. When None, mail is disabled.
    pub smtp_host: Option<String>,

    /// SMTP port (default: 587).
    pub smtp_port: u16,

    /// SMTP username for authentication.
    pub smtp_username: Option<String>,

    /// SMTP password for authentication.
    pub smtp_password: Option<String>,

    /// SMTP encryption mode: "starttls" (default), "tls", or "none".
    pub smtp_encryption: String,

    /// From address for outgoing mail.
    pub smtp_from_email: String,

    /// Display name for outgoing mail.
    pub smtp_from_name: String,

    /// Recipients of accepted contact requests (comma-separated).
    pub contact_recipients: Vec<String>,

    /// Blind-copy recipients of accepted contact requests (comma-separated).
    pub contact_bcc: Vec<String>,

    /// Subject of contact request mails.
    pub contact_subject: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            templates_dir: None,
            contact_form: None,
            contact_target: "/contact".to_string(),
            anti_spam: true,
            smtp_host: None,
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_encryption: "starttls".to_string(),
            smtp_from_email: "noreply@localhost".to_string(),
            smtp_from_name: String::new(),
            contact_recipients: Vec::new(),
            contact_bcc: Vec::new(),
            contact_subject: "Contact request".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = env::var("PORT")
            .unwrap_or_else(|_| defaults.port.to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let templates_dir = env::var("TEMPLATES_DIR").ok().map(PathBuf::from);
        let contact_form = env::var("CONTACT_FORM").ok().map(PathBuf::from);

        let contact_target = env::var("CONTACT_TARGET").unwrap_or(defaults.contact_target);

        let anti_spam = match env::var("ANTI_SPAM") {
            Ok(value) => parse_flag(&value).context("ANTI_SPAM must be a boolean")?,
            Err(_) => defaults.anti_spam,
        };

        let smtp_host = env::var("SMTP_HOST").ok().filter(|host| !host.is_empty());

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| defaults.smtp_port.to_string())
            .parse()
            .context("SMTP_PORT must be a valid u16")?;

        let smtp_username = env::var("SMTP_USERNAME").ok();
        let smtp_password = env::var("SMTP_PASSWORD").ok();

        let smtp_encryption = env::var("SMTP_ENCRYPTION")
            .unwrap_or(defaults.smtp_encryption)
            .to_lowercase();

        let smtp_from_email = env::var("SMTP_FROM_EMAIL").unwrap_or(defaults.smtp_from_email);
        let smtp_from_name = env::var("SMTP_FROM_NAME").unwrap_or_default();

        let contact_recipients = env::var("CONTACT_RECIPIENTS")
            .map(|v| parse_list(&v))
            .unwrap_or_default();
        let contact_bcc = env::var("CONTACT_BCC")
            .map(|v| parse_list(&v))
            .unwrap_or_default();

        let contact_subject = env::var("CONTACT_SUBJECT").unwrap_or(defaults.contact_subject);

        Ok(Self {
            port,
            templates_dir,
            contact_form,
            contact_target,
            anti_spam,
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            smtp_encryption,
            smtp_from_email,
            smtp_from_name,
            contact_recipients,
            contact_bcc,
            contact_subject,
        })
    }

    /// Whether accepted submissions can be mailed anywhere.
    pub fn has_contact_recipients(&self) -> bool {
        !self.contact_recipients.is_empty() || !self.contact_bcc.is_empty()
    }
}

/// Split a comma-separated list, dropping blank entries.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognized flag value '{other}'"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(" a@example.org, ,b@example.org,"),
            vec!["a@example.org", "b@example.org"]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag(" 1 ").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.contact_target, "/contact");
        assert!(config.anti_spam);
        assert!(config.smtp_host.is_none());
        assert!(!config.has_contact_recipients());
    }
}
