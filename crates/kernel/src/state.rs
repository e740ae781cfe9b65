//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::form::{FormAssembler, FormDescription};
use crate::services::mail::Mailer;
use crate::theme::ThemeEngine;

/// Contact form used when no description file is configured.
const BUILTIN_CONTACT_FORM: &str = include_str!("../assets/contact.toml");

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Loaded configuration.
    config: Config,

    /// Theme engine for forms and pages.
    theme: Arc<ThemeEngine>,

    /// Renders forms with their validation token.
    assembler: FormAssembler,

    /// Description of the contact form; built afresh for every render.
    contact_form: FormDescription,

    /// Mailer for accepted submissions (None if SMTP is not configured).
    mailer: Option<Arc<Mailer>>,
}

impl AppState {
    /// Create application state from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let theme = match &config.templates_dir {
            Some(dir) => {
                info!(?dir, "loading templates from directory");
                ThemeEngine::new(dir).context("failed to create theme engine")?
            }
            None => ThemeEngine::builtin().context("failed to create theme engine")?,
        };
        let theme = Arc::new(theme);

        let contact_form = Self::load_contact_form(config)?;

        let mailer = config.smtp_host.as_ref().and_then(|host| {
            match Mailer::new(
                host,
                config.smtp_port,
                config.smtp_username.as_deref(),
                config.smtp_password.as_deref(),
                &config.smtp_encryption,
            ) {
                Ok(mailer) => {
                    info!(host = %host, port = config.smtp_port, "SMTP mailer configured");
                    Some(Arc::new(mailer))
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to initialize mailer");
                    None
                }
            }
        });

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config: config.clone(),
                assembler: FormAssembler::new(theme.clone()),
                theme,
                contact_form,
                mailer,
            }),
        })
    }

    /// Load and check the contact form description.
    fn load_contact_form(config: &Config) -> Result<FormDescription> {
        let source = match &config.contact_form {
            Some(path) => {
                info!(?path, "loading contact form description");
                std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?
            }
            None => BUILTIN_CONTACT_FORM.to_string(),
        };

        let mut description =
            FormDescription::from_toml(&source).context("failed to parse contact form")?;
        if description.target.is_empty() {
            description.target.clone_from(&config.contact_target);
        }
        if !config.anti_spam {
            description.disable_anti_spam();
        }

        // Fail at startup rather than on the first request.
        let form = description
            .build()
            .context("contact form description is invalid")?;
        info!(
            fields = form.fields().count(),
            anti_spam = form.challenge().is_some(),
            "Contact form loaded"
        );

        Ok(description)
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the theme engine.
    pub fn theme(&self) -> &Arc<ThemeEngine> {
        &self.inner.theme
    }

    /// Get the form assembler.
    pub fn assembler(&self) -> &FormAssembler {
        &self.inner.assembler
    }

    /// Get the contact form description.
    pub fn contact_form(&self) -> &FormDescription {
        &self.inner.contact_form
    }

    /// Get the mailer (None if SMTP is not configured).
    pub fn mailer(&self) -> Option<&Arc<Mailer>> {
        self.inner.mailer.as_ref()
    }
}
