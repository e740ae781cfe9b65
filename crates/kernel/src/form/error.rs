//! Form construction and rendering errors.

use thiserror::Error;

/// Contract violations raised while building or rendering a form.
///
/// These are programmer errors: they surface at the call that misused the
/// API and are never produced by submitted data.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("field identifier '{0}' is reserved for the validation protocol")]
    ReservedIdentifier(String),

    #[error("field identifier must not be empty")]
    EmptyIdentifier,

    #[error("anti-spam challenge must have a non-empty question and answer")]
    InvalidChallenge,

    #[error("anti-spam protection is not enabled for this form")]
    ChallengeNotEnabled,

    #[error("no section available to display the anti-spam question")]
    NoSectionForChallenge,

    #[error("anti-spam protection is enabled but no section displays the question")]
    ChallengeNotShown,

    #[error("no section found to carry the list of required fields")]
    NoSection,

    #[error("failed to render form")]
    Render(#[from] anyhow::Error),

    #[error("invalid form description: {0}")]
    Description(#[from] toml::de::Error),
}
