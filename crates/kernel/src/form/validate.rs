//! Server-side authoritative check.
//!
//! Everything needed to judge a submission travels with it in the validation
//! token. The check is a pure function of the submitted data and never
//! trusts the browser's preflight.

use thiserror::Error;
use tracing::debug;

use super::submission::Submission;
use super::token::{DecodeError, ValidationToken};
use super::types::{ANTI_SPAM_FIELD, TOKEN_FIELD};

/// Reason a submission was rejected. Logged, never shown to the submitter.
#[derive(Debug, Error)]
enum Rejection {
    #[error(transparent)]
    Token(DecodeError),

    #[error("wrong anti-spam answer")]
    WrongAnswer,

    #[error("required field '{0}' is empty")]
    MissingField(String),
}

/// Decide whether a submission satisfies the form that produced it.
///
/// Rejects a missing or unreadable token, a wrong anti-spam answer, and any
/// required field left blank.
pub fn is_valid(submission: &Submission) -> bool {
    match check(submission) {
        Ok(()) => true,
        Err(rejection) => {
            debug!(reason = %rejection, "Form submission rejected");
            false
        }
    }
}

fn check(submission: &Submission) -> Result<(), Rejection> {
    let token = ValidationToken::decode_field(submission.field(TOKEN_FIELD))
        .map_err(Rejection::Token)?;

    if token.has_challenge() && submission.get_string(ANTI_SPAM_FIELD) != token.expected_answer {
        return Err(Rejection::WrongAnswer);
    }

    if let Some(missing) = token
        .required_field_ids
        .iter()
        .find(|id| submission.get_string(id).is_empty())
    {
        return Err(Rejection::MissingField(missing.clone()));
    }

    Ok(())
}
