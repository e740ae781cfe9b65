//! Arithmetic anti-spam challenge.

use rand::Rng;

use super::error::FormError;

/// Smallest operand of a generated challenge.
pub const MIN_OPERAND: u32 = 1;

/// Largest operand of a generated challenge.
pub const MAX_OPERAND: u32 = 15;

/// An anti-spam question with its expected answer.
///
/// Generated once per form instance so the displayed question and the answer
/// embedded in the validation token always agree.
#[derive(Clone, PartialEq, Eq)]
pub struct Challenge {
    question: String,
    expected_answer: String,
}

impl Challenge {
    /// Draw a fresh addition question from the thread-local RNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Draw a fresh addition question from the given RNG.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let left = rng.gen_range(MIN_OPERAND..=MAX_OPERAND);
        let right = rng.gen_range(MIN_OPERAND..=MAX_OPERAND);
        Self::from_operands(left, right)
    }

    /// Build the addition question for fixed operands.
    pub fn from_operands(left: u32, right: u32) -> Self {
        Self {
            question: format!("{left} + {right} = ?"),
            expected_answer: (u64::from(left) + u64::from(right)).to_string(),
        }
    }

    /// Use a custom question and answer.
    pub fn custom(
        question: impl Into<String>,
        expected_answer: impl Into<String>,
    ) -> Result<Self, FormError> {
        let question = question.into().trim().to_string();
        let expected_answer = expected_answer.into().trim().to_string();
        if question.is_empty() || expected_answer.is_empty() {
            return Err(FormError::InvalidChallenge);
        }
        Ok(Self {
            question,
            expected_answer,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn expected_answer(&self) -> &str {
        &self.expected_answer
    }
}

// Keep the answer out of logs.
impl std::fmt::Debug for Challenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Challenge")
            .field("question", &self.question)
            .finish_non_exhaustive()
    }
}
