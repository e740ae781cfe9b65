//! Form API with a self-describing validation protocol.
//!
//! Forms are rendered through the theme engine (via Tera templates). Every
//! rendered form carries a token listing its required fields and the
//! expected anti-spam answer, so submissions can be checked without any
//! server-side state:
//! - Declarative form definition with typed fields
//! - Arithmetic anti-spam challenges
//! - Token encoding and injection at render time
//! - Advisory preflight check in the browser
//! - Authoritative server-side check of submissions

mod assembler;
mod challenge;
mod description;
mod error;
pub mod preflight;
mod submission;
mod token;
mod types;
mod validate;

pub use assembler::{FormAssembler, RenderedForm, required_field_ids, validation_token};
pub use challenge::{Challenge, MAX_OPERAND, MIN_OPERAND};
pub use description::{FormDescription, SectionDescription};
pub use error::FormError;
pub use preflight::{PREFLIGHT_FUNCTION, PREFLIGHT_SCRIPT, REQUIRED_CLASS};
pub use submission::Submission;
pub use token::{DecodeError, ValidationToken};
pub use types::{
    ANTI_SPAM_FIELD, FIELD_PREFIX, FieldDescriptor, FieldKind, FieldOption, FormDefinition,
    Method, SUBMIT_FIELD, Section, TOKEN_FIELD, TextareaSize, is_reserved, wire_name,
};
pub use validate::is_valid;
