//! Form assembler.
//!
//! Derives the validation token from a form definition, places it in the
//! first section as a hidden field and emits the markup.

use std::sync::Arc;

use tracing::debug;

use crate::theme::ThemeEngine;

use super::error::FormError;
use super::token::ValidationToken;
use super::types::{FieldDescriptor, FormDefinition, TOKEN_FIELD};

/// Output of a render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedForm {
    pub html: String,
}

/// Identifiers of required fields in section-then-field order.
pub fn required_field_ids(form: &FormDefinition) -> Vec<String> {
    form.fields()
        .filter(|field| field.required)
        .map(|field| field.identifier.clone())
        .collect()
}

/// Token describing what the server must check for this form as it is now.
pub fn validation_token(form: &FormDefinition) -> ValidationToken {
    let expected_answer = form
        .challenge()
        .map(|challenge| challenge.expected_answer().to_string())
        .unwrap_or_default();
    ValidationToken::new(expected_answer, required_field_ids(form))
}

/// Renders form definitions through a theme.
#[derive(Debug, Clone)]
pub struct FormAssembler {
    theme: Arc<ThemeEngine>,
}

impl FormAssembler {
    pub fn new(theme: Arc<ThemeEngine>) -> Self {
        Self { theme }
    }

    /// Assembler using only the built-in templates.
    pub fn with_builtin_theme() -> Result<Self, FormError> {
        Ok(Self::new(Arc::new(ThemeEngine::builtin()?)))
    }

    /// Render a snapshot of the form.
    ///
    /// The token is computed from the fields present right now and added to
    /// a copy of the sections, so the definition is left untouched and every
    /// render carries exactly one token field.
    pub fn render(&self, form: &FormDefinition) -> Result<RenderedForm, FormError> {
        if form.sections().is_empty() {
            return Err(FormError::NoSection);
        }
        if form.challenge().is_some() && !form.shows_challenge() {
            return Err(FormError::ChallengeNotShown);
        }

        let token = validation_token(form);

        let mut sections = form.sections().to_vec();
        let first = sections.first_mut().ok_or(FormError::NoSection)?;
        first.push_system(FieldDescriptor::hidden(TOKEN_FIELD, token.encode()));

        let html = self.theme.render_form(form, &sections)?;

        debug!(
            sections = sections.len(),
            required = token.required_field_ids.len(),
            anti_spam = token.has_challenge(),
            "Rendered form"
        );

        Ok(RenderedForm { html })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::form::{Challenge, Section, TextareaSize};

    fn assembler() -> FormAssembler {
        FormAssembler::with_builtin_theme().unwrap()
    }

    #[test]
    fn required_ids_follow_section_then_field_order() {
        let form = FormDefinition::new("")
            .section(
                Section::new("One")
                    .field(FieldDescriptor::text("b", "B").required())
                    .unwrap()
                    .field(FieldDescriptor::text("optional", "Optional"))
                    .unwrap(),
            )
            .section(
                Section::new("Two")
                    .field(FieldDescriptor::textarea("a", "A", TextareaSize::Small).required())
                    .unwrap()
                    .field(FieldDescriptor::checkbox_group("c", "C").option("x").required())
                    .unwrap(),
            );

        assert_eq!(required_field_ids(&form), vec!["b", "a", "c"]);
    }

    #[test]
    fn challenge_answer_goes_into_token() {
        let form = FormDefinition::with_challenge("", Challenge::from_operands(4, 7))
            .section(Section::untitled())
            .show_challenge()
            .unwrap();

        let token = validation_token(&form);
        assert_eq!(token.expected_answer, "11");
        assert_eq!(token.required_field_ids, vec!["anti_spam"]);
    }

    #[test]
    fn token_lands_in_first_section_once() {
        let form = FormDefinition::new("")
            .section(
                Section::new("First")
                    .field(FieldDescriptor::text("name", "Name"))
                    .unwrap(),
            )
            .section(Section::new("Second"));

        let html = assembler().render(&form).unwrap().html;
        assert_eq!(html.matches("name=\"tessera_form_id\"").count(), 1);

        let token_at = html.find("tessera_form_id").unwrap();
        let second_at = html.find("<legend>Second</legend>").unwrap();
        assert!(token_at < second_at);
    }

    #[test]
    fn zero_sections_fail() {
        let err = assembler().render(&FormDefinition::new("")).unwrap_err();
        assert!(matches!(err, FormError::NoSection));
    }

    #[test]
    fn zero_sections_fail_before_challenge_check() {
        let form = FormDefinition::with_anti_spam("");
        let err = assembler().render(&form).unwrap_err();
        assert!(matches!(err, FormError::NoSection));
    }

    #[test]
    fn hidden_challenge_fails() {
        let form = FormDefinition::with_anti_spam("").section(Section::untitled());
        let err = assembler().render(&form).unwrap_err();
        assert!(matches!(err, FormError::ChallengeNotShown));
    }

    #[test]
    fn answer_not_in_markup() {
        let form = FormDefinition::with_challenge("", Challenge::custom("Sky color?", "azure").unwrap())
            .section(Section::untitled())
            .show_challenge()
            .unwrap();

        let html = assembler().render(&form).unwrap().html;
        assert!(html.contains("Sky color?"));
        assert!(!html.contains("azure"));
    }

    #[test]
    fn render_leaves_definition_untouched() {
        let form = FormDefinition::new("").section(Section::untitled());
        let assembler = assembler();
        let first = assembler.render(&form).unwrap();
        let second = assembler.render(&form).unwrap();

        assert!(form.sections()[0].fields().is_empty());
        assert_eq!(first, second);
    }
}
