#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Form protocol tests: render, scrape, submit, check.

use tessera_kernel::form::{
    self, ANTI_SPAM_FIELD, Challenge, FieldDescriptor, FormAssembler, FormDefinition, FormError,
    Section, Submission, TOKEN_FIELD, TextareaSize, ValidationToken, preflight,
};
use tessera_test_utils::{count_tokens, extract_token, required_field_names, solve_challenge};

fn assembler() -> FormAssembler {
    FormAssembler::with_builtin_theme().unwrap()
}

fn email_form() -> FormDefinition {
    FormDefinition::new("Please fill in your e-mail address").section(
        Section::untitled()
            .field(FieldDescriptor::text("email", "E-mail").required())
            .unwrap()
            .field(FieldDescriptor::submit("Send"))
            .unwrap(),
    )
}

#[test]
fn test_email_form_token_contents() {
    let html = assembler().render(&email_form()).unwrap().html;

    let token = ValidationToken::decode(&extract_token(&html).unwrap()).unwrap();
    assert_eq!(token.expected_answer, "");
    assert_eq!(token.required_field_ids, vec!["email"]);
}

#[test]
fn test_email_form_submissions() {
    let html = assembler().render(&email_form()).unwrap().html;
    let token = extract_token(&html).unwrap();

    let empty = Submission::new()
        .with(TOKEN_FIELD, token.clone())
        .with("email", "");
    assert!(!form::is_valid(&empty));

    let blank = Submission::new()
        .with(TOKEN_FIELD, token.clone())
        .with("email", "   ");
    assert!(!form::is_valid(&blank));

    let filled = Submission::new()
        .with(TOKEN_FIELD, token)
        .with("email", "a@b.com");
    assert!(form::is_valid(&filled));
}

#[test]
fn test_challenge_answer_checked() {
    let definition = FormDefinition::with_challenge("", Challenge::from_operands(4, 7))
        .section(
            Section::new("Contact")
                .field(FieldDescriptor::text("name", "Name").required())
                .unwrap(),
        )
        .show_challenge()
        .unwrap();
    let html = assembler().render(&definition).unwrap().html;

    assert_eq!(solve_challenge(&html).as_deref(), Some("11"));
    let token = extract_token(&html).unwrap();

    let base = Submission::new()
        .with(TOKEN_FIELD, token)
        .with("name", "Ada");
    assert!(form::is_valid(&base.clone().with(ANTI_SPAM_FIELD, "11")));
    assert!(!form::is_valid(&base.clone().with(ANTI_SPAM_FIELD, "12")));
    assert!(!form::is_valid(&base));
}

#[test]
fn test_missing_token_always_rejected() {
    let submission = Submission::new()
        .with("email", "a@b.com")
        .with(ANTI_SPAM_FIELD, "11");
    assert!(!form::is_valid(&submission));
}

#[test]
fn test_corrupted_token_rejected() {
    let html = assembler().render(&email_form()).unwrap().html;
    let token = extract_token(&html).unwrap();

    let truncated = &token[..token.len() / 2];
    let altered: String = token
        .chars()
        .map(|c| if c == 'A' { '!' } else { c })
        .collect();
    let altered = format!("{altered}!");

    for bad in [truncated.to_string(), altered, "e30".to_string()] {
        let submission = Submission::new()
            .with(TOKEN_FIELD, bad)
            .with("email", "a@b.com");
        assert!(!form::is_valid(&submission));
    }
}

#[test]
fn test_token_alone_does_not_satisfy_requirements() {
    let html = assembler().render(&email_form()).unwrap().html;
    let token = extract_token(&html).unwrap();

    let submission = Submission::new().with(TOKEN_FIELD, token);
    assert!(!form::is_valid(&submission));
}

#[test]
fn test_render_twice_reflects_current_fields() {
    let assembler = assembler();
    let definition = email_form();
    let first = assembler.render(&definition).unwrap().html;

    let definition = definition.section(
        Section::new("More")
            .field(FieldDescriptor::textarea("message", "Message", TextareaSize::Medium).required())
            .unwrap(),
    );
    let second = assembler.render(&definition).unwrap().html;

    assert_eq!(count_tokens(&first), 1);
    assert_eq!(count_tokens(&second), 1);

    let first = ValidationToken::decode(&extract_token(&first).unwrap()).unwrap();
    let second = ValidationToken::decode(&extract_token(&second).unwrap()).unwrap();
    assert_eq!(first.required_field_ids, vec!["email"]);
    assert_eq!(second.required_field_ids, vec!["email", "message"]);
}

#[test]
fn test_required_markup_matches_token() {
    let definition = FormDefinition::with_anti_spam("Incomplete")
        .section(
            Section::new("One")
                .field(FieldDescriptor::text("name", "Name").required())
                .unwrap()
                .field(
                    FieldDescriptor::checkbox_group("topics", "Topics")
                        .option("News")
                        .option("Events")
                        .required(),
                )
                .unwrap(),
        )
        .section(
            Section::new("Two")
                .field(
                    FieldDescriptor::select("size", "Size")
                        .option("S")
                        .required(),
                )
                .unwrap(),
        )
        .show_challenge()
        .unwrap();

    let html = assembler().render(&definition).unwrap().html;
    let token = ValidationToken::decode(&extract_token(&html).unwrap()).unwrap();

    let wire: Vec<String> = token
        .required_field_ids
        .iter()
        .map(String::as_str)
        .map(form::wire_name)
        .collect();
    assert_eq!(required_field_names(&html), wire);
    assert_eq!(
        token.required_field_ids,
        vec!["name", "topics", "size", "anti_spam"]
    );
}

#[test]
fn test_zero_sections_cannot_render() {
    let err = assembler().render(&FormDefinition::new("")).unwrap_err();
    assert!(matches!(err, FormError::NoSection));
}

#[test]
fn test_reserved_names_rejected_at_addition() {
    let err = Section::untitled()
        .field(FieldDescriptor::text(ANTI_SPAM_FIELD, "Answer"))
        .unwrap_err();
    assert!(matches!(err, FormError::ReservedIdentifier(_)));
}

#[test]
fn test_preflight_agrees_with_server_on_required_fields() {
    let definition = email_form();
    let html = assembler().render(&definition).unwrap().html;
    let token = extract_token(&html).unwrap();

    let mut controls = preflight::initial_controls(&definition);
    assert!(!preflight::is_complete(&controls, "Missing"));
    assert!(!form::is_valid(
        &Submission::new().with(TOKEN_FIELD, token.clone())
    ));

    controls[0].value = "a@b.com".into();
    assert!(preflight::is_complete(&controls, "Missing"));
    assert!(form::is_valid(
        &Submission::new()
            .with(TOKEN_FIELD, token)
            .with("email", "a@b.com")
    ));
}
