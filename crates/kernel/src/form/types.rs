//! Form, section and field types.

use serde::{Deserialize, Serialize};

use super::challenge::Challenge;
use super::error::FormError;

/// Prefix applied to every field name on the wire.
pub const FIELD_PREFIX: &str = "tessera_";

/// Reserved identifier of the hidden field carrying the validation token.
pub const TOKEN_FIELD: &str = "form_id";

/// Reserved identifier of the field holding the anti-spam answer.
pub const ANTI_SPAM_FIELD: &str = "anti_spam";

/// Default identifier for submit buttons.
pub const SUBMIT_FIELD: &str = "submit_button";

/// Whether an identifier belongs to the validation protocol.
pub fn is_reserved(identifier: &str) -> bool {
    identifier == TOKEN_FIELD || identifier == ANTI_SPAM_FIELD
}

/// Name of a field as submitted by the browser.
pub fn wire_name(identifier: &str) -> String {
    format!("{FIELD_PREFIX}{identifier}")
}

/// HTTP method used to submit a form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    #[default]
    Post,
}

impl Method {
    /// Value of the `method` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
        }
    }
}

/// A complete form definition.
///
/// Built by the caller over its lifetime, then rendered. Rendering works on a
/// snapshot, so fields added afterwards only show up in later renders.
#[derive(Debug, Clone)]
pub struct FormDefinition {
    incomplete_message: String,
    challenge: Option<Challenge>,
    sections: Vec<Section>,
    method: Method,
    target: String,
    header: String,
    footer: String,
}

impl FormDefinition {
    /// Create a form without anti-spam protection.
    ///
    /// `incomplete_message` is shown by the preflight check when a required
    /// field is missing; an empty message blocks submission silently.
    pub fn new(incomplete_message: impl Into<String>) -> Self {
        Self {
            incomplete_message: incomplete_message.into(),
            challenge: None,
            sections: Vec::new(),
            method: Method::default(),
            target: String::new(),
            header: String::new(),
            footer: String::new(),
        }
    }

    /// Create a form protected by a freshly generated arithmetic challenge.
    pub fn with_anti_spam(incomplete_message: impl Into<String>) -> Self {
        Self::with_challenge(incomplete_message, Challenge::generate())
    }

    /// Create a form protected by the given challenge.
    pub fn with_challenge(incomplete_message: impl Into<String>, challenge: Challenge) -> Self {
        let mut form = Self::new(incomplete_message);
        form.challenge = Some(challenge);
        form
    }

    /// Set the form method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the URL the form submits to.
    pub fn target(mut self, url: impl Into<String>) -> Self {
        self.target = url.into();
        self
    }

    /// Set raw HTML emitted before the form element.
    pub fn header(mut self, html: impl Into<String>) -> Self {
        self.header = html.into();
        self
    }

    /// Set raw HTML emitted after the form element.
    pub fn footer(mut self, html: impl Into<String>) -> Self {
        self.footer = html.into();
        self
    }

    /// Append a section.
    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Display the anti-spam question in the most recently added section.
    ///
    /// The question becomes a required text field using the reserved
    /// anti-spam identifier.
    pub fn show_challenge(mut self) -> Result<Self, FormError> {
        let question = self
            .challenge
            .as_ref()
            .map(|challenge| challenge.question().to_string())
            .ok_or(FormError::ChallengeNotEnabled)?;
        let section = self
            .sections
            .last_mut()
            .ok_or(FormError::NoSectionForChallenge)?;
        section.push_system(FieldDescriptor::text(ANTI_SPAM_FIELD, question).required());
        Ok(self)
    }

    pub fn incomplete_message(&self) -> &str {
        &self.incomplete_message
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn http_method(&self) -> Method {
        self.method
    }

    pub fn action_url(&self) -> &str {
        &self.target
    }

    pub fn header_html(&self) -> &str {
        &self.header
    }

    pub fn footer_html(&self) -> &str {
        &self.footer
    }

    /// Iterate over every field in section-then-field order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    /// Whether any section displays the anti-spam question.
    pub fn shows_challenge(&self) -> bool {
        self.fields().any(|field| field.identifier == ANTI_SPAM_FIELD)
    }
}

/// An ordered group of fields rendered as a fieldset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    title: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl Section {
    /// Create a section displayed with a legend.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            title: (!title.is_empty()).then_some(title),
            fields: Vec::new(),
        }
    }

    /// Create a section without a legend.
    pub fn untitled() -> Self {
        Self::default()
    }

    /// Add a caller field.
    ///
    /// Fails when the identifier is empty or reserved for the validation
    /// protocol.
    pub fn field(mut self, mut field: FieldDescriptor) -> Result<Self, FormError> {
        if field.identifier.is_empty() {
            return Err(FormError::EmptyIdentifier);
        }
        if is_reserved(&field.identifier) {
            return Err(FormError::ReservedIdentifier(field.identifier));
        }
        field.required &= field.kind.accepts_input();
        self.fields.push(field);
        Ok(self)
    }

    /// Add a protocol field, bypassing the reserved-name check.
    pub(crate) fn push_system(&mut self, field: FieldDescriptor) {
        self.fields.push(field);
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

/// A single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Identifier without the wire prefix.
    pub identifier: String,

    /// Label (or button text for submit buttons).
    #[serde(default)]
    pub title: String,

    /// Kind with kind-specific configuration.
    #[serde(flatten)]
    pub kind: FieldKind,

    #[serde(default)]
    pub required: bool,

    /// Initial value; for option groups the value of the preselected option.
    #[serde(default)]
    pub default_value: String,
}

impl FieldDescriptor {
    /// Create a single-line text input.
    pub fn text(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(identifier, title, FieldKind::Text)
    }

    /// Create a hidden input carrying a fixed value.
    pub fn hidden(identifier: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(identifier, "", FieldKind::Hidden).default_value(value)
    }

    /// Create a textarea.
    pub fn textarea(
        identifier: impl Into<String>,
        title: impl Into<String>,
        size: TextareaSize,
    ) -> Self {
        Self::new(identifier, title, FieldKind::Textarea { size })
    }

    /// Create a drop-down list.
    pub fn select(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(
            identifier,
            title,
            FieldKind::Select {
                options: Vec::new(),
            },
        )
    }

    /// Create a group of checkboxes sharing one name.
    pub fn checkbox_group(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(
            identifier,
            title,
            FieldKind::CheckboxGroup {
                options: Vec::new(),
            },
        )
    }

    /// Create a group of radio buttons sharing one name.
    pub fn radio_group(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(
            identifier,
            title,
            FieldKind::RadioGroup {
                options: Vec::new(),
            },
        )
    }

    /// Create a submit button with the given text.
    pub fn submit(label: impl Into<String>) -> Self {
        Self::new(SUBMIT_FIELD, label, FieldKind::Submit { align_left: false })
    }

    fn new(identifier: impl Into<String>, title: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            kind,
            required: false,
            default_value: String::new(),
        }
    }

    /// Mark as required. Ignored for hidden fields and submit buttons.
    pub fn required(mut self) -> Self {
        if self.kind.accepts_input() {
            self.required = true;
        }
        self
    }

    /// Set the initial value.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Rename the field (mostly useful for submit buttons).
    pub fn named(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Render a submit button without the leading label column.
    pub fn align_left(mut self) -> Self {
        if let FieldKind::Submit { ref mut align_left } = self.kind {
            *align_left = true;
        }
        self
    }

    /// Add an option whose value is its label.
    pub fn option(self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.option_with_value(label.clone(), label)
    }

    /// Add an option, replacing the label of an existing option with the same
    /// value. Has no effect on kinds without options.
    pub fn option_with_value(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        if let Some(options) = self.kind.options_mut() {
            let option = FieldOption {
                value: value.into(),
                label: label.into(),
            };
            match options.iter_mut().find(|existing| existing.value == option.value) {
                Some(existing) => existing.label = option.label,
                None => options.push(option),
            }
        }
        self
    }

    /// Merge options that share a value, as [`option_with_value`] would have.
    ///
    /// [`option_with_value`]: Self::option_with_value
    pub fn dedup_options(mut self) -> Self {
        let Some(options) = self.kind.options_mut() else {
            return self;
        };
        let added = std::mem::take(options);
        for option in added {
            self = self.option_with_value(option.value, option.label);
        }
        self
    }

    /// Name of this field on the wire.
    pub fn wire_name(&self) -> String {
        wire_name(&self.identifier)
    }
}

/// Field kinds with kind-specific configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text input.
    Text,

    /// Hidden input.
    Hidden,

    /// Multi-line text input.
    Textarea {
        #[serde(default)]
        size: TextareaSize,
    },

    /// Drop-down list.
    Select {
        #[serde(default)]
        options: Vec<FieldOption>,
    },

    /// Checkboxes sharing one name.
    CheckboxGroup {
        #[serde(default)]
        options: Vec<FieldOption>,
    },

    /// Radio buttons sharing one name.
    RadioGroup {
        #[serde(default)]
        options: Vec<FieldOption>,
    },

    /// Submit button.
    Submit {
        #[serde(default)]
        align_left: bool,
    },
}

impl FieldKind {
    /// Get the type name as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Hidden => "hidden",
            FieldKind::Textarea { .. } => "textarea",
            FieldKind::Select { .. } => "select",
            FieldKind::CheckboxGroup { .. } => "checkbox_group",
            FieldKind::RadioGroup { .. } => "radio_group",
            FieldKind::Submit { .. } => "submit",
        }
    }

    /// Whether the user fills this field in.
    pub fn accepts_input(&self) -> bool {
        !matches!(self, FieldKind::Hidden | FieldKind::Submit { .. })
    }

    /// Options of select lists and groups.
    pub fn options(&self) -> &[FieldOption] {
        match self {
            FieldKind::Select { options }
            | FieldKind::CheckboxGroup { options }
            | FieldKind::RadioGroup { options } => options,
            _ => &[],
        }
    }

    fn options_mut(&mut self) -> Option<&mut Vec<FieldOption>> {
        match self {
            FieldKind::Select { options }
            | FieldKind::CheckboxGroup { options }
            | FieldKind::RadioGroup { options } => Some(options),
            _ => None,
        }
    }
}

/// One entry of a select list or option group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Display size of a textarea.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextareaSize {
    #[default]
    Small,
    Medium,
    Large,
}
