//! Client-side preflight check.
//!
//! The browser runs [`PREFLIGHT_SCRIPT`] from the form's submit handler. It
//! only looks at the markup (the `required` class), knows nothing about the
//! anti-spam answer and is never trusted by the server. This module holds
//! the same algorithm over a snapshot of form controls so pages can be
//! checked without a browser.

use super::types::{FieldKind, FormDefinition, TOKEN_FIELD};

/// Script defining the submit handler referenced by rendered forms.
pub const PREFLIGHT_SCRIPT: &str = include_str!("../../assets/preflight.js");

/// Name of the function the submit handler calls.
pub const PREFLIGHT_FUNCTION: &str = "tessera_isComplete";

/// Class marking a control as required.
pub const REQUIRED_CLASS: &str = "required";

/// Type of an interactive control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlType {
    Text,
    Textarea,
    Select,
    Hidden,
    Submit,
    Checkbox,
    Radio,
}

impl ControlType {
    fn is_choice(self) -> bool {
        matches!(self, ControlType::Checkbox | ControlType::Radio)
    }
}

/// State of one control at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    pub name: String,
    pub control_type: ControlType,
    pub class_name: String,
    pub value: String,
    pub checked: bool,
}

impl FormControl {
    pub fn new(name: impl Into<String>, control_type: ControlType) -> Self {
        Self {
            name: name.into(),
            control_type,
            class_name: String::new(),
            value: String::new(),
            checked: false,
        }
    }

    /// Add the required marker class.
    pub fn required(mut self) -> Self {
        if !self.is_required() {
            if !self.class_name.is_empty() {
                self.class_name.push(' ');
            }
            self.class_name.push_str(REQUIRED_CLASS);
        }
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Whether the class list contains the required marker as a whole word.
    pub fn is_required(&self) -> bool {
        self.class_name
            .split_ascii_whitespace()
            .any(|class| class == REQUIRED_CLASS)
    }
}

/// Outcome of a preflight check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preflight {
    /// Submission may proceed.
    Complete,

    /// Submission is cancelled; `alert` is shown when a message was given.
    Blocked { alert: Option<String> },
}

impl Preflight {
    pub fn is_complete(&self) -> bool {
        matches!(self, Preflight::Complete)
    }
}

/// Check controls in document order.
///
/// Text-like controls fail on the first blank value. Checkbox and radio
/// controls are grouped by name and each group needs one checked member;
/// groups are judged after the scan in the order they were first seen.
pub fn check(controls: &[FormControl], message: &str) -> Preflight {
    let mut groups: Vec<(&str, bool)> = Vec::new();

    for control in controls.iter().filter(|control| control.is_required()) {
        if control.control_type.is_choice() {
            match groups.iter_mut().find(|(name, _)| *name == control.name) {
                Some((_, satisfied)) => *satisfied |= control.checked,
                None => groups.push((control.name.as_str(), control.checked)),
            }
        } else if control.value.trim().is_empty() {
            return blocked(message);
        }
    }

    if groups.iter().any(|(_, satisfied)| !satisfied) {
        return blocked(message);
    }

    Preflight::Complete
}

/// Boolean form of [`check`], as returned to the browser's submit handler.
pub fn is_complete(controls: &[FormControl], message: &str) -> bool {
    check(controls, message).is_complete()
}

fn blocked(message: &str) -> Preflight {
    Preflight::Blocked {
        alert: (!message.is_empty()).then(|| message.to_string()),
    }
}

/// Controls of a freshly rendered form before the user touches anything.
///
/// The token field is left out; it is never marked required.
pub fn initial_controls(form: &FormDefinition) -> Vec<FormControl> {
    let mut controls = Vec::new();

    for field in form.fields().filter(|field| field.identifier != TOKEN_FIELD) {
        let name = field.wire_name();
        let class_name = if field.required { REQUIRED_CLASS } else { "" };
        let control = |control_type, value: &str, checked| FormControl {
            name: name.clone(),
            control_type,
            class_name: class_name.to_string(),
            value: value.to_string(),
            checked,
        };

        match &field.kind {
            FieldKind::Text => controls.push(control(ControlType::Text, &field.default_value, false)),
            FieldKind::Hidden => {
                controls.push(control(ControlType::Hidden, &field.default_value, false));
            }
            FieldKind::Textarea { .. } => {
                controls.push(control(ControlType::Textarea, &field.default_value, false));
            }
            FieldKind::Select { options } => {
                let selected = options
                    .iter()
                    .find(|option| option.value == field.default_value)
                    .or_else(|| options.first())
                    .map_or("", |option| option.value.as_str());
                controls.push(control(ControlType::Select, selected, false));
            }
            FieldKind::CheckboxGroup { options } | FieldKind::RadioGroup { options } => {
                let control_type = if matches!(field.kind, FieldKind::CheckboxGroup { .. }) {
                    ControlType::Checkbox
                } else {
                    ControlType::Radio
                };
                for option in options {
                    let checked = option.value == field.default_value;
                    controls.push(control(control_type, &option.value, checked));
                }
            }
            FieldKind::Submit { .. } => {
                controls.push(control(ControlType::Submit, &field.title, false));
            }
        }
    }

    controls
}
