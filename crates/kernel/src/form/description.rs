//! Declarative form descriptions.
//!
//! A description is plain data loaded from TOML. Building it produces a
//! [`FormDefinition`] through the regular construction API, so reserved
//! identifiers are rejected the same way and every build draws a fresh
//! anti-spam challenge.
//!
//! ```toml
//! incomplete_message = "Please fill in all required fields."
//! anti_spam = true
//!
//! [[sections]]
//! title = "Contact"
//! show_challenge = true
//!
//! [[sections.fields]]
//! identifier = "email"
//! title = "E-mail"
//! type = "text"
//! required = true
//! ```

use serde::{Deserialize, Serialize};

use super::error::FormError;
use super::types::{FieldDescriptor, FormDefinition, Method, Section};

/// A form described as data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormDescription {
    #[serde(default)]
    pub incomplete_message: String,

    /// Generate an arithmetic challenge for every built form.
    #[serde(default)]
    pub anti_spam: bool,

    #[serde(default)]
    pub method: Method,

    #[serde(default)]
    pub target: String,

    #[serde(default)]
    pub header: String,

    #[serde(default)]
    pub footer: String,

    #[serde(default)]
    pub sections: Vec<SectionDescription>,
}

/// One section of a described form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionDescription {
    #[serde(default)]
    pub title: Option<String>,

    /// Display the anti-spam question after this section's fields.
    #[serde(default)]
    pub show_challenge: bool,

    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescription {
    /// Parse a TOML description.
    pub fn from_toml(source: &str) -> Result<Self, FormError> {
        Ok(toml::from_str(source)?)
    }

    /// Build a new form instance.
    pub fn build(&self) -> Result<FormDefinition, FormError> {
        let form = if self.anti_spam {
            FormDefinition::with_anti_spam(self.incomplete_message.clone())
        } else {
            FormDefinition::new(self.incomplete_message.clone())
        };
        let mut form = form
            .method(self.method)
            .target(self.target.clone())
            .header(self.header.clone())
            .footer(self.footer.clone());

        for description in &self.sections {
            let mut section = match &description.title {
                Some(title) => Section::new(title.clone()),
                None => Section::untitled(),
            };
            for field in &description.fields {
                section = section.field(field.clone().dedup_options())?;
            }
            form = form.section(section);
            if description.show_challenge {
                form = form.show_challenge()?;
            }
        }

        Ok(form)
    }

    /// Drop the challenge and every place that would display it.
    pub fn disable_anti_spam(&mut self) {
        self.anti_spam = false;
        for section in &mut self.sections {
            section.show_challenge = false;
        }
    }

    /// Fields a submitter fills in, in form order.
    pub fn input_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter())
            .filter(|field| field.kind.accepts_input())
    }
}
