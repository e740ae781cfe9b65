//! Theme engine and template rendering.
//!
//! Provides Tera-based HTML emission for forms and pages. Built-in templates
//! ship with the crate and can be overridden from a template directory.

mod engine;

pub use engine::ThemeEngine;
