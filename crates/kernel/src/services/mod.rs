//! Kernel services.
//!
//! Collaborators used by the server shell that are not part of the
//! validation protocol itself.

pub mod mail;
