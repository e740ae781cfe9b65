//! Tessera Kernel Library
//!
//! Form rendering with a self-describing validation protocol, plus the
//! HTTP shell that serves a contact form. The main entry point for running
//! the server is the `tessera` binary.

pub mod config;
pub mod error;
pub mod form;
pub mod routes;
pub mod services;
pub mod state;
pub mod theme;
