//! Utility functions for code generation, URL validation, and request handling.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_validator`] - Web URL validation
//! - [`client_ip`] - Client identification from request metadata

pub mod client_ip;
pub mod code_generator;
pub mod url_validator;
