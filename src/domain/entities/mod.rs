//! Core domain entities.
//!
//! Entities are plain data structures. Creation input is kept in a separate
//! struct ([`NewLink`]) so storage-assigned fields (`id`, `click_count`,
//! `created_at`) never have to be faked by callers.

pub mod link;

pub use link::{Link, NewLink};
