//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`rate_limiter`] - Per-client sliding-window request limiter
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Asynchronous click counting worker
//!
//! # Click Processing Flow
//!
//! 1. Redirect handler resolves a live link
//! 2. [`click_event::ClickEvent`] is queued with [`click_worker::enqueue_click`]
//! 3. [`click_worker::run_click_worker`] increments the counter with retries
//! 4. Failures are logged and never reach the client

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod rate_limiter;
pub mod repositories;
