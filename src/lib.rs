//! Aero shell: tab state reconciliation core for a browser shell.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod channel;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;
