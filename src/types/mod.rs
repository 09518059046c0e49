// Aero shell shared type definitions
// Each submodule defines types used across the reconciliation core.

pub mod command;
pub mod errors;
pub mod event;
pub mod fact;
pub mod geometry;
pub mod settings;
pub mod state;
pub mod tab;
