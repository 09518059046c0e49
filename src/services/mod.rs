// Aero shell services
// Stateless or self-contained engines: reconciliation merge and settings persistence.

pub mod reconciler;
pub mod settings_engine;
