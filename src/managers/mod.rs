// Aero shell state managers
// Managers handle stateful operations: the tab registry, selection, drag reorder, shortcuts.

pub mod drag_session;
pub mod shortcut_manager;
pub mod tab_cycler;
pub mod tab_registry;
