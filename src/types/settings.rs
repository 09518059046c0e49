use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level shell settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellSettings {
    pub tabs: TabSettings,
    pub drag: DragSettings,
    /// Action name → key combo overrides, e.g. `"next_tab": "Ctrl+PageDown"`.
    pub shortcuts: HashMap<String, String>,
    pub logging: LoggingSettings,
}

/// Tab lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TabSettings {
    /// URL sent with shell-initiated `tab_create`; `None` lets the host pick.
    pub new_tab_url: Option<String>,
    pub close_activation: CloseActivation,
    /// Create one tab at startup when the host reports none.
    pub ensure_tab_on_startup: bool,
}

impl Default for TabSettings {
    fn default() -> Self {
        Self {
            new_tab_url: None,
            close_activation: CloseActivation::Clear,
            ensure_tab_on_startup: true,
        }
    }
}

/// What the shell does after closing the active tab.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CloseActivation {
    /// Leave no tab active until the host says otherwise.
    Clear,
    /// Activate the right neighbour, else the left one.
    Adjacent,
}

/// Drag-reorder settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DragSettings {
    /// Pointer travel, in logical pixels, before a press becomes a drag.
    pub threshold_px: f64,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self { threshold_px: 5.0 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
