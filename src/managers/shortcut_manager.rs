//! Shortcut Manager for the Aero shell.
//!
//! Maps keyboard shortcuts to tab actions with conflict detection
//! and platform-specific modifier key adaptation.

use std::collections::HashMap;

use crate::managers::tab_cycler::LAST_TAB_POSITION;
use crate::types::errors::ShortcutError;

/// Tab-strip actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabAction {
    NewTab,
    CloseTab,
    NextTab,
    PreviousTab,
    DuplicateTab,
    /// 1-based position; `9` means the last tab.
    SelectPosition(usize),
}

impl TabAction {
    /// Stable name used in settings files, e.g. `"next_tab"`, `"select_tab_3"`.
    pub fn name(&self) -> String {
        match self {
            TabAction::NewTab => "new_tab".to_string(),
            TabAction::CloseTab => "close_tab".to_string(),
            TabAction::NextTab => "next_tab".to_string(),
            TabAction::PreviousTab => "prev_tab".to_string(),
            TabAction::DuplicateTab => "duplicate_tab".to_string(),
            TabAction::SelectPosition(n) => format!("select_tab_{}", n),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "new_tab" => Some(TabAction::NewTab),
            "close_tab" => Some(TabAction::CloseTab),
            "next_tab" => Some(TabAction::NextTab),
            "prev_tab" => Some(TabAction::PreviousTab),
            "duplicate_tab" => Some(TabAction::DuplicateTab),
            _ => name
                .strip_prefix("select_tab_")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| (1..=LAST_TAB_POSITION).contains(n))
                .map(TabAction::SelectPosition),
        }
    }
}

/// Trait defining shortcut management operations.
pub trait ShortcutManagerTrait {
    fn register_shortcut(&mut self, action: TabAction, keys: &str) -> Result<(), ShortcutError>;
    fn unregister_shortcut(&mut self, action: TabAction) -> Result<(), ShortcutError>;
    fn get_shortcut(&self, action: TabAction) -> Option<&str>;
    fn list_shortcuts(&self) -> &HashMap<String, String>;
    fn reset_to_defaults(&mut self);
    fn has_conflict(&self, keys: &str, exclude_action: Option<TabAction>) -> Option<String>;
    fn get_default_shortcuts(&self) -> HashMap<String, String>;
    fn resolve(&self, keys: &str) -> Option<TabAction>;
}

/// Shortcut manager with in-memory storage and platform adaptation.
pub struct ShortcutManager {
    /// Action name → key combo.
    shortcuts: HashMap<String, String>,
}

impl ShortcutManager {
    pub fn new() -> Self {
        let mut mgr = Self {
            shortcuts: HashMap::new(),
        };
        mgr.shortcuts = mgr.get_default_shortcuts();
        mgr
    }

    /// Apply `action name → keys` overrides from settings.
    ///
    /// Entries are applied in name order; bad entries are skipped and
    /// reported, the rest still take effect.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<ShortcutError> {
        let mut names: Vec<&String> = overrides.keys().collect();
        names.sort();

        let mut errors = Vec::new();
        for name in names {
            let result = match TabAction::from_name(name) {
                Some(action) => self.register_shortcut(action, &overrides[name]),
                None => Err(ShortcutError::UnknownAction(name.clone())),
            };
            if let Err(e) = result {
                errors.push(e);
            }
        }
        errors
    }

    /// Adapts modifier keys for the current platform.
    fn adapt_for_platform(keys: &str) -> String {
        if cfg!(target_os = "macos") {
            keys.replace("Ctrl+", "Cmd+")
        } else {
            keys.to_string()
        }
    }
}

impl Default for ShortcutManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutManagerTrait for ShortcutManager {
    fn register_shortcut(&mut self, action: TabAction, keys: &str) -> Result<(), ShortcutError> {
        if keys.trim().is_empty() {
            return Err(ShortcutError::InvalidKeys("Keys cannot be empty".to_string()));
        }
        if keys.ends_with('+') && !keys.ends_with("++") {
            return Err(ShortcutError::InvalidKeys(format!("'{}' has no key after the modifiers", keys)));
        }

        if let Some(conflicting_action) = self.has_conflict(keys, Some(action)) {
            return Err(ShortcutError::Conflict(format!(
                "'{}' is already bound to '{}'",
                keys, conflicting_action
            )));
        }

        self.shortcuts.insert(action.name(), Self::adapt_for_platform(keys));
        Ok(())
    }

    fn unregister_shortcut(&mut self, action: TabAction) -> Result<(), ShortcutError> {
        let name = action.name();
        self.shortcuts
            .remove(&name)
            .map(|_| ())
            .ok_or(ShortcutError::NotFound(name))
    }

    fn get_shortcut(&self, action: TabAction) -> Option<&str> {
        self.shortcuts.get(&action.name()).map(|s| s.as_str())
    }

    fn list_shortcuts(&self) -> &HashMap<String, String> {
        &self.shortcuts
    }

    fn reset_to_defaults(&mut self) {
        self.shortcuts = self.get_default_shortcuts();
    }

    fn has_conflict(&self, keys: &str, exclude_action: Option<TabAction>) -> Option<String> {
        let adapted = Self::adapt_for_platform(keys);
        let exclude = exclude_action.map(|a| a.name());
        self.shortcuts
            .iter()
            .find(|(action, bound)| **bound == adapted && exclude.as_ref() != Some(*action))
            .map(|(action, _)| action.clone())
    }

    fn get_default_shortcuts(&self) -> HashMap<String, String> {
        let mut defaults = vec![
            (TabAction::NewTab, "Ctrl+T".to_string()),
            (TabAction::CloseTab, "Ctrl+W".to_string()),
            (TabAction::NextTab, "Ctrl+Tab".to_string()),
            (TabAction::PreviousTab, "Ctrl+Shift+Tab".to_string()),
            (TabAction::DuplicateTab, "Ctrl+Shift+D".to_string()),
        ];
        defaults.extend(
            (1..=LAST_TAB_POSITION).map(|n| (TabAction::SelectPosition(n), format!("Ctrl+{}", n))),
        );

        defaults
            .into_iter()
            .map(|(a, k)| (a.name(), Self::adapt_for_platform(&k)))
            .collect()
    }

    /// The action bound to `keys`, if any.
    fn resolve(&self, keys: &str) -> Option<TabAction> {
        let adapted = Self::adapt_for_platform(keys);
        self.shortcuts
            .iter()
            .find(|(_, bound)| **bound == adapted)
            .and_then(|(action, _)| TabAction::from_name(action))
    }
}
