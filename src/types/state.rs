use serde::{Deserialize, Serialize};

use super::tab::TabRecord;

/// Contents of the tab registry: ordered tabs plus the active-tab pointer.
///
/// Sequence order is the authoritative tab index. The active tab is derived
/// from `active_label` alone; records carry no "active" flag of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserState {
    pub tabs: Vec<TabRecord>,
    pub active_label: Option<String>,
}

impl BrowserState {
    pub fn new(tabs: Vec<TabRecord>, active_label: Option<String>) -> Self {
        Self { tabs, active_label }
    }

    /// Zero-based position of `label` in the tab order.
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.label == label)
    }

    pub fn tab(&self, label: &str) -> Option<&TabRecord> {
        self.tabs.iter().find(|t| t.label == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position_of(label).is_some()
    }

    /// The record matching `active_label`, if any.
    pub fn active_tab(&self) -> Option<&TabRecord> {
        self.active_label.as_deref().and_then(|label| self.tab(label))
    }

    pub fn active_position(&self) -> Option<usize> {
        self.active_label
            .as_deref()
            .and_then(|label| self.position_of(label))
    }

    pub fn labels(&self) -> Vec<&str> {
        self.tabs.iter().map(|t| t.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Neighbour that takes over when `label` goes away: right, else left.
    pub fn adjacent_to(&self, label: &str) -> Option<&str> {
        let pos = self.position_of(label)?;
        if pos + 1 < self.tabs.len() {
            Some(self.tabs[pos + 1].label.as_str())
        } else if pos > 0 {
            Some(self.tabs[pos - 1].label.as_str())
        } else {
            None
        }
    }
}
