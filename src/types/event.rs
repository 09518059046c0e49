use serde::{Deserialize, Serialize};

use super::fact::Fact;
use super::tab::{TabPatch, TabRecord};

/// Notifications pushed by the host process.
///
/// Wire form: `{"event":"tab_updated","payload":{"label":"tab-1","loading":false}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum HostEvent {
    TabCreated(TabRecord),
    TabClosed {
        label: String,
    },
    TabUpdated {
        label: String,
        #[serde(flatten)]
        patch: TabPatch,
    },
    /// Carries the full record: activation may coincide with fresh navigation state.
    TabActivated(TabRecord),
    TabReordered {
        label: String,
        old_index: usize,
        new_index: usize,
    },
    /// A page asked for a new window; the shell answers with a `tab_create`.
    OpenInNewTab(String),
}

impl HostEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::TabCreated(_) => "tab_created",
            HostEvent::TabClosed { .. } => "tab_closed",
            HostEvent::TabUpdated { .. } => "tab_updated",
            HostEvent::TabActivated(_) => "tab_activated",
            HostEvent::TabReordered { .. } => "tab_reordered",
            HostEvent::OpenInNewTab(_) => "open_in_new_tab",
        }
    }

    /// The registry fact this notification states, if it states one.
    /// `OpenInNewTab` is a request, not a fact.
    pub fn into_fact(self) -> Option<Fact> {
        match self {
            HostEvent::TabCreated(record) => Some(Fact::Created(record)),
            HostEvent::TabClosed { label } => Some(Fact::Closed(label)),
            HostEvent::TabUpdated { label, patch } => Some(Fact::Updated(label, patch)),
            HostEvent::TabActivated(record) => {
                Some(Fact::Activated(record.label.clone(), Some(record)))
            }
            HostEvent::TabReordered { label, new_index, .. } => {
                Some(Fact::Reordered(label, new_index))
            }
            HostEvent::OpenInNewTab(_) => None,
        }
    }
}
