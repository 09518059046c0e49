use super::tab::{TabPatch, TabRecord};

/// An atomic, idempotent statement about the host's tab state.
///
/// Command replies and event notifications are both turned into facts and fed
/// through the same merge, so the order in which the two channels deliver them
/// does not matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    /// The host created a tab. Creation always activates it.
    Created(TabRecord),
    /// The host closed a tab.
    Closed(String),
    /// Some fields of a tab changed.
    Updated(String, TabPatch),
    /// A tab became active, optionally with fresh navigation state.
    Activated(String, Option<TabRecord>),
    /// Undo an optimistic activation of the tab: clears the active tab only
    /// while it is still this one.
    Deactivated(String),
    /// The host moved a tab to a new zero-based position.
    Reordered(String, usize),
    /// Wholesale replacement, used once at startup.
    Snapshot(Vec<TabRecord>, Option<String>),
}

impl Fact {
    /// Label the fact is about; `None` for snapshots.
    pub fn label(&self) -> Option<&str> {
        match self {
            Fact::Created(record) => Some(&record.label),
            Fact::Closed(label)
            | Fact::Updated(label, _)
            | Fact::Activated(label, _)
            | Fact::Deactivated(label)
            | Fact::Reordered(label, _) => Some(label),
            Fact::Snapshot(..) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Fact::Created(_) => "created",
            Fact::Closed(_) => "closed",
            Fact::Updated(..) => "updated",
            Fact::Activated(..) => "activated",
            Fact::Deactivated(_) => "deactivated",
            Fact::Reordered(..) => "reordered",
            Fact::Snapshot(..) => "snapshot",
        }
    }
}
