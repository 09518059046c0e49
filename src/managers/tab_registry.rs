use tokio::sync::watch;
use tracing::trace;

use crate::services::reconciler::merge;
use crate::types::fact::Fact;
use crate::types::state::BrowserState;
use crate::types::tab::TabRecord;

/// Trait defining the tab registry interface.
pub trait TabRegistryTrait {
    fn apply(&mut self, fact: Fact) -> bool;
    fn current_snapshot(&self) -> &BrowserState;
    fn position_of(&self, label: &str) -> Option<usize>;
    fn tab(&self, label: &str) -> Option<&TabRecord>;
    fn active_tab(&self) -> Option<&TabRecord>;
    fn active_label(&self) -> Option<&str>;
    fn labels(&self) -> Vec<&str>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
}

/// Owner of the shell's browser state.
///
/// Every change goes through [`merge`]; readers get the latest committed
/// state synchronously via [`TabRegistryTrait::current_snapshot`] or watch it
/// change through [`TabRegistry::subscribe`].
pub struct TabRegistry {
    state: BrowserState,
    published: watch::Sender<BrowserState>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::with_state(BrowserState::default())
    }

    pub fn with_state(state: BrowserState) -> Self {
        let (published, _) = watch::channel(state.clone());
        Self { state, published }
    }

    /// Receiver that observes every committed state.
    pub fn subscribe(&self) -> watch::Receiver<BrowserState> {
        self.published.subscribe()
    }
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TabRegistryTrait for TabRegistry {
    /// Merge `fact` into the state. Returns whether anything changed;
    /// subscribers are only notified on change.
    fn apply(&mut self, fact: Fact) -> bool {
        let next = merge(self.state.clone(), &fact);
        if next == self.state {
            trace!(kind = fact.kind(), label = ?fact.label(), "fact absorbed");
            return false;
        }
        trace!(
            kind = fact.kind(),
            label = ?fact.label(),
            tabs = next.len(),
            active = ?next.active_label,
            "fact applied"
        );
        self.state = next;
        self.published.send_replace(self.state.clone());
        true
    }

    fn current_snapshot(&self) -> &BrowserState {
        &self.state
    }

    fn position_of(&self, label: &str) -> Option<usize> {
        self.state.position_of(label)
    }

    fn tab(&self, label: &str) -> Option<&TabRecord> {
        self.state.tab(label)
    }

    fn active_tab(&self) -> Option<&TabRecord> {
        self.state.active_tab()
    }

    fn active_label(&self) -> Option<&str> {
        self.state.active_label.as_deref()
    }

    fn labels(&self) -> Vec<&str> {
        self.state.labels()
    }

    fn len(&self) -> usize {
        self.state.len()
    }

    fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}
