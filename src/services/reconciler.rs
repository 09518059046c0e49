//! Reconciliation merge for the tab registry.
//!
//! `merge` is the single place where browser state changes. It is total over
//! [`Fact`]: facts about labels the state does not know are absorbed as
//! no-ops, because replies and events race each other and an unknown label is
//! the expected outcome of that race rather than an error.

use std::collections::HashSet;

use crate::types::fact::Fact;
use crate::types::state::BrowserState;
use crate::types::tab::{TabPatch, TabRecord};

/// Apply one fact to `state` and return the new state.
///
/// Idempotent for every fact. Field-scoped facts about different labels
/// commute.
pub fn merge(mut state: BrowserState, fact: &Fact) -> BrowserState {
    match fact {
        Fact::Created(record) => {
            // First reconciled copy wins on content; later copies only re-activate.
            if !state.contains(&record.label) {
                state.tabs.push(record.clone());
            }
            state.active_label = Some(record.label.clone());
        }
        Fact::Closed(label) => {
            if let Some(pos) = state.position_of(label) {
                state.tabs.remove(pos);
            }
            if state.active_label.as_deref() == Some(label.as_str()) {
                state.active_label = None;
            }
        }
        Fact::Updated(label, patch) => {
            patch_tab(&mut state, label, patch);
        }
        Fact::Activated(label, record) => {
            if state.contains(label) {
                if let Some(record) = record {
                    patch_tab(&mut state, label, &TabPatch::from(record));
                }
                state.active_label = Some(label.clone());
            }
        }
        Fact::Deactivated(label) => {
            if state.active_label.as_deref() == Some(label.as_str()) {
                state.active_label = None;
            }
        }
        Fact::Reordered(label, position) => {
            if let Some(from) = state.position_of(label) {
                let to = (*position).min(state.tabs.len() - 1);
                if from != to {
                    let tab = state.tabs.remove(from);
                    state.tabs.insert(to, tab);
                }
            }
        }
        Fact::Snapshot(tabs, active_label) => {
            state = snapshot(tabs, active_label.as_deref());
        }
    }
    state
}

fn patch_tab(state: &mut BrowserState, label: &str, patch: &TabPatch) {
    if let Some(tab) = state.tabs.iter_mut().find(|t| t.label == label) {
        tab.apply_patch(patch);
    }
}

/// Build a state from a host snapshot, repairing anything that would break
/// the registry invariants: duplicate labels keep their first occurrence and
/// an active label the snapshot does not contain is dropped.
fn snapshot(tabs: &[TabRecord], active_label: Option<&str>) -> BrowserState {
    let mut seen = HashSet::new();
    let tabs: Vec<TabRecord> = tabs
        .iter()
        .filter(|t| seen.insert(t.label.as_str()))
        .cloned()
        .collect();
    let active_label = active_label
        .filter(|label| seen.contains(label))
        .map(str::to_string);
    BrowserState { tabs, active_label }
}

/// Check the registry invariants: unique labels and a valid active pointer.
pub fn is_consistent(state: &BrowserState) -> bool {
    let mut seen = HashSet::new();
    let unique = state.tabs.iter().all(|t| seen.insert(t.label.as_str()));
    let active_ok = match &state.active_label {
        Some(label) => seen.contains(label.as_str()),
        None => true,
    };
    unique && active_ok
}
