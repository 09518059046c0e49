//! Keyboard-style tab selection over a registry snapshot.
//!
//! These helpers only pick a target label; the caller issues the
//! `tab_set_active` command. Inputs that make no sense for the current strip
//! (no active tab, a single tab, an out-of-range position) select nothing.

use crate::types::state::BrowserState;

/// Position shortcut that always means "last tab".
pub const LAST_TAB_POSITION: usize = 9;

/// Label after the active one, wrapping to the first.
pub fn next_label(state: &BrowserState) -> Option<&str> {
    step(state, 1)
}

/// Label before the active one, wrapping to the last.
pub fn previous_label(state: &BrowserState) -> Option<&str> {
    step(state, -1)
}

fn step(state: &BrowserState, delta: isize) -> Option<&str> {
    let len = state.len();
    if len < 2 {
        return None;
    }
    let current = state.active_position()? as isize;
    let target = (current + delta).rem_euclid(len as isize) as usize;
    Some(state.tabs[target].label.as_str())
}

/// Label at 1-based `position`; `9` is always the last tab.
pub fn label_at_position(state: &BrowserState, position: usize) -> Option<&str> {
    let index = if position == LAST_TAB_POSITION {
        state.len().checked_sub(1)?
    } else if (1..=state.len()).contains(&position) {
        position - 1
    } else {
        return None;
    };
    Some(state.tabs[index].label.as_str())
}
