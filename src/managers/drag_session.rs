//! Pointer-driven tab reordering.
//!
//! The session never touches the registry. It only tracks which tab is being
//! dragged and which tab is under the pointer, and on release tells the caller
//! which single reorder command to send. The new order shows up later as a
//! reorder fact from the host.

use tracing::debug;

use crate::types::geometry::{Point, TabBounds};
use crate::types::state::BrowserState;

/// Where the gesture currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPhase {
    Idle,
    /// Pressed on a tab, not yet moved past the threshold.
    Armed { label: String, origin: Point },
    Dragging { label: String, target: Option<String> },
}

/// What the caller should do once the pointer is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Released before the threshold: a plain click on `label`.
    Click(String),
    /// Move `label` to zero-based `position`.
    Reorder { label: String, position: usize },
    Nothing,
}

/// Transient drag-reorder state machine: `Idle → Armed → Dragging → Idle`.
#[derive(Debug, Clone)]
pub struct DragSession {
    threshold_px: f64,
    phase: DragPhase,
}

impl DragSession {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px: threshold_px.max(0.0),
            phase: DragPhase::Idle,
        }
    }

    pub fn threshold_px(&self) -> f64 {
        self.threshold_px
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == DragPhase::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Label being moved; none until the threshold is crossed.
    pub fn dragging_label(&self) -> Option<&str> {
        match &self.phase {
            DragPhase::Dragging { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Label currently under the pointer, when it differs from the dragged one.
    pub fn drag_target_label(&self) -> Option<&str> {
        match &self.phase {
            DragPhase::Dragging { target, .. } => target.as_deref(),
            _ => None,
        }
    }

    /// Press on the tab `label`. A press while another gesture is live
    /// restarts the session.
    pub fn pointer_down(&mut self, label: impl Into<String>, at: Point) {
        self.phase = DragPhase::Armed {
            label: label.into(),
            origin: at,
        };
    }

    /// Track the pointer. `tabs` are the tab elements as currently drawn.
    pub fn pointer_move(&mut self, at: Point, tabs: &[TabBounds]) {
        let started = match &self.phase {
            DragPhase::Armed { origin, .. } if origin.distance_to(at) <= self.threshold_px => return,
            DragPhase::Armed { label, .. } => Some(label.clone()),
            _ => None,
        };
        if let Some(label) = started {
            debug!(label = %label, "drag started");
            self.phase = DragPhase::Dragging { label, target: None };
        }

        if let DragPhase::Dragging { label, target } = &mut self.phase {
            match tabs.iter().find(|t| t.rect.contains(at)) {
                Some(hit) if hit.label == *label => *target = None,
                Some(hit) => {
                    if target.as_deref() != Some(hit.label.as_str()) {
                        *target = Some(hit.label.clone());
                    }
                }
                // Off the strip: keep the last tab hovered.
                None => {}
            }
        }
    }

    /// Release the pointer. The session is idle afterwards whatever happens.
    ///
    /// `state` is the registry's current snapshot; the target's position is
    /// read from it at release time so the command agrees with the registry.
    pub fn pointer_up(&mut self, state: &BrowserState) -> DragOutcome {
        match std::mem::replace(&mut self.phase, DragPhase::Idle) {
            DragPhase::Idle => DragOutcome::Nothing,
            DragPhase::Armed { label, .. } => DragOutcome::Click(label),
            DragPhase::Dragging { label, target } => {
                let position = target
                    .filter(|t| *t != label && state.contains(&label))
                    .and_then(|t| state.position_of(&t));
                match position {
                    Some(position) => DragOutcome::Reorder { label, position },
                    None => {
                        debug!(label = %label, "drag ended without a target");
                        DragOutcome::Nothing
                    }
                }
            }
        }
    }

    /// Abandon the gesture (focus loss, escape) without any outcome.
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new(5.0)
    }
}
