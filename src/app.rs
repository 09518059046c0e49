//! App Core for the Aero shell.
//!
//! Central struct wiring the tab registry, drag session, shortcuts and
//! settings to an injected host command channel. Everything runs on one
//! cooperative event loop: registry borrows never live across an `.await`, so
//! events and other commands interleave freely while a command is pending.

use std::cell::RefCell;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::channel::{CommandChannel, EventChannel};
use crate::managers::drag_session::{DragOutcome, DragSession};
use crate::managers::shortcut_manager::{ShortcutManager, ShortcutManagerTrait, TabAction};
use crate::managers::tab_cycler;
use crate::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crate::types::command::{Command, CommandReply};
use crate::types::errors::ChannelError;
use crate::types::event::HostEvent;
use crate::types::fact::Fact;
use crate::types::geometry::{Point, TabBounds};
use crate::types::settings::{CloseActivation, ShellSettings};
use crate::types::state::BrowserState;
use crate::types::tab::TabRecord;

/// The shell's tab controller.
///
/// Owns the registry exclusively; callers read snapshots and issue intents.
/// Command failures are returned to the caller and logged, and never mutate
/// the registry beyond compensating an optimistic activation.
pub struct App<C> {
    channel: C,
    registry: RefCell<TabRegistry>,
    drag: RefCell<DragSession>,
    shortcuts: ShortcutManager,
    settings: ShellSettings,
}

impl<C: CommandChannel> App<C> {
    /// Creates a new App talking to the host through `channel`.
    pub fn new(channel: C, settings: ShellSettings) -> Self {
        let mut shortcuts = ShortcutManager::new();
        for err in shortcuts.apply_overrides(&settings.shortcuts) {
            warn!(error = %err, "ignoring shortcut override");
        }
        Self {
            channel,
            registry: RefCell::new(TabRegistry::new()),
            drag: RefCell::new(DragSession::new(settings.drag.threshold_px)),
            shortcuts,
            settings,
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn settings(&self) -> &ShellSettings {
        &self.settings
    }

    pub fn shortcuts(&self) -> &ShortcutManager {
        &self.shortcuts
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutManager {
        &mut self.shortcuts
    }

    // ─── Reads ───

    /// Latest committed state.
    pub fn snapshot(&self) -> BrowserState {
        self.registry.borrow().current_snapshot().clone()
    }

    /// The active tab's record, consistent with [`snapshot`](Self::snapshot).
    pub fn active_tab(&self) -> Option<TabRecord> {
        self.registry.borrow().active_tab().cloned()
    }

    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.registry.borrow().position_of(label)
    }

    /// Watch every committed state change.
    pub fn subscribe(&self) -> watch::Receiver<BrowserState> {
        self.registry.borrow().subscribe()
    }

    /// Merge a fact directly. Returns whether the state changed.
    pub fn apply(&self, fact: Fact) -> bool {
        self.registry.borrow_mut().apply(fact)
    }

    async fn request(&self, command: Command) -> Result<CommandReply, ChannelError> {
        let method = command.method();
        debug!(method, "command sent");
        match self.channel.invoke(command).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                warn!(method, error = %e, "command failed");
                Err(e)
            }
        }
    }

    // ─── Lifecycle ───

    /// Load the host's tabs into the registry; open one tab if there are none.
    pub async fn startup(&self) -> Result<(), ChannelError> {
        let tabs = self.request(Command::TabGetAll).await?.into_tabs("tab_get_all")?;
        let active = self
            .request(Command::TabGetActive)
            .await?
            .into_active_label("tab_get_active")?;

        info!(tabs = tabs.len(), active = ?active, "loaded host snapshot");
        self.apply(Fact::Snapshot(tabs, active));

        if self.settings.tabs.ensure_tab_on_startup && self.registry.borrow().is_empty() {
            self.create_tab(None).await?;
        }
        Ok(())
    }

    // ─── Tab commands ───

    /// Ask the host for a new tab. `None` uses the configured new-tab URL.
    pub async fn create_tab(&self, url: Option<String>) -> Result<TabRecord, ChannelError> {
        let url = url.or_else(|| self.settings.tabs.new_tab_url.clone());
        let tab = self
            .request(Command::TabCreate { url })
            .await?
            .into_tab("tab_create")?;
        self.apply(Fact::Created(tab.clone()));
        Ok(tab)
    }

    pub async fn duplicate_tab(&self, label: &str) -> Result<TabRecord, ChannelError> {
        let tab = self
            .request(Command::TabDuplicate {
                label: label.to_string(),
            })
            .await?
            .into_tab("tab_duplicate")?;
        self.apply(Fact::Created(tab.clone()));
        Ok(tab)
    }

    /// Close `label`. With [`CloseActivation::Adjacent`], closing the active
    /// tab then activates its right neighbour, else its left one.
    pub async fn close_tab(&self, label: &str) -> Result<(), ChannelError> {
        let successor = {
            let registry = self.registry.borrow();
            let state = registry.current_snapshot();
            let closing_active = state.active_label.as_deref() == Some(label);
            match self.settings.tabs.close_activation {
                CloseActivation::Adjacent if closing_active => {
                    state.adjacent_to(label).map(str::to_string)
                }
                _ => None,
            }
        };

        self.request(Command::TabClose {
            label: label.to_string(),
        })
        .await?;
        self.apply(Fact::Closed(label.to_string()));

        // The close is committed from here on; a failed follow-up activation
        // leaves the strip without an active tab but does not fail the close.
        if let Some(next) = successor {
            let still_needed = {
                let registry = self.registry.borrow();
                registry.active_label().is_none() && registry.position_of(&next).is_some()
            };
            if still_needed {
                if let Err(e) = self.set_active(&next).await {
                    warn!(closed = label, next = %next, error = %e, "could not activate neighbour after close");
                }
            }
        }
        Ok(())
    }

    /// Activate `label` locally right away, then tell the host.
    ///
    /// If the host refuses and nothing newer has changed the active tab in the
    /// meantime, the previous active tab is restored, or no tab is active when
    /// there was none (or it has been closed since).
    pub async fn set_active(&self, label: &str) -> Result<(), ChannelError> {
        let previous = self.registry.borrow().active_label().map(str::to_string);
        self.apply(Fact::Activated(label.to_string(), None));

        let result = self
            .request(Command::TabSetActive {
                label: label.to_string(),
            })
            .await;

        if result.is_err() && self.registry.borrow().active_label() == Some(label) {
            let compensation = match previous {
                Some(previous) if previous == label => None,
                Some(previous) if self.registry.borrow().position_of(&previous).is_some() => {
                    Some(Fact::Activated(previous, None))
                }
                _ => Some(Fact::Deactivated(label.to_string())),
            };
            if let Some(fact) = compensation {
                debug!(label, undo = fact.kind(), "rolling back optimistic activation");
                self.apply(fact);
            }
        }
        result.map(|_| ())
    }

    /// Move `label` to zero-based `position`. The registry changes only once
    /// the host confirms.
    pub async fn reorder(&self, label: &str, position: usize) -> Result<(), ChannelError> {
        self.request(Command::TabReorder {
            label: label.to_string(),
            new_index: position,
        })
        .await?;
        self.apply(Fact::Reordered(label.to_string(), position));
        Ok(())
    }

    // ─── Cyclic selection ───

    pub async fn next(&self) -> Result<(), ChannelError> {
        let target = tab_cycler::next_label(self.registry.borrow().current_snapshot()).map(str::to_string);
        self.select(target).await
    }

    pub async fn previous(&self) -> Result<(), ChannelError> {
        let target =
            tab_cycler::previous_label(self.registry.borrow().current_snapshot()).map(str::to_string);
        self.select(target).await
    }

    /// 1-based; `9` always picks the last tab; out of range does nothing.
    pub async fn activate_by_position(&self, position: usize) -> Result<(), ChannelError> {
        let target = tab_cycler::label_at_position(self.registry.borrow().current_snapshot(), position)
            .map(str::to_string);
        self.select(target).await
    }

    async fn select(&self, target: Option<String>) -> Result<(), ChannelError> {
        match target {
            Some(label) => self.set_active(&label).await,
            None => Ok(()),
        }
    }

    // ─── Drag reorder ───

    pub fn pointer_down(&self, label: &str, at: Point) {
        self.drag.borrow_mut().pointer_down(label, at);
    }

    pub fn pointer_move(&self, at: Point, tabs: &[TabBounds]) {
        self.drag.borrow_mut().pointer_move(at, tabs);
    }

    /// Finish the gesture: a click activates the tab, a completed drag sends
    /// one reorder command.
    pub async fn pointer_up(&self) -> Result<DragOutcome, ChannelError> {
        let outcome = {
            let registry = self.registry.borrow();
            let mut drag = self.drag.borrow_mut();
            drag.pointer_up(registry.current_snapshot())
        };
        match &outcome {
            DragOutcome::Click(label) => self.set_active(label).await?,
            DragOutcome::Reorder { label, position } => self.reorder(label, *position).await?,
            DragOutcome::Nothing => {}
        }
        Ok(outcome)
    }

    pub fn pointer_cancel(&self) {
        self.drag.borrow_mut().cancel();
    }

    /// Copy of the drag session, for drawing drag feedback.
    pub fn drag_session(&self) -> DragSession {
        self.drag.borrow().clone()
    }

    // ─── Events ───

    /// Reconcile one host notification. Never fails: an `open_in_new_tab`
    /// whose `tab_create` fails is logged and dropped.
    ///
    /// This awaits the `tab_create` an `open_in_new_tab` triggers;
    /// [`run_events`](Self::run_events) and [`pump_pending`](Self::pump_pending)
    /// keep reconciling other events while such a create is outstanding.
    pub async fn handle_event(&self, event: HostEvent) {
        debug!(event = event.name(), "event received");
        match event {
            HostEvent::OpenInNewTab(url) => self.open_in_new_tab(url).await,
            other => self.reconcile(other),
        }
    }

    fn reconcile(&self, event: HostEvent) {
        if let Some(fact) = event.into_fact() {
            self.apply(fact);
        }
    }

    async fn open_in_new_tab(&self, url: String) {
        if let Err(e) = self.create_tab(Some(url)).await {
            warn!(error = %e, "could not open requested tab");
        }
    }

    /// Process events until the host closes the event channel and every
    /// `tab_create` requested by an `open_in_new_tab` has settled.
    ///
    /// `next_event` is raced against outstanding creates, so it must be
    /// cancel-safe (the mpsc receivers are).
    pub async fn run_events<E: EventChannel>(&self, mut events: E) {
        let mut opening = FuturesUnordered::new();
        let mut connected = true;
        loop {
            tokio::select! {
                event = events.next_event(), if connected => match event {
                    Some(event) => {
                        debug!(event = event.name(), "event received");
                        match event {
                            HostEvent::OpenInNewTab(url) => opening.push(self.open_in_new_tab(url)),
                            other => self.reconcile(other),
                        }
                    }
                    None => {
                        info!("host event channel closed");
                        connected = false;
                    }
                },
                Some(()) = opening.next(), if !opening.is_empty() => {}
                else => break,
            }
        }
    }

    /// Handle every event already queued on `events` without waiting for new
    /// ones. Creates requested by `open_in_new_tab` run together once the
    /// queue is drained, and whatever they cause is drained as well.
    /// Returns how many events were handled.
    pub async fn pump_pending(&self, events: &mut mpsc::UnboundedReceiver<HostEvent>) -> usize {
        let mut handled = 0;
        loop {
            let mut opening = FuturesUnordered::new();
            while let Ok(event) = events.try_recv() {
                handled += 1;
                debug!(event = event.name(), "event received");
                match event {
                    HostEvent::OpenInNewTab(url) => opening.push(self.open_in_new_tab(url)),
                    other => self.reconcile(other),
                }
            }
            if opening.is_empty() {
                return handled;
            }
            while opening.next().await.is_some() {}
        }
    }

    // ─── Shortcuts ───

    /// Run the tab action bound to `keys`. Returns `Ok(false)` when nothing
    /// is bound.
    pub async fn dispatch_shortcut(&self, keys: &str) -> Result<bool, ChannelError> {
        let Some(action) = self.shortcuts.resolve(keys) else {
            return Ok(false);
        };
        debug!(keys, action = %action.name(), "shortcut");
        let active = self.registry.borrow().active_label().map(str::to_string);

        match action {
            TabAction::NewTab => {
                self.create_tab(None).await?;
            }
            TabAction::CloseTab => {
                if let Some(label) = active {
                    self.close_tab(&label).await?;
                }
            }
            TabAction::DuplicateTab => {
                if let Some(label) = active {
                    self.duplicate_tab(&label).await?;
                }
            }
            TabAction::NextTab => self.next().await?,
            TabAction::PreviousTab => self.previous().await?,
            TabAction::SelectPosition(n) => self.activate_by_position(n).await?,
        }
        Ok(true)
    }
}
