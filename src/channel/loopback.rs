//! In-process host for demos and tests.
//!
//! Behaves like the real host process as seen over the two channels: it owns
//! the authoritative tab list, answers commands, and pushes the same
//! notifications the host would, in the same order. Page activity that the
//! real host observes from its webviews is driven by hand through
//! `page_started`, `page_finished`, `title_changed` and friends.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::debug;

use super::CommandChannel;
use crate::types::command::{Command, CommandReply};
use crate::types::errors::ChannelError;
use crate::types::event::HostEvent;
use crate::types::tab::{TabPatch, TabRecord, PLACEHOLDER_TITLE};

/// Per-tab back/forward history kept by the host.
#[derive(Debug, Clone, Default)]
struct NavHistory {
    stack: Vec<String>,
    pos: Option<usize>,
    /// A back/forward is in flight; the next finished load must not push.
    traversing: bool,
}

impl NavHistory {
    fn can_go_back(&self) -> bool {
        matches!(self.pos, Some(p) if p > 0)
    }

    fn can_go_forward(&self) -> bool {
        matches!(self.pos, Some(p) if p + 1 < self.stack.len())
    }

    /// Record a finished load of `url`.
    fn finished(&mut self, url: &str) {
        if self.traversing {
            self.traversing = false;
            return;
        }
        let current = self.pos.and_then(|p| self.stack.get(p)).map(String::as_str);
        if current != Some(url) {
            let next = self.pos.map_or(0, |p| p + 1);
            self.stack.truncate(next);
            self.stack.push(url.to_string());
            self.pos = Some(next);
        }
    }
}

#[derive(Debug, Default)]
struct HostTabs {
    tabs: Vec<TabRecord>,
    active: Option<String>,
    history: HashMap<String, NavHistory>,
    counter: u64,
    offline: bool,
}

impl HostTabs {
    fn position(&self, label: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.label == label)
    }

    fn tab_mut(&mut self, label: &str) -> Option<&mut TabRecord> {
        self.tabs.iter_mut().find(|t| t.label == label)
    }

    fn not_found(label: &str) -> ChannelError {
        ChannelError::Rejected(format!("Tab {} not found", label))
    }
}

/// Host process living in the same address space as the shell.
pub struct LoopbackHost {
    inner: Mutex<HostTabs>,
    events: mpsc::UnboundedSender<HostEvent>,
    default_url: String,
}

impl LoopbackHost {
    /// Create a host and the receiving end of its event channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        Self::with_default_url("about:blank")
    }

    /// Like [`new`](Self::new), opening `default_url` when `tab_create` has no url.
    pub fn with_default_url(default_url: &str) -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let host = Self {
            inner: Mutex::new(HostTabs::default()),
            events,
            default_url: default_url.to_string(),
        };
        (host, rx)
    }

    /// Make every command fail as if the host were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.with_tabs(|h| h.offline = offline);
    }

    /// Host-side tab order, for comparing against the shell's view.
    pub fn labels(&self) -> Vec<String> {
        self.with_tabs(|h| h.tabs.iter().map(|t| t.label.clone()).collect())
    }

    pub fn active_label(&self) -> Option<String> {
        self.with_tabs(|h| h.active.clone())
    }

    pub fn tab(&self, label: &str) -> Option<TabRecord> {
        self.with_tabs(|h| h.tabs.iter().find(|t| t.label == label).cloned())
    }

    /// A page began loading `url` in `label`.
    pub fn page_started(&self, label: &str, url: &str) {
        let patch = TabPatch::default().loading(true).url(url);
        self.update(label, patch);
    }

    /// A page finished loading `url`; updates back/forward history.
    pub fn page_finished(&self, label: &str, url: &str) {
        let flags = self.with_tabs(|h| {
            h.position(label)?;
            let nav = h.history.entry(label.to_string()).or_default();
            nav.finished(url);
            Some((nav.can_go_back(), nav.can_go_forward()))
        });
        if let Some((back, forward)) = flags {
            let patch = TabPatch::default().loading(false).url(url).history(back, forward);
            self.update(label, patch);
        }
    }

    /// Step back in `label`'s history. Returns false when there is nowhere to go.
    pub fn go_back(&self, label: &str) -> bool {
        self.traverse(label, -1)
    }

    pub fn go_forward(&self, label: &str) -> bool {
        self.traverse(label, 1)
    }

    fn traverse(&self, label: &str, delta: isize) -> bool {
        let moved = self.with_tabs(|h| {
            let nav = h.history.get_mut(label)?;
            let allowed = if delta < 0 { nav.can_go_back() } else { nav.can_go_forward() };
            if !allowed {
                return None;
            }
            let pos = nav.pos?.checked_add_signed(delta)?;
            nav.pos = Some(pos);
            nav.traversing = true;
            let url = nav.stack[pos].clone();
            Some((url, nav.can_go_back(), nav.can_go_forward()))
        });
        match moved {
            Some((url, back, forward)) => {
                self.update(label, TabPatch::default().loading(true).url(url).history(back, forward));
                true
            }
            None => false,
        }
    }

    pub fn title_changed(&self, label: &str, title: &str) {
        self.update(label, TabPatch::default().title(title));
    }

    /// Report the page favicon. Anything that is not an http(s) URL clears it.
    pub fn favicon_changed(&self, label: &str, favicon: &str) {
        let favicon = Some(favicon.to_string()).filter(|f| f.starts_with("http"));
        self.update(label, TabPatch::default().favicon(favicon));
    }

    /// A page tried to open a new window; the host asks the shell for a tab.
    pub fn request_new_window(&self, url: &str) {
        self.emit(HostEvent::OpenInNewTab(url.to_string()));
    }

    fn update(&self, label: &str, patch: TabPatch) {
        let known = self.with_tabs(|h| match h.tab_mut(label) {
            Some(tab) => {
                tab.apply_patch(&patch);
                true
            }
            None => false,
        });
        if known {
            self.emit(HostEvent::TabUpdated {
                label: label.to_string(),
                patch,
            });
        }
    }

    fn emit(&self, event: HostEvent) {
        debug!(event = event.name(), "loopback event");
        // No subscriber is fine: the host does not care who listens.
        let _ = self.events.send(event);
    }

    fn with_tabs<T>(&self, f: impl FnOnce(&mut HostTabs) -> T) -> T {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    fn normalize_url(&self, url: Option<String>) -> String {
        match url {
            None => self.default_url.clone(),
            Some(u) if u.is_empty() => self.default_url.clone(),
            Some(u) if u.starts_with("http://") || u.starts_with("https://") || u.starts_with("about:") => u,
            Some(u) => format!("https://{}", u),
        }
    }

    fn create(&self, url: Option<String>) -> TabRecord {
        let url = self.normalize_url(url);
        let record = self.with_tabs(|h| {
            h.counter += 1;
            let record = TabRecord::new(format!("tab-{}", h.counter))
                .with_url(url)
                .with_title(PLACEHOLDER_TITLE)
                .loading(true);
            h.tabs.push(record.clone());
            h.active = Some(record.label.clone());
            record
        });
        self.emit(HostEvent::TabCreated(record.clone()));
        record
    }

    fn close(&self, label: &str) {
        let (removed, next) = self.with_tabs(|h| {
            let Some(pos) = h.position(label) else {
                return (false, None);
            };
            let adjacent = if pos + 1 < h.tabs.len() {
                Some(h.tabs[pos + 1].label.clone())
            } else if pos > 0 {
                Some(h.tabs[pos - 1].label.clone())
            } else {
                None
            };
            let was_active = h.active.as_deref() == Some(label);
            h.tabs.remove(pos);
            h.history.remove(label);
            if was_active {
                h.active = adjacent.clone();
                (true, Some(adjacent))
            } else {
                (true, None)
            }
        });
        if !removed {
            return;
        }
        self.emit(HostEvent::TabClosed {
            label: label.to_string(),
        });
        match next {
            Some(Some(next_label)) => {
                if let Some(tab) = self.tab(&next_label) {
                    self.emit(HostEvent::TabActivated(tab));
                }
            }
            // The active tab was the last one; the host never leaves the strip empty.
            Some(None) => {
                self.create(None);
            }
            None => {}
        }
    }

    fn set_active(&self, label: &str) -> Result<(), ChannelError> {
        let tab = self.with_tabs(|h| {
            let tab = h.tabs.iter().find(|t| t.label == label).cloned();
            if tab.is_some() {
                h.active = Some(label.to_string());
            }
            tab
        });
        let tab = tab.ok_or_else(|| HostTabs::not_found(label))?;
        self.emit(HostEvent::TabActivated(tab));
        Ok(())
    }

    fn reorder(&self, label: &str, new_index: usize) -> Result<(), ChannelError> {
        let old_index = self.with_tabs(|h| {
            let old_index = h.position(label).ok_or_else(|| HostTabs::not_found(label))?;
            if new_index >= h.tabs.len() {
                return Err(ChannelError::Rejected("Invalid index".to_string()));
            }
            let tab = h.tabs.remove(old_index);
            h.tabs.insert(new_index, tab);
            Ok(old_index)
        })?;
        self.emit(HostEvent::TabReordered {
            label: label.to_string(),
            old_index,
            new_index,
        });
        Ok(())
    }
}

impl CommandChannel for LoopbackHost {
    async fn invoke(&self, command: Command) -> Result<CommandReply, ChannelError> {
        if self.with_tabs(|h| h.offline) {
            return Err(ChannelError::Transport("host unreachable".to_string()));
        }
        debug!(method = command.method(), "loopback command");

        match command {
            Command::TabCreate { url } => Ok(CommandReply::Tab(self.create(url))),
            Command::TabClose { label } => {
                self.close(&label);
                Ok(CommandReply::Done)
            }
            Command::TabSetActive { label } => self.set_active(&label).map(|_| CommandReply::Done),
            Command::TabReorder { label, new_index } => {
                self.reorder(&label, new_index).map(|_| CommandReply::Done)
            }
            Command::TabDuplicate { label } => {
                let source = self.tab(&label).ok_or_else(|| HostTabs::not_found(&label))?;
                Ok(CommandReply::Tab(self.create(Some(source.url))))
            }
            Command::TabGetAll => Ok(CommandReply::Tabs(self.with_tabs(|h| h.tabs.clone()))),
            Command::TabGetActive => Ok(CommandReply::ActiveLabel(self.active_label())),
        }
    }
}
