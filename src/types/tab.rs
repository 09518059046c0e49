use serde::{Deserialize, Deserializer, Serialize};

/// Title shown until the host reports a real one.
pub const PLACEHOLDER_TITLE: &str = "New Tab";

/// One open content surface, as reported by the host process.
///
/// `label` is assigned by the host at creation and is the only key used to
/// join facts arriving over the command and event channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabRecord {
    pub label: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "placeholder_title")]
    pub title: String,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(default)]
    pub can_go_back: Option<bool>,
    #[serde(default)]
    pub can_go_forward: Option<bool>,
}

fn placeholder_title() -> String {
    PLACEHOLDER_TITLE.to_string()
}

impl TabRecord {
    /// A freshly created tab: empty url, placeholder title, no navigation state.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: String::new(),
            title: placeholder_title(),
            is_loading: false,
            favicon: None,
            can_go_back: None,
            can_go_forward: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }

    /// Overwrite only the fields present in `patch`.
    pub fn apply_patch(&mut self, patch: &TabPatch) {
        if let Some(url) = &patch.url {
            self.url = url.clone();
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(loading) = patch.is_loading {
            self.is_loading = loading;
        }
        if let Some(favicon) = &patch.favicon {
            self.favicon = favicon.clone();
        }
        if let Some(back) = patch.can_go_back {
            self.can_go_back = Some(back);
        }
        if let Some(forward) = patch.can_go_forward {
            self.can_go_forward = Some(forward);
        }
    }
}

/// Partial tab fields carried by a `tab_updated` notification.
///
/// Loading state, url, title, favicon and history flags arrive independently
/// and out of order, so every field is optional. `favicon` distinguishes
/// "not reported" (`None`) from "reported as cleared" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabPatch {
    #[serde(rename = "loading", default, skip_serializing_if = "Option::is_none")]
    pub is_loading: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub favicon: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_go_back: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_go_forward: Option<bool>,
}

/// Marks a field as present even when its value is `null`.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TabPatch {
    pub fn is_empty(&self) -> bool {
        *self == TabPatch::default()
    }

    pub fn loading(mut self, is_loading: bool) -> Self {
        self.is_loading = Some(is_loading);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn favicon(mut self, favicon: Option<String>) -> Self {
        self.favicon = Some(favicon);
        self
    }

    pub fn history(mut self, can_go_back: bool, can_go_forward: bool) -> Self {
        self.can_go_back = Some(can_go_back);
        self.can_go_forward = Some(can_go_forward);
        self
    }
}

impl From<&TabRecord> for TabPatch {
    /// Every field of a full record is authoritative, except history flags
    /// the host has not reported yet.
    fn from(record: &TabRecord) -> Self {
        Self {
            is_loading: Some(record.is_loading),
            url: Some(record.url.clone()),
            title: Some(record.title.clone()),
            favicon: Some(record.favicon.clone()),
            can_go_back: record.can_go_back,
            can_go_forward: record.can_go_forward,
        }
    }
}
