use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ChannelError;
use super::tab::TabRecord;

/// Requests the shell can send to the host process.
///
/// Serialized in the host's wire form: `{"method":"tab_create","params":{..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum Command {
    TabCreate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    TabClose { label: String },
    TabSetActive { label: String },
    TabReorder { label: String, new_index: usize },
    TabDuplicate { label: String },
    TabGetAll,
    TabGetActive,
}

impl Command {
    pub fn method(&self) -> &'static str {
        match self {
            Command::TabCreate { .. } => "tab_create",
            Command::TabClose { .. } => "tab_close",
            Command::TabSetActive { .. } => "tab_set_active",
            Command::TabReorder { .. } => "tab_reorder",
            Command::TabDuplicate { .. } => "tab_duplicate",
            Command::TabGetAll => "tab_get_all",
            Command::TabGetActive => "tab_get_active",
        }
    }

    /// Shape of the successful reply this command expects.
    pub fn reply_kind(&self) -> ReplyKind {
        match self {
            Command::TabCreate { .. } | Command::TabDuplicate { .. } => ReplyKind::Tab,
            Command::TabGetAll => ReplyKind::Tabs,
            Command::TabGetActive => ReplyKind::ActiveLabel,
            Command::TabClose { .. }
            | Command::TabSetActive { .. }
            | Command::TabReorder { .. } => ReplyKind::Done,
        }
    }
}

/// Successful reply to a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandReply {
    Tab(TabRecord),
    Tabs(Vec<TabRecord>),
    ActiveLabel(Option<String>),
    Done,
}

impl CommandReply {
    pub fn into_tab(self, method: &str) -> Result<TabRecord, ChannelError> {
        match self {
            CommandReply::Tab(tab) => Ok(tab),
            other => Err(other.unexpected(method)),
        }
    }

    pub fn into_tabs(self, method: &str) -> Result<Vec<TabRecord>, ChannelError> {
        match self {
            CommandReply::Tabs(tabs) => Ok(tabs),
            other => Err(other.unexpected(method)),
        }
    }

    pub fn into_active_label(self, method: &str) -> Result<Option<String>, ChannelError> {
        match self {
            CommandReply::ActiveLabel(label) => Ok(label),
            other => Err(other.unexpected(method)),
        }
    }

    fn unexpected(&self, method: &str) -> ChannelError {
        ChannelError::UnexpectedReply {
            method: method.to_string(),
            reply: format!("{:?}", self),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Tab,
    Tabs,
    ActiveLabel,
    Done,
}

impl ReplyKind {
    /// Decode a raw JSON `result` into the reply shape expected for a method.
    pub fn decode(self, method: &str, result: Value) -> Result<CommandReply, ChannelError> {
        let codec = |e: serde_json::Error| {
            ChannelError::Codec(format!("bad {} result: {}", method, e))
        };
        match self {
            ReplyKind::Tab => serde_json::from_value(result).map(CommandReply::Tab).map_err(codec),
            ReplyKind::Tabs => serde_json::from_value(result).map(CommandReply::Tabs).map_err(codec),
            ReplyKind::ActiveLabel => serde_json::from_value(result)
                .map(CommandReply::ActiveLabel)
                .map_err(codec),
            ReplyKind::Done => Ok(CommandReply::Done),
        }
    }
}
