use thiserror::Error;

// === ChannelError ===

/// Errors surfaced by the command channel to the caller that issued a command.
///
/// The registry itself never fails; these only describe host/transport trouble.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The host process answered with an error.
    #[error("Host rejected command: {0}")]
    Rejected(String),
    /// Writing to or reading from the transport failed.
    #[error("Channel transport error: {0}")]
    Transport(String),
    /// The host went away before replying.
    #[error("Host process disconnected")]
    Disconnected,
    /// A message could not be encoded or decoded.
    #[error("Channel codec error: {0}")]
    Codec(String),
    /// The reply did not have the shape the command expects.
    #[error("Unexpected reply to {method}: {reply}")]
    UnexpectedReply { method: String, reply: String },
}

impl From<std::io::Error> for ChannelError {
    fn from(e: std::io::Error) -> Self {
        ChannelError::Transport(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to shell settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === ShortcutError ===

/// Errors related to keyboard shortcut management.
#[derive(Debug, Error)]
pub enum ShortcutError {
    /// Shortcut for the given action was not found.
    #[error("Shortcut not found for action: {0}")]
    NotFound(String),
    /// The shortcut keys conflict with an existing binding.
    #[error("Shortcut conflict: {0}")]
    Conflict(String),
    /// The provided key combination is invalid.
    #[error("Invalid shortcut keys: {0}")]
    InvalidKeys(String),
    /// The action name does not name a tab action.
    #[error("Unknown shortcut action: {0}")]
    UnknownAction(String),
}
