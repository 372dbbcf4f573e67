/// Errors surfaced by the chat core, its store, transport and backend client.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("chat cache is corrupt: {0}")]
    CacheCorrupt(serde_json::Error),

    #[error("failed to encode chat log: {0}")]
    Encode(serde_json::Error),

    #[error("real-time channel is not connected")]
    TransportUnavailable,

    #[error("backend request failed: {0}")]
    Backend(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChatError>;
