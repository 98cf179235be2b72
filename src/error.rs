use thiserror::Error;

/// Errors raised by a flow store backend.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("Flow '{0}' was not found in the store")]
    FlowNotFound(String),

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Errors that can occur while loading or saving a flow through the editor session.
#[derive(Error, Debug, Clone)]
pub enum LifecycleError {
    #[error(
        "Flow '{flow_id}' could not be fetched and no cached copy is held by its tab: {reason}"
    )]
    FlowUnavailable { flow_id: String, reason: String },

    #[error("Flow '{flow_id}' carries node context data that does not decode: {reason}")]
    InvalidContextData { flow_id: String, reason: String },

    #[error("No active flow tab to save")]
    NoActiveFlow,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors that can occur when reading or writing a workspace archive.
#[derive(Error, Debug, Clone)]
pub enum ArchiveError {
    #[error("Could not encode workspace archive: {0}")]
    Encode(String),

    #[error("Could not decode workspace archive: {0}")]
    Decode(String),

    #[error("Could not access archive file '{path}': {reason}")]
    Io { path: String, reason: String },
}
