//! Generation errors

use compact_str::CompactString;

/// Errors aborting a generation call
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The initial conversation was empty
    #[error("messages cannot be empty")]
    EmptyMessages,

    /// The transport failed to produce a turn
    #[error("failed to generate text: {0}")]
    Transport(#[source] anyhow::Error),

    /// A tool raised an error while executing
    #[error("tool `{name}` failed: {source}")]
    Tool {
        /// The name of the failing tool
        name: CompactString,
        /// The error raised by the tool
        #[source]
        source: anyhow::Error,
    },
}

/// Result alias for generation calls
pub type Result<T> = std::result::Result<T, Error>;
