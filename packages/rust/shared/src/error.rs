//! Error types for CrowdMint.
//!
//! Library crates use [`CrowdMintError`] via `thiserror`. The aggregation
//! layer deliberately converts most of these into fallback behavior instead
//! of surfacing them; see `crowdmint-catalog`.

use std::path::PathBuf;

/// Top-level error type for all CrowdMint operations.
#[derive(Debug, thiserror::Error)]
pub enum CrowdMintError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Transport or JSON-RPC-level failure of a registry call.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// Malformed returndata, hex payload, or seed record.
    #[error("decode error: {0}")]
    Decode(String),

    /// The registry has no campaign with this id (out of range, or the
    /// contract reverted the lookup).
    #[error("campaign {id} not found")]
    NotFound { id: u64 },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CrowdMintError>;

impl CrowdMintError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an rpc error from any displayable message.
    pub fn rpc(msg: impl Into<String>) -> Self {
        Self::Rpc(msg.into())
    }

    /// Create a decode error from any displayable message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
