//! Error types for clip export/import.

use std::path::PathBuf;

use thiserror::Error;

use crate::host::{ChannelId, CurveId, NodeId};

/// Failures reported by a [`SceneHost`](crate::host::SceneHost) binding.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("unknown channel {0:?}")]
    UnknownChannel(ChannelId),
    #[error("unknown curve {0:?}")]
    UnknownCurve(CurveId),
    #[error("channel '{0}' is locked")]
    LockedChannel(String),
}

/// Errors that abort a whole export or import. Per-item misses are not errors;
/// they are reported as [`Skip`](crate::report::Skip)s.
#[derive(Debug, Error)]
pub enum ClipError {
    #[error("-file(-f) must be specified with a file path")]
    MissingFilePath,
    #[error("clip file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("clip json parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("malformed clip document: {reason}")]
    MalformedDocument { reason: String },
    #[error("malformed curve: {reason}")]
    MalformedCurve { reason: String },
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl ClipError {
    pub(crate) fn malformed_curve(reason: impl Into<String>) -> Self {
        ClipError::MalformedCurve {
            reason: reason.into(),
        }
    }

    /// Prefix a curve error with the document location it came from.
    pub(crate) fn at(self, object: &str, attr: &str) -> Self {
        match self {
            ClipError::MalformedCurve { reason } => ClipError::MalformedCurve {
                reason: format!("{object}.{attr}: {reason}"),
            },
            other => other,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ClipError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClipError>;
