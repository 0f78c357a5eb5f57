//! Outcome reports for export/import.
//!
//! Per-item misses never abort an operation; they are collected here as
//! [`Skip`]s (and logged) so callers can surface a count or list.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::change::Transaction;
use crate::document::ClipDocument;
use crate::resolve::Resolution;

/// One item left out of an export or import.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Skip {
    /// No document entry for the object, not even under its mirrored name.
    UnresolvedObject { object: String },
    /// The object has no attribute of that name.
    MissingAttribute { object: String, attribute: String },
    /// The destination channel is locked.
    LockedChannel { object: String, attribute: String },
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::UnresolvedObject { object } => write!(f, "Cannot find '{object}' in clip"),
            Skip::MissingAttribute { object, attribute } => {
                write!(f, "Cannot find '{object}.{attribute}'")
            }
            Skip::LockedChannel { object, attribute } => {
                write!(f, "'{object}.{attribute}' is locked")
            }
        }
    }
}

/// Which export path ran.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExportMode {
    /// Current static values of keyable channels.
    Pose,
    /// Curves windowed to `[start, end]`.
    Range { start: f64, end: f64 },
}

#[derive(Clone, Debug)]
pub struct ExportReport {
    pub mode: ExportMode,
    pub document: ClipDocument,
    /// Number of curves written across all objects.
    pub curves: usize,
    /// Number of static values written across all objects.
    pub statics: usize,
}

/// A selected object and the document key it was matched to.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedObject {
    pub object: String,
    pub resolution: Resolution,
}

#[derive(Debug)]
pub struct ImportReport {
    pub resolved: Vec<ResolvedObject>,
    pub skipped: Vec<Skip>,
    /// Time offset applied to every decoded key.
    pub time_offset: f64,
    pub curves_created: usize,
    pub curves_merged: usize,
    pub values_set: usize,
    /// The committed changes; undo/redo through this handle.
    pub transaction: Transaction,
}

impl ImportReport {
    pub fn has_skips(&self) -> bool {
        !self.skipped.is_empty()
    }
}
