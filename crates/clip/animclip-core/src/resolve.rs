//! Object name resolution against a clip document.
//!
//! Resolution is two explicit steps: exact local name, then a single mirrored
//! candidate (left <-> right). There is no transitive mirroring.

use crate::document::ClipDocument;

/// Prefix markers tried in order; first match wins.
const MIRROR_PREFIXES: [(&str, &str); 4] = [("L_", "R_"), ("R_", "L_"), ("l_", "r_"), ("r_", "l_")];
/// Suffix markers, tried only when no prefix matched.
const MIRROR_SUFFIXES: [(&str, &str); 4] = [("_L", "_R"), ("_R", "_L"), ("_l", "_r"), ("_r", "_l")];

/// How a document key was found for a scene object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Exact(String),
    Mirrored(String),
}

impl Resolution {
    pub fn key(&self) -> &str {
        match self {
            Resolution::Exact(k) | Resolution::Mirrored(k) => k,
        }
    }

    pub fn is_mirrored(&self) -> bool {
        matches!(self, Resolution::Mirrored(_))
    }
}

/// Strip namespaces: the last `:`-separated segment of `name`.
pub fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// The single left/right counterpart of `name`, if any rule applies.
pub fn mirror_name(name: &str) -> Option<String> {
    for (from, to) in MIRROR_PREFIXES {
        if let Some(rest) = name.strip_prefix(from) {
            return Some(format!("{to}{rest}"));
        }
    }
    for (from, to) in MIRROR_SUFFIXES {
        if let Some(rest) = name.strip_suffix(from) {
            return Some(format!("{rest}{to}"));
        }
    }
    None
}

/// Find the document entry for an object's local name: exact key first, then
/// its mirrored counterpart.
pub fn resolve(doc: &ClipDocument, local: &str) -> Option<Resolution> {
    if doc.contains(local) {
        return Some(Resolution::Exact(local.to_string()));
    }
    let mirrored = mirror_name(local)?;
    doc.contains(&mirrored).then_some(Resolution::Mirrored(mirrored))
}
