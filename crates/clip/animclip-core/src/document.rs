//! Clip document: object local-name -> { animation, static, others }.
//!
//! Serialized layout:
//!
//! ```json
//! { "L_arm": { "animation": { "rotateX": { ...curve... } },
//!              "static": { "ro": 0.0 },
//!              "others": {} } }
//! ```
//!
//! `others` is reserved: preserved when present, written empty, never read.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::codec::CurveObject;
use crate::error::{ClipError, Result};

/// Per-object payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub animation: IndexMap<String, CurveObject>,
    #[serde(rename = "static")]
    pub static_values: IndexMap<String, f64>,
    #[serde(default)]
    pub others: serde_json::Map<String, serde_json::Value>,
}

impl ObjectEntry {
    pub fn curve(&self, attr: &str) -> Option<&CurveObject> {
        self.animation.get(attr)
    }

    pub fn static_value(&self, attr: &str) -> Option<f64> {
        self.static_values.get(attr).copied()
    }

    pub fn insert_curve(&mut self, attr: impl Into<String>, curve: CurveObject) {
        self.animation.insert(attr.into(), curve);
    }

    pub fn set_static(&mut self, attr: impl Into<String>, value: f64) {
        self.static_values.insert(attr.into(), value);
    }

    /// Record a static value only if the attribute has none yet. Returns
    /// whether the value was written.
    pub fn set_static_once(&mut self, attr: &str, value: f64) -> bool {
        if self.static_values.contains_key(attr) {
            return false;
        }
        self.static_values.insert(attr.to_string(), value);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.animation.is_empty() && self.static_values.is_empty()
    }
}

/// Top-level document, keyed by namespace-stripped object name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipDocument {
    objects: IndexMap<String, ObjectEntry>,
}

impl ClipDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ObjectEntry> {
        self.objects.get(name)
    }

    /// Entry for `name`, created empty on first use.
    pub fn entry_mut(&mut self, name: &str) -> &mut ObjectEntry {
        self.objects.entry(name.to_string()).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObjectEntry)> {
        self.objects.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse document text. Syntax errors surface as [`ClipError::Parse`];
    /// well-formed JSON with the wrong shape as [`ClipError::MalformedDocument`].
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| match e.classify() {
            Category::Data => ClipError::MalformedDocument {
                reason: e.to_string(),
            },
            _ => ClipError::Parse(e),
        })
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ClipError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// Serialize fully before touching the file so a failure leaves nothing behind.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let text = self.to_json_string()?;
        fs::write(path, text).map_err(|e| ClipError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{InfinityCode, TimeUnit};

    fn empty_curve() -> CurveObject {
        CurveObject {
            weighted: false,
            preinf: InfinityCode(0),
            postinf: InfinityCode(0),
            unit: TimeUnit(0),
            data: vec![],
        }
    }

    #[test]
    fn serializes_with_reserved_others() {
        let mut doc = ClipDocument::new();
        let e = doc.entry_mut("L_arm");
        e.set_static("ro", 0.0);
        e.insert_curve("rotateX", empty_curve());
        let s = doc.to_json_string().unwrap();
        assert_eq!(
            s,
            r#"{"L_arm":{"animation":{"rotateX":{"weighted":false,"preinf":0,"postinf":0,"unit":0,"data":[]}},"static":{"ro":0.0},"others":{}}}"#
        );
    }

    #[test]
    fn others_is_optional_on_read() {
        let doc = ClipDocument::from_json_str(r#"{"a":{"animation":{},"static":{"tx":1.5}}}"#).unwrap();
        assert_eq!(doc.get("a").unwrap().static_value("tx"), Some(1.5));
        assert!(doc.get("a").unwrap().others.is_empty());
    }

    #[test]
    fn missing_static_is_malformed() {
        let err = ClipDocument::from_json_str(r#"{"a":{"animation":{}}}"#).unwrap_err();
        assert!(matches!(err, ClipError::MalformedDocument { .. }), "{err:?}");
    }

    #[test]
    fn bad_syntax_is_parse_error() {
        let err = ClipDocument::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ClipError::Parse(_)), "{err:?}");
    }

    #[test]
    fn set_static_once_keeps_first() {
        let mut doc = ClipDocument::new();
        let e = doc.entry_mut("n");
        assert!(e.set_static_once("ro", 1.0));
        assert!(!e.set_static_once("ro", 2.0));
        assert_eq!(e.static_value("ro"), Some(1.0));
    }
}
