//! Configuration for clip export/import.

use serde::{Deserialize, Serialize};

/// Knobs shared by export and import. Every field has a default so partial
/// JSON config files are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    /// A frame window no wider than this exports a pose instead of curves.
    pub pose_span: f64,

    /// Channel captured as a static value alongside animation (rotate order).
    pub rotate_order_attribute: String,

    /// Write the in tangent into both tangent slots of each encoded key, as
    /// older exporters did. Only needed to reproduce those documents byte for byte.
    pub legacy_out_tangent: bool,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            pose_span: 1.0,
            rotate_order_attribute: "ro".to_string(),
            legacy_out_tangent: false,
        }
    }
}

impl ClipConfig {
    pub fn from_json_str(s: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ClipConfig::from_json_str(r#"{ "legacy_out_tangent": true }"#).unwrap();
        assert!(cfg.legacy_out_tangent);
        assert_eq!(cfg.pose_span, 1.0);
        assert_eq!(cfg.rotate_order_attribute, "ro");
    }
}
