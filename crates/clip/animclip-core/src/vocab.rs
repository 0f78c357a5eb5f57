//! Fixed vocabularies shared by the curve model and the document codec.
//!
//! Tangent types and curve kinds carry stable integer codes (their
//! discriminants) and stable names. The tables are `const` and never mutated
//! at runtime.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Radians to degrees (document values for angular curves are in degrees).
pub const RAD_TO_DEG: f64 = 180.0 / PI;
/// Degrees to radians; exact reciprocal of [`RAD_TO_DEG`].
pub const DEG_TO_RAD: f64 = PI / 180.0;

/// Interpolation behavior at a keyframe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TangentType {
    Global = 0,
    Fixed = 1,
    Linear = 2,
    Flat = 3,
    Spline = 4,
    Step = 5,
    Slow = 6,
    Fast = 7,
    Clamped = 8,
    Plateau = 9,
    StepNext = 10,
    Auto = 11,
}

/// Indexed by code.
const TANGENT_TABLE: [(TangentType, &str); 12] = [
    (TangentType::Global, "global"),
    (TangentType::Fixed, "fixed"),
    (TangentType::Linear, "linear"),
    (TangentType::Flat, "flat"),
    (TangentType::Spline, "spline"),
    (TangentType::Step, "step"),
    (TangentType::Slow, "slow"),
    (TangentType::Fast, "fast"),
    (TangentType::Clamped, "clamped"),
    (TangentType::Plateau, "plateau"),
    (TangentType::StepNext, "stepnext"),
    (TangentType::Auto, "auto"),
];

impl TangentType {
    #[inline]
    pub fn name(self) -> &'static str {
        TANGENT_TABLE[self as usize].1
    }

    /// Exact, case-sensitive lookup. Unknown names yield `None`; callers must
    /// not substitute a default.
    pub fn from_name(name: &str) -> Option<Self> {
        TANGENT_TABLE
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(t, _)| *t)
    }

    #[inline]
    pub fn is_fixed(self) -> bool {
        self == TangentType::Fixed
    }
}

impl fmt::Display for TangentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value kind of a curve: input domain (time or unitless) crossed with the
/// output quantity. Determines unit conversion on encode/decode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CurveKind {
    #[serde(rename = "animCurveTA")]
    TimeAngular = 0,
    #[serde(rename = "animCurveTL")]
    TimeLinear = 1,
    #[serde(rename = "animCurveTT")]
    TimeTime = 2,
    #[serde(rename = "animCurveTU")]
    TimeUnitless = 3,
    #[serde(rename = "animCurveUA")]
    UnitlessAngular = 4,
    #[serde(rename = "animCurveUL")]
    UnitlessLinear = 5,
    #[serde(rename = "animCurveUT")]
    UnitlessTime = 6,
    #[serde(rename = "animCurveUU")]
    UnitlessUnitless = 7,
}

const CURVE_KIND_TABLE: [(CurveKind, &str); 8] = [
    (CurveKind::TimeAngular, "animCurveTA"),
    (CurveKind::TimeLinear, "animCurveTL"),
    (CurveKind::TimeTime, "animCurveTT"),
    (CurveKind::TimeUnitless, "animCurveTU"),
    (CurveKind::UnitlessAngular, "animCurveUA"),
    (CurveKind::UnitlessLinear, "animCurveUL"),
    (CurveKind::UnitlessTime, "animCurveUT"),
    (CurveKind::UnitlessUnitless, "animCurveUU"),
];

impl CurveKind {
    #[inline]
    pub fn name(self) -> &'static str {
        CURVE_KIND_TABLE[self as usize].1
    }

    /// True when keys are indexed by time rather than by a unitless input.
    pub fn is_time_input(self) -> bool {
        matches!(
            self,
            CurveKind::TimeAngular
                | CurveKind::TimeLinear
                | CurveKind::TimeTime
                | CurveKind::TimeUnitless
        )
    }

    pub fn is_angular(self) -> bool {
        matches!(self, CurveKind::TimeAngular | CurveKind::UnitlessAngular)
    }

    /// Multiplier from internal value units to document units.
    pub fn encode_scale(self) -> f64 {
        if self.is_angular() {
            RAD_TO_DEG
        } else {
            1.0
        }
    }

    /// Multiplier from document units back to internal value units.
    pub fn decode_scale(self) -> f64 {
        if self.is_angular() {
            DEG_TO_RAD
        } else {
            1.0
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extrapolation before the first / after the last key. Opaque host code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InfinityCode(pub i32);

/// Time base of a curve's keys. Opaque host code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeUnit(pub i32);

impl TimeUnit {
    /// Written for curves without keys.
    pub const UNSPECIFIED: TimeUnit = TimeUnit(0);

    pub fn is_unspecified(self) -> bool {
        self == Self::UNSPECIFIED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tangent_codes_follow_table_order() {
        for (i, (t, name)) in TANGENT_TABLE.iter().enumerate() {
            assert_eq!(*t as usize, i);
            assert_eq!(t.name(), *name);
            assert_eq!(TangentType::from_name(name), Some(*t));
        }
        assert_eq!(TangentType::Fixed as u8, 1);
        assert_eq!(TangentType::Auto as u8, 11);
    }

    #[test]
    fn tangent_names_are_exact() {
        assert_eq!(TangentType::from_name("spline"), Some(TangentType::Spline));
        assert_eq!(TangentType::from_name("stepnext"), Some(TangentType::StepNext));
        assert_eq!(TangentType::from_name("Linear"), None);
        assert_eq!(TangentType::from_name("bogus"), None);
        assert_eq!(TangentType::from_name("smooth"), None);
    }

    #[test]
    fn tangent_serde_uses_names() {
        let s = serde_json::to_string(&TangentType::StepNext).unwrap();
        assert_eq!(s, "\"stepnext\"");
        let t: TangentType = serde_json::from_str("\"clamped\"").unwrap();
        assert_eq!(t, TangentType::Clamped);
    }

    #[test]
    fn curve_kind_scales() {
        assert!(CurveKind::TimeAngular.is_angular());
        assert!(CurveKind::UnitlessAngular.is_angular());
        assert!(!CurveKind::TimeLinear.is_angular());
        assert!(CurveKind::TimeUnitless.is_time_input());
        assert!(!CurveKind::UnitlessTime.is_time_input());
        assert_eq!(CurveKind::TimeLinear.encode_scale(), 1.0);
        let round = 1.234 * CurveKind::TimeAngular.encode_scale() * CurveKind::TimeAngular.decode_scale();
        assert!((round - 1.234).abs() < 1e-15);
    }

    #[test]
    fn curve_kind_names_roundtrip() {
        for (i, (k, name)) in CURVE_KIND_TABLE.iter().enumerate() {
            assert_eq!(*k as usize, i);
            assert_eq!(k.name(), *name);
            assert_eq!(serde_json::to_string(k).unwrap(), format!("\"{name}\""));
        }
    }
}
