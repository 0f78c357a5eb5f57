//! In-memory curve model.
//! Tangent/curve vocabularies live in vocab.rs.

use serde::{Deserialize, Serialize};

use crate::vocab::{CurveKind, InfinityCode, TangentType, TimeUnit};

/// Explicit x/y tangent vectors, only meaningful on weighted curves.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TangentVectors {
    pub in_x: f64,
    pub in_y: f64,
    pub out_x: f64,
    pub out_y: f64,
}

impl TangentVectors {
    /// Vectors implied by a key's tangent angles and weights.
    pub fn from_angles(detail: &TangentDetail) -> Self {
        let (in_sin, in_cos) = detail.in_angle.sin_cos();
        let (out_sin, out_cos) = detail.out_angle.sin_cos();
        Self {
            in_x: detail.in_weight * in_cos,
            in_y: detail.in_weight * in_sin,
            out_x: detail.out_weight * out_cos,
            out_y: detail.out_weight * out_sin,
        }
    }
}

/// Explicit tangent data stored on keys whose in or out tangent is `fixed`.
/// Angles are in internal (radian) units and are never unit-converted.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TangentDetail {
    pub weights_locked: bool,
    pub tangents_locked: bool,
    pub in_angle: f64,
    pub out_angle: f64,
    pub in_weight: f64,
    pub out_weight: f64,
    #[serde(default)]
    pub vectors: Option<TangentVectors>,
}

/// One (time, value) sample with tangent typing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    pub time: f64,
    /// Internal units (radians for angular curves).
    pub value: f64,
    pub in_tangent: TangentType,
    pub out_tangent: TangentType,
    #[serde(default)]
    pub detail: Option<TangentDetail>,
}

impl Keyframe {
    pub fn new(time: f64, value: f64, in_tangent: TangentType, out_tangent: TangentType) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: TangentDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Whether this key must carry a [`TangentDetail`] block.
    #[inline]
    pub fn has_fixed_tangent(&self) -> bool {
        self.in_tangent.is_fixed() || self.out_tangent.is_fixed()
    }
}

/// One animation channel: keys in ascending time plus curve-wide metadata.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Curve {
    pub kind: CurveKind,
    #[serde(default)]
    pub weighted: bool,
    #[serde(default)]
    pub pre_infinity: InfinityCode,
    #[serde(default)]
    pub post_infinity: InfinityCode,
    #[serde(default)]
    pub time_unit: TimeUnit,
    #[serde(default)]
    pub keys: Vec<Keyframe>,
}

impl Curve {
    pub fn new(kind: CurveKind) -> Self {
        Self {
            kind,
            weighted: false,
            pre_infinity: InfinityCode::default(),
            post_infinity: InfinityCode::default(),
            time_unit: TimeUnit::UNSPECIFIED,
            keys: Vec::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Append a key. Callers append in time order; the model does not re-sort.
    pub fn push_key(&mut self, key: Keyframe) {
        self.keys.push(key);
    }

    /// Time unit as reported for serialization: unspecified when there are no keys.
    pub fn effective_time_unit(&self) -> TimeUnit {
        if self.keys.is_empty() {
            TimeUnit::UNSPECIFIED
        } else {
            self.time_unit
        }
    }

    /// Change the weighted flag and keep existing tangent details consistent
    /// with it: vectors are dropped when the curve becomes unweighted and
    /// derived from angle and weight when it becomes weighted.
    pub fn set_weighted(&mut self, weighted: bool) {
        self.weighted = weighted;
        for detail in self.keys.iter_mut().filter_map(|k| k.detail.as_mut()) {
            if !weighted {
                detail.vectors = None;
            } else if detail.vectors.is_none() {
                detail.vectors = Some(TangentVectors::from_angles(detail));
            }
        }
    }

    /// Add `incoming`'s keys on top of this curve. A key at an identical time
    /// is replaced; every other existing key is kept. The weighted flag follows
    /// `incoming`; infinity codes are left alone.
    pub fn merge_keys(&mut self, incoming: &Curve) {
        if self.weighted != incoming.weighted {
            self.set_weighted(incoming.weighted);
        }
        if self.time_unit.is_unspecified() {
            self.time_unit = incoming.time_unit;
        }
        for key in &incoming.keys {
            match self
                .keys
                .binary_search_by(|k| k.time.total_cmp(&key.time))
            {
                Ok(idx) => self.keys[idx] = key.clone(),
                Err(idx) => self.keys.insert(idx, key.clone()),
            }
        }
    }

    /// Check the conditional-tangent invariant: a detail block exists iff one
    /// of the key's tangents is fixed, and its vectors exist iff the curve is
    /// weighted.
    pub fn validate_basic(&self) -> Result<(), String> {
        let mut last = f64::NEG_INFINITY;
        for (i, key) in self.keys.iter().enumerate() {
            if !key.time.is_finite() || !key.value.is_finite() {
                return Err(format!("key {i} has a non-finite time or value"));
            }
            if key.time < last {
                return Err(format!("key {i} is out of time order"));
            }
            last = key.time;
            match (&key.detail, key.has_fixed_tangent()) {
                (None, true) => {
                    return Err(format!("key {i} has a fixed tangent but no tangent detail"))
                }
                (Some(_), false) => {
                    return Err(format!("key {i} has tangent detail without a fixed tangent"))
                }
                (Some(d), true) if d.vectors.is_some() && !self.weighted => {
                    return Err(format!("key {i} has tangent vectors on an unweighted curve"))
                }
                (Some(d), true) if d.vectors.is_none() && self.weighted => {
                    return Err(format!("key {i} on a weighted curve has no tangent vectors"))
                }
                _ => {}
            }
        }
        Ok(())
    }
}
