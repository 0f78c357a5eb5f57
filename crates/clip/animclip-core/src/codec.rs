//! Curve codec: [`Curve`] <-> document curve object.
//!
//! Document layout of one curve:
//!
//! ```json
//! { "weighted": false, "preinf": 0, "postinf": 0, "unit": 6,
//!   "data": [[time, value, "inTangent", "outTangent", ...optional], ...] }
//! ```
//!
//! Per-key optional groups:
//! - `weightsLocked, tangentsLocked, inAngle, outAngle, inWeight, outWeight`
//!   iff the in or out tangent is `fixed`;
//! - `inX, inY, outX, outY` additionally iff the curve is weighted.
//!
//! Angular curves are written in degrees; everything else (including tangent
//! angles) is written in internal units.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::config::ClipConfig;
use crate::curve::{Curve, Keyframe, TangentDetail, TangentVectors};
use crate::error::{ClipError, Result};
use crate::vocab::{CurveKind, InfinityCode, TangentType, TimeUnit};

const FIELD_NAMES: [&str; 14] = [
    "time",
    "value",
    "inTangentType",
    "outTangentType",
    "weightsLocked",
    "tangentsLocked",
    "inAngle",
    "outAngle",
    "inWeight",
    "outWeight",
    "inTangentX",
    "inTangentY",
    "outTangentX",
    "outTangentY",
];

/// Serialized form of one curve inside a clip document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveObject {
    pub weighted: bool,
    pub preinf: InfinityCode,
    pub postinf: InfinityCode,
    pub unit: TimeUnit,
    pub data: Vec<Vec<JsonValue>>,
}

/// Optional export bounds. Keys after `end` are dropped; keys before `start`
/// are dropped and the rest are rebased so that `start` encodes as time 0.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameWindow {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl FrameWindow {
    pub fn new(start: Option<f64>, end: Option<f64>) -> Self {
        Self { start, end }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Map a key time into the window, or `None` if the key falls outside it.
    fn rebase(&self, t: f64) -> Option<f64> {
        if matches!(self.end, Some(end) if t > end) {
            return None;
        }
        match self.start {
            Some(start) if t < start => None,
            Some(start) => Some(t - start),
            None => Some(t),
        }
    }
}

/// Encode with default options (true out tangents).
pub fn encode_curve(curve: &Curve, window: FrameWindow) -> Result<CurveObject> {
    encode_curve_with(curve, window, &ClipConfig::default())
}

/// Encode the keys inside `window`. A key written with a fixed tangent must
/// carry its tangent detail, and on a weighted curve its vectors; neither is
/// filled in.
pub fn encode_curve_with(
    curve: &Curve,
    window: FrameWindow,
    config: &ClipConfig,
) -> Result<CurveObject> {
    let scale = curve.kind.encode_scale();
    let mut data = Vec::with_capacity(curve.keys.len());

    for (idx, key) in curve.keys.iter().enumerate() {
        let Some(t) = window.rebase(key.time) else {
            continue;
        };
        let in_tangent = key.in_tangent;
        let out_tangent = if config.legacy_out_tangent {
            key.in_tangent
        } else {
            key.out_tangent
        };

        let mut item = vec![
            json!(t),
            json!(key.value * scale),
            json!(in_tangent.name()),
            json!(out_tangent.name()),
        ];

        if in_tangent.is_fixed() || out_tangent.is_fixed() {
            let d = key.detail.ok_or_else(|| {
                ClipError::malformed_curve(format!(
                    "key {idx} has a fixed tangent but no tangent detail"
                ))
            })?;
            item.extend([
                json!(d.weights_locked),
                json!(d.tangents_locked),
                json!(d.in_angle),
                json!(d.out_angle),
                json!(d.in_weight),
                json!(d.out_weight),
            ]);
            if curve.weighted {
                let v = d.vectors.ok_or_else(|| {
                    ClipError::malformed_curve(format!(
                        "key {idx} on a weighted curve has no tangent vectors"
                    ))
                })?;
                item.extend([json!(v.in_x), json!(v.in_y), json!(v.out_x), json!(v.out_y)]);
            }
        }
        data.push(item);
    }

    Ok(CurveObject {
        weighted: curve.weighted,
        preinf: curve.pre_infinity,
        postinf: curve.post_infinity,
        unit: curve.effective_time_unit(),
        data,
    })
}

/// Decode a document curve into a curve of the destination's `kind`, shifting
/// every key by `time_offset`.
pub fn decode_curve(obj: &CurveObject, kind: CurveKind, time_offset: f64) -> Result<Curve> {
    let weighted = obj.weighted;
    let scale = kind.decode_scale();

    let mut curve = Curve::new(kind);
    curve.weighted = weighted;
    curve.pre_infinity = obj.preinf;
    curve.post_infinity = obj.postinf;
    curve.time_unit = obj.unit;
    curve.keys.reserve(obj.data.len());

    for (idx, entry) in obj.data.iter().enumerate() {
        let fields = KeyFields { idx, entry };
        let time = fields.number(0)? + time_offset;
        let value = fields.number(1)? * scale;
        let in_tangent = fields.tangent(2)?;
        let out_tangent = fields.tangent(3)?;

        let mut key = Keyframe::new(time, value, in_tangent, out_tangent);
        if key.has_fixed_tangent() {
            let vectors = if weighted {
                Some(TangentVectors {
                    in_x: fields.number(10)?,
                    in_y: fields.number(11)?,
                    out_x: fields.number(12)?,
                    out_y: fields.number(13)?,
                })
            } else {
                None
            };
            key.detail = Some(TangentDetail {
                weights_locked: fields.boolean(4)?,
                tangents_locked: fields.boolean(5)?,
                in_angle: fields.number(6)?,
                out_angle: fields.number(7)?,
                in_weight: fields.number(8)?,
                out_weight: fields.number(9)?,
                vectors,
            });
        }
        curve.push_key(key);
    }

    Ok(curve)
}

/// Positional accessors over one encoded key with field-named errors.
struct KeyFields<'a> {
    idx: usize,
    entry: &'a [JsonValue],
}

impl KeyFields<'_> {
    fn get(&self, slot: usize) -> Result<&JsonValue> {
        self.entry.get(slot).ok_or_else(|| {
            ClipError::malformed_curve(format!(
                "key {} is missing '{}' (field {})",
                self.idx, FIELD_NAMES[slot], slot
            ))
        })
    }

    fn mistyped(&self, slot: usize, expected: &str) -> ClipError {
        ClipError::malformed_curve(format!(
            "key {} field '{}' must be {}",
            self.idx, FIELD_NAMES[slot], expected
        ))
    }

    fn number(&self, slot: usize) -> Result<f64> {
        self.get(slot)?
            .as_f64()
            .ok_or_else(|| self.mistyped(slot, "a number"))
    }

    fn boolean(&self, slot: usize) -> Result<bool> {
        self.get(slot)?
            .as_bool()
            .ok_or_else(|| self.mistyped(slot, "a boolean"))
    }

    fn tangent(&self, slot: usize) -> Result<TangentType> {
        let name = self
            .get(slot)?
            .as_str()
            .ok_or_else(|| self.mistyped(slot, "a tangent type name"))?;
        TangentType::from_name(name).ok_or_else(|| {
            ClipError::malformed_curve(format!(
                "key {} has unknown {} '{}'",
                self.idx, FIELD_NAMES[slot], name
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_key(t: f64, v: f64) -> Keyframe {
        Keyframe::new(t, v, TangentType::Linear, TangentType::Linear)
    }

    fn fixed_detail() -> TangentDetail {
        TangentDetail {
            weights_locked: true,
            tangents_locked: false,
            in_angle: 0.25,
            out_angle: -0.5,
            in_weight: 1.0,
            out_weight: 2.0,
            vectors: None,
        }
    }

    #[test]
    fn window_drops_and_rebases() {
        let mut c = Curve::new(CurveKind::TimeLinear);
        for t in [-5.0, 0.0, 3.0, 10.0, 15.0] {
            c.push_key(linear_key(t, t * 2.0));
        }
        let obj = encode_curve(&c, FrameWindow::new(Some(0.0), Some(10.0))).unwrap();
        let times: Vec<f64> = obj.data.iter().map(|k| k[0].as_f64().unwrap()).collect();
        assert_eq!(times, vec![0.0, 3.0, 10.0]);
    }

    #[test]
    fn window_start_rebases_independently() {
        let mut c = Curve::new(CurveKind::TimeLinear);
        for t in [2.0, 4.0, 8.0] {
            c.push_key(linear_key(t, 1.0));
        }
        let obj = encode_curve(&c, FrameWindow::new(Some(4.0), None)).unwrap();
        let times: Vec<f64> = obj.data.iter().map(|k| k[0].as_f64().unwrap()).collect();
        assert_eq!(times, vec![0.0, 4.0]);

        let obj = encode_curve(&c, FrameWindow::new(None, Some(4.0))).unwrap();
        let times: Vec<f64> = obj.data.iter().map(|k| k[0].as_f64().unwrap()).collect();
        assert_eq!(times, vec![2.0, 4.0]);
    }

    #[test]
    fn linear_keys_carry_no_optional_fields() {
        let mut c = Curve::new(CurveKind::TimeLinear);
        c.weighted = true;
        c.push_key(linear_key(1.0, 2.0));
        let obj = encode_curve(&c, FrameWindow::unbounded()).unwrap();
        assert_eq!(obj.data[0].len(), 4);

        let back = decode_curve(&obj, CurveKind::TimeLinear, 0.0).unwrap();
        assert!(back.keys[0].detail.is_none());
    }

    #[test]
    fn fixed_key_on_unweighted_curve_has_six_extra_fields() {
        let mut c = Curve::new(CurveKind::TimeLinear);
        c.push_key(
            Keyframe::new(0.0, 1.0, TangentType::Fixed, TangentType::Spline)
                .with_detail(fixed_detail()),
        );
        let obj = encode_curve(&c, FrameWindow::unbounded()).unwrap();
        assert_eq!(obj.data[0].len(), 10);
        let back = decode_curve(&obj, CurveKind::TimeLinear, 0.0).unwrap();
        assert_eq!(back.keys, c.keys);
    }

    #[test]
    fn fixed_key_on_weighted_curve_requires_vectors() {
        let mut c = Curve::new(CurveKind::TimeLinear);
        c.weighted = true;
        let mut detail = fixed_detail();
        detail.vectors = Some(TangentVectors {
            in_x: 1.0,
            in_y: 0.5,
            out_x: 2.0,
            out_y: -0.5,
        });
        c.push_key(
            Keyframe::new(0.0, 1.0, TangentType::Linear, TangentType::Fixed).with_detail(detail),
        );
        let mut obj = encode_curve(&c, FrameWindow::unbounded()).unwrap();
        assert_eq!(obj.data[0].len(), 14);
        assert_eq!(decode_curve(&obj, CurveKind::TimeLinear, 0.0).unwrap().keys, c.keys);

        obj.data[0].truncate(12);
        let err = decode_curve(&obj, CurveKind::TimeLinear, 0.0).unwrap_err();
        assert!(matches!(err, ClipError::MalformedCurve { .. }));
        assert!(err.to_string().contains("outTangentX"), "{err}");
    }

    #[test]
    fn missing_fixed_data_is_not_invented() {
        let mut c = Curve::new(CurveKind::TimeLinear);
        c.push_key(linear_key(0.0, 1.0));
        c.push_key(Keyframe::new(1.0, 1.0, TangentType::Fixed, TangentType::Linear));
        let err = encode_curve(&c, FrameWindow::unbounded()).unwrap_err();
        assert!(err.to_string().contains("key 1 has a fixed tangent"), "{err}");

        c.keys[1].detail = Some(fixed_detail());
        c.weighted = true;
        let err = encode_curve(&c, FrameWindow::unbounded()).unwrap_err();
        assert!(err.to_string().contains("no tangent vectors"), "{err}");

        // keys outside the window are never inspected
        let obj = encode_curve(&c, FrameWindow::new(None, Some(0.5))).unwrap();
        assert_eq!(obj.data.len(), 1);
    }

    #[test]
    fn unknown_tangent_name_is_malformed() {
        let obj = CurveObject {
            weighted: false,
            preinf: InfinityCode(0),
            postinf: InfinityCode(0),
            unit: TimeUnit(6),
            data: vec![vec![json!(0.0), json!(1.0), json!("bogus"), json!("linear")]],
        };
        let err = decode_curve(&obj, CurveKind::TimeLinear, 0.0).unwrap_err();
        match err {
            ClipError::MalformedCurve { reason } => assert!(reason.contains("bogus")),
            other => panic!("expected MalformedCurve, got {other:?}"),
        }
    }

    #[test]
    fn angular_values_convert_and_offset_applies() {
        let mut c = Curve::new(CurveKind::TimeAngular);
        c.time_unit = TimeUnit(6);
        c.push_key(linear_key(0.0, std::f64::consts::FRAC_PI_2));
        let obj = encode_curve(&c, FrameWindow::unbounded()).unwrap();
        assert!((obj.data[0][1].as_f64().unwrap() - 90.0).abs() < 1e-12);
        assert_eq!(obj.unit, TimeUnit(6));

        let back = decode_curve(&obj, CurveKind::TimeAngular, 24.0).unwrap();
        assert_eq!(back.keys[0].time, 24.0);
        assert!((back.keys[0].value - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn legacy_mode_duplicates_in_tangent() {
        let mut c = Curve::new(CurveKind::TimeLinear);
        c.push_key(Keyframe::new(0.0, 1.0, TangentType::Spline, TangentType::Step));
        let cfg = ClipConfig {
            legacy_out_tangent: true,
            ..ClipConfig::default()
        };
        let legacy = encode_curve_with(&c, FrameWindow::unbounded(), &cfg).unwrap();
        assert_eq!(legacy.data[0][3], json!("spline"));
        let fixed = encode_curve(&c, FrameWindow::unbounded()).unwrap();
        assert_eq!(fixed.data[0][3], json!("step"));
    }

    #[test]
    fn empty_curve_writes_unspecified_unit() {
        let mut c = Curve::new(CurveKind::TimeLinear);
        c.time_unit = TimeUnit(8);
        let obj = encode_curve(&c, FrameWindow::unbounded()).unwrap();
        assert_eq!(obj.unit, TimeUnit::UNSPECIFIED);
        assert!(obj.data.is_empty());
    }
}
