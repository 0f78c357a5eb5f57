use std::fs;

use animclip_core::{
    decode_curve, encode_curve, load_clip, save_clip, ClipConfig, ClipDocument, ClipError,
    CurveKind, ExportArgs, FrameWindow, ImportArgs, SceneHost, TangentType,
};
use animclip_scene::Scene;
use animclip_test_fixtures::{clips, scenes};

fn scene(name: &str) -> Scene {
    let path = scenes::path(name).expect("scene fixture path");
    Scene::load(&path).expect("load scene fixture")
}

/// it should parse every fixture clip except the deliberately malformed one
#[test]
fn fixture_clips_parse() {
    for name in clips::keys() {
        let text = clips::json(&name).unwrap();
        let parsed = ClipDocument::from_json_str(&text);
        if name == "missing-static" {
            assert!(
                matches!(parsed, Err(ClipError::MalformedDocument { .. })),
                "{name} should be malformed"
            );
        } else {
            assert!(parsed.is_ok(), "{name}: {:?}", parsed.err());
        }
    }
}

/// it should keep weighted fixed-tangent keys and the reserved section through a decode/encode cycle
#[test]
fn weighted_fixed_clip_survives_reencode() {
    let doc = ClipDocument::from_json_str(&clips::json("weighted-fixed").unwrap()).unwrap();
    let hips = doc.get("hips").expect("hips entry");
    let obj = hips.curve("translateY").expect("translateY curve");

    let curve = decode_curve(obj, CurveKind::TimeLinear, 0.0).expect("decode");
    assert!(curve.weighted);
    assert_eq!(curve.pre_infinity.0, 1);
    assert_eq!(curve.post_infinity.0, 4);
    assert_eq!(curve.keys[0].in_tangent, TangentType::Fixed);
    assert_eq!(curve.keys[2].out_tangent, TangentType::Fixed);
    let detail = curve.keys[0].detail.expect("fixed key detail");
    assert!(detail.weights_locked);
    assert_eq!(detail.vectors.expect("weighted vectors").out_y, 0.5);
    assert!(curve.keys[1].detail.is_none());

    assert_eq!(&encode_curve(&curve, FrameWindow::unbounded()).unwrap(), obj);

    assert_eq!(hips.static_value("tx"), Some(0.25));
    assert!(hips.others.contains_key("note"));
    let reparsed = ClipDocument::from_json_str(&doc.to_json_string().unwrap()).unwrap();
    assert_eq!(reparsed, doc);
}

/// it should require a file path for both commands
#[test]
fn commands_require_file_path() {
    let mut s = scene("arm-rig");
    let err = save_clip(&s, &ExportArgs::default(), &ClipConfig::default()).unwrap_err();
    assert!(matches!(err, ClipError::MissingFilePath));
    assert_eq!(err.to_string(), "-file(-f) must be specified with a file path");

    let err = load_clip(&mut s, &ImportArgs::default()).unwrap_err();
    assert!(matches!(err, ClipError::MissingFilePath));
}

/// it should report an unreadable clip file as an io error
#[test]
fn missing_clip_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = scene("arm-rig");
    let args = ImportArgs {
        file: Some(dir.path().join("nope.json")),
        start_frame: None,
    };
    assert!(matches!(
        load_clip(&mut s, &args),
        Err(ClipError::Io { .. })
    ));
}

/// it should reject a clip whose object lacks a static section
#[test]
fn load_rejects_missing_static() {
    let mut s = scene("arm-rig");
    let args = ImportArgs {
        file: Some(clips::path("missing-static").unwrap()),
        start_frame: Some(1),
    };
    assert!(matches!(
        load_clip(&mut s, &args),
        Err(ClipError::MalformedDocument { .. })
    ));
}

/// it should restore a saved pose through the file round trip
#[test]
fn saved_pose_restores_values() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("pose.json");

    let s = scene("arm-rig");
    let save = ExportArgs {
        file: Some(file.clone()),
        start_frame: Some(4),
        end_frame: Some(4),
    };
    let report = save_clip(&s, &save, &ClipConfig::default()).expect("save");
    assert_eq!(report.statics, 5);

    let written = fs::read_to_string(&file).unwrap();
    assert_eq!(written, report.document.to_json_string().unwrap());

    let mut target = scene("arm-rig");
    let tx = target.channel_by_path("rig:L_arm", "tx").unwrap();
    let ro = target.channel_by_path("rig:L_arm", "ro").unwrap();
    target.set_channel_value(tx, 9.0).unwrap();
    target.set_channel_value(ro, 0.0).unwrap();

    let load = ImportArgs {
        file: Some(file),
        start_frame: None,
    };
    let report = load_clip(&mut target, &load).expect("load");
    assert!(!report.has_skips());
    assert_eq!(report.values_set, 5);
    assert_eq!(target.channel_value(tx), Some(1.5));
    assert_eq!(target.channel_value(ro), Some(2.0));
}

/// it should still write a valid document when nothing is selected
#[test]
fn empty_selection_writes_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("empty.json");
    let mut s = scene("arm-rig");
    s.select(&[]);

    let args = ExportArgs {
        file: Some(file.clone()),
        start_frame: None,
        end_frame: None,
    };
    let report = save_clip(&s, &args, &ClipConfig::default()).expect("save");
    assert!(report.document.is_empty());
    assert_eq!(fs::read_to_string(&file).unwrap(), "{}");
}
