//! animclip-core: animation clip codec (host-agnostic)
//!
//! Captures keyframe curves and static pose values of named scene objects
//! into a JSON clip document and re-applies them to another rig, falling back
//! to left/right mirrored names when an exact match is missing.
//!
//! Hosts plug in through [`SceneHost`]; the core only reads the scene, and
//! every mutation goes through a [`ChangeSet`] committed once per import.

pub mod change;
pub mod codec;
pub mod config;
pub mod curve;
pub mod document;
pub mod error;
pub mod export;
pub mod host;
pub mod import;
pub mod report;
pub mod resolve;
pub mod vocab;

// Re-exports for host bindings
pub use change::{ChangeOp, ChangeSet, Transaction};
pub use codec::{decode_curve, encode_curve, encode_curve_with, CurveObject, FrameWindow};
pub use config::ClipConfig;
pub use curve::{Curve, Keyframe, TangentDetail, TangentVectors};
pub use document::{ClipDocument, ObjectEntry};
pub use error::{ClipError, HostError, Result};
pub use export::{export_clip, save_clip, ExportArgs};
pub use host::{ChannelId, ChannelInfo, CurveId, NodeId, PlaybackRange, SceneHost};
pub use import::{import_clip, load_clip, ImportArgs};
pub use report::{ExportMode, ExportReport, ImportReport, ResolvedObject, Skip};
pub use resolve::{local_name, mirror_name, resolve, Resolution};
pub use vocab::{CurveKind, InfinityCode, TangentType, TimeUnit, DEG_TO_RAD, RAD_TO_DEG};
