//! animclip-scene: in-memory scene host for animclip-core
//!
//! A small scene graph (nodes, scalar channels, curves, selection, time) that
//! implements [`animclip_core::SceneHost`] and persists to a JSON scene file.
//! Used by the CLI and by tests.

pub mod file;
pub mod scene;

pub use file::{ChannelRecord, CurveRecord, NodeRecord, SceneError, SceneFile};
pub use scene::{ChannelSpec, Scene, SceneCurve};
