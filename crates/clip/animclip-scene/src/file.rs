//! JSON scene file schema and conversion to/from [`Scene`].
//!
//! Nodes, channels and curves are referenced by name in the file; ids are
//! assigned on load.
//!
//! ```json
//! { "current_time": 1.0,
//!   "playback_range": { "start": 1.0, "end": 24.0 },
//!   "selection": ["rig:L_elbow"],
//!   "nodes": [{ "name": "rig:L_elbow",
//!               "channels": [{ "name": "rotateX", "short_name": "rx",
//!                              "kind": "animCurveTA", "value": 0.0 }] }],
//!   "curves": [{ "name": "L_elbow_rotateX", "node": "rig:L_elbow",
//!                "channel": "rotateX", "data": { ...curve... } }] }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use animclip_core::{Curve, CurveKind, HostError, PlaybackRange, SceneHost};

use crate::scene::{ChannelSpec, Scene};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scene json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene references unknown node '{0}'")]
    UnknownNode(String),
    #[error("scene references unknown channel '{node}.{channel}'")]
    UnknownChannel { node: String, channel: String },
    #[error("scene curve '{name}' is invalid: {reason}")]
    InvalidCurve { name: String, reason: String },
    #[error(transparent)]
    Host(#[from] HostError),
}

fn default_true() -> bool {
    true
}

fn default_kind() -> CurveKind {
    CurveKind::TimeUnitless
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default = "default_kind")]
    pub kind: CurveKind,
    #[serde(default)]
    pub value: f64,
    #[serde(default = "default_true")]
    pub keyable: bool,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    #[serde(default)]
    pub channels: Vec<ChannelRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurveRecord {
    pub name: String,
    pub node: String,
    pub channel: String,
    pub data: Curve,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub current_time: f64,
    pub playback_range: PlaybackRange,
    #[serde(default)]
    pub selection: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub curves: Vec<CurveRecord>,
}

impl Scene {
    pub fn from_file(file: SceneFile) -> Result<Scene, SceneError> {
        let mut scene = Scene::new();
        scene.set_current_time(file.current_time);
        scene.set_playback_range(file.playback_range.start, file.playback_range.end);

        for node in file.nodes {
            let id = scene.add_node(node.name);
            for ch in node.channels {
                let mut spec = ChannelSpec::new(ch.name, ch.kind)
                    .value(ch.value)
                    .keyable(ch.keyable)
                    .locked(ch.locked);
                spec.short_name = ch.short_name;
                scene.add_channel(id, spec)?;
            }
        }

        let mut selection = Vec::with_capacity(file.selection.len());
        for name in &file.selection {
            let id = scene
                .node_by_name(name)
                .ok_or_else(|| SceneError::UnknownNode(name.clone()))?;
            selection.push(id);
        }
        scene.select(&selection);

        for rec in file.curves {
            let channel = scene.channel_by_path(&rec.node, &rec.channel).ok_or_else(|| {
                SceneError::UnknownChannel {
                    node: rec.node.clone(),
                    channel: rec.channel.clone(),
                }
            })?;
            rec.data
                .validate_basic()
                .map_err(|reason| SceneError::InvalidCurve {
                    name: rec.name.clone(),
                    reason,
                })?;
            scene.add_curve(channel, rec.name, rec.data)?;
        }
        Ok(scene)
    }

    pub fn to_file(&self) -> SceneFile {
        let nodes = self
            .nodes
            .iter()
            .map(|n| NodeRecord {
                name: n.name.clone(),
                channels: n
                    .channels
                    .iter()
                    .filter_map(|c| self.channel(*c).ok())
                    .map(|ch| ChannelRecord {
                        name: ch.spec.name.clone(),
                        short_name: ch.spec.short_name.clone(),
                        kind: ch.spec.kind,
                        value: ch.spec.value,
                        keyable: ch.spec.keyable,
                        locked: ch.spec.locked,
                    })
                    .collect(),
            })
            .collect();

        let curves = self
            .sorted_curve_ids()
            .into_iter()
            .filter_map(|id| {
                let sc = self.scene_curve(id)?;
                let ch = self.channel(sc.channel).ok()?;
                Some(CurveRecord {
                    name: sc.name.clone(),
                    node: self.node_name(ch.node)?,
                    channel: ch.spec.name.clone(),
                    data: sc.data.clone(),
                })
            })
            .collect();

        SceneFile {
            current_time: self.current_time,
            playback_range: self.playback,
            selection: self
                .selection
                .iter()
                .filter_map(|n| self.node_name(*n))
                .collect(),
            nodes,
            curves,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Scene, SceneError> {
        Scene::from_file(serde_json::from_str(s)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(&self.to_file())?)
    }

    pub fn load(path: &Path) -> Result<Scene, SceneError> {
        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Scene::from_json_str(&text)
    }

    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let text = self.to_json_string_pretty()?;
        fs::write(path, text).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
