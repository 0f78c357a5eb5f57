//! Host scene interface.
//!
//! The core never owns scene state. Adapters implement [`SceneHost`] over
//! their scene graph; queries are read-only and the mutation primitives are
//! only driven by [`ChangeSet`](crate::change::ChangeSet) and
//! [`Transaction`](crate::change::Transaction).

use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::error::HostError;
use crate::vocab::CurveKind;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CurveId(pub u32);

/// Static description of one scalar channel (plug) on a node.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelInfo {
    pub node: NodeId,
    /// Long attribute name (`translateX`).
    pub name: String,
    /// Short attribute name (`tx`), when the host defines one.
    pub short_name: Option<String>,
    /// Kind of curve that drives (or would drive) this channel.
    pub kind: CurveKind,
    pub locked: bool,
}

impl ChannelInfo {
    /// Key written into clip documents: the short name when there is one.
    pub fn attribute_key(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }
}

/// Start/end of the host's playback range, in frames.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRange {
    pub start: f64,
    pub end: f64,
}

pub trait SceneHost {
    /// Currently selected nodes, in selection order.
    fn selection(&self) -> Vec<NodeId>;

    /// Node name, possibly namespace-qualified (`ns:sub:name`).
    fn node_name(&self, node: NodeId) -> Option<String>;

    /// Keyable channels of a node, in declaration order.
    fn keyable_channels(&self, node: NodeId) -> Vec<ChannelId>;

    /// Find a channel by long or short attribute name.
    fn find_channel(&self, node: NodeId, attr: &str) -> Option<ChannelId>;

    fn channel_info(&self, channel: ChannelId) -> Option<ChannelInfo>;

    fn channel_value(&self, channel: ChannelId) -> Option<f64>;

    /// Channels on any of `nodes` driven by at least one curve.
    fn animated_channels(&self, nodes: &[NodeId]) -> Vec<ChannelId>;

    /// Curves feeding a channel; empty when it is not animated.
    fn driving_curves(&self, channel: ChannelId) -> Vec<CurveId>;

    /// Snapshot of a curve: keys, tangents, weights, infinity, unit.
    fn curve(&self, curve: CurveId) -> Option<Curve>;

    fn current_time(&self) -> f64;

    fn playback_range(&self) -> PlaybackRange;

    // ----- mutation primitives -----

    /// Create a named curve bound to `channel`.
    fn create_curve(
        &mut self,
        channel: ChannelId,
        name: &str,
        curve: Curve,
    ) -> Result<CurveId, HostError>;

    fn delete_curve(&mut self, curve: CurveId) -> Result<(), HostError>;

    /// Overwrite a curve's keys and metadata in place.
    fn replace_curve(&mut self, curve: CurveId, data: Curve) -> Result<(), HostError>;

    fn set_channel_value(&mut self, channel: ChannelId, value: f64) -> Result<(), HostError>;
}
