//! In-memory scene graph implementing [`SceneHost`].
//!
//! Ids are dense indices: `NodeId`/`ChannelId` index the node/channel tables,
//! `CurveId`s come from a monotonic counter and are never reused.

use hashbrown::HashMap;

use animclip_core::{
    ChannelId, ChannelInfo, Curve, CurveId, CurveKind, HostError, NodeId, PlaybackRange,
    SceneHost,
};

/// Declaration of one scalar channel on a node.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelSpec {
    pub name: String,
    pub short_name: Option<String>,
    pub kind: CurveKind,
    pub value: f64,
    pub keyable: bool,
    pub locked: bool,
}

impl ChannelSpec {
    pub fn new(name: impl Into<String>, kind: CurveKind) -> Self {
        Self {
            name: name.into(),
            short_name: None,
            kind,
            value: 0.0,
            keyable: true,
            locked: false,
        }
    }

    pub fn short(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn keyable(mut self, keyable: bool) -> Self {
        self.keyable = keyable;
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }
}

#[derive(Clone, Debug)]
pub(crate) struct SceneNode {
    pub(crate) name: String,
    pub(crate) channels: Vec<ChannelId>,
}

#[derive(Clone, Debug)]
pub(crate) struct SceneChannel {
    pub(crate) node: NodeId,
    pub(crate) spec: ChannelSpec,
}

/// A curve bound to one channel.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneCurve {
    pub name: String,
    pub channel: ChannelId,
    pub data: Curve,
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub(crate) nodes: Vec<SceneNode>,
    pub(crate) channels: Vec<SceneChannel>,
    pub(crate) curves: HashMap<CurveId, SceneCurve>,
    next_curve: u32,
    pub(crate) selection: Vec<NodeId>,
    pub(crate) current_time: f64,
    pub(crate) playback: PlaybackRange,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            channels: Vec::new(),
            curves: HashMap::new(),
            next_curve: 0,
            selection: Vec::new(),
            current_time: 1.0,
            playback: PlaybackRange {
                start: 1.0,
                end: 24.0,
            },
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- building -----

    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode {
            name: name.into(),
            channels: Vec::new(),
        });
        id
    }

    pub fn add_channel(
        &mut self,
        node: NodeId,
        spec: ChannelSpec,
    ) -> Result<ChannelId, HostError> {
        let id = ChannelId(self.channels.len() as u32);
        self.nodes
            .get_mut(node.0 as usize)
            .ok_or(HostError::UnknownNode(node))?
            .channels
            .push(id);
        self.channels.push(SceneChannel { node, spec });
        Ok(id)
    }

    /// Bind an existing curve to a channel, bypassing lock checks (scene setup).
    pub fn add_curve(
        &mut self,
        channel: ChannelId,
        name: impl Into<String>,
        data: Curve,
    ) -> Result<CurveId, HostError> {
        self.channel(channel)?;
        let id = self.alloc_curve();
        let name = self.unique_curve_name(&name.into());
        self.curves.insert(
            id,
            SceneCurve {
                name,
                channel,
                data,
            },
        );
        Ok(id)
    }

    pub fn select(&mut self, nodes: &[NodeId]) {
        self.selection = nodes.to_vec();
    }

    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = time;
    }

    pub fn set_playback_range(&mut self, start: f64, end: f64) {
        self.playback = PlaybackRange { start, end };
    }

    pub fn set_locked(&mut self, channel: ChannelId, locked: bool) -> Result<(), HostError> {
        self.channel_mut(channel)?.spec.locked = locked;
        Ok(())
    }

    // ----- inspection -----

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    /// Channel on the node named `node`, by long or short attribute name.
    pub fn channel_by_path(&self, node: &str, attr: &str) -> Option<ChannelId> {
        self.find_channel(self.node_by_name(node)?, attr)
    }

    pub fn scene_curve(&self, id: CurveId) -> Option<&SceneCurve> {
        self.curves.get(&id)
    }

    pub fn curve_by_name(&self, name: &str) -> Option<CurveId> {
        self.curves
            .iter()
            .find(|(_, c)| c.name == name)
            .map(|(id, _)| *id)
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    // ----- internals -----

    fn alloc_curve(&mut self) -> CurveId {
        let id = CurveId(self.next_curve);
        self.next_curve = self.next_curve.wrapping_add(1);
        id
    }

    /// `base`, or `base1`, `base2`, ... if taken.
    fn unique_curve_name(&self, base: &str) -> String {
        let taken = |n: &str| self.curves.values().any(|c| c.name == n);
        if !taken(base) {
            return base.to_string();
        }
        (1u32..)
            .map(|i| format!("{base}{i}"))
            .find(|n| !taken(n))
            .unwrap_or_else(|| base.to_string())
    }

    pub(crate) fn channel(&self, id: ChannelId) -> Result<&SceneChannel, HostError> {
        self.channels
            .get(id.0 as usize)
            .ok_or(HostError::UnknownChannel(id))
    }

    fn channel_mut(&mut self, id: ChannelId) -> Result<&mut SceneChannel, HostError> {
        self.channels
            .get_mut(id.0 as usize)
            .ok_or(HostError::UnknownChannel(id))
    }

    fn unlocked_channel_mut(&mut self, id: ChannelId) -> Result<&mut SceneChannel, HostError> {
        let ch = self.channel_mut(id)?;
        if ch.spec.locked {
            return Err(HostError::LockedChannel(ch.spec.name.clone()));
        }
        Ok(ch)
    }

    pub(crate) fn sorted_curve_ids(&self) -> Vec<CurveId> {
        let mut ids: Vec<CurveId> = self.curves.keys().copied().collect();
        ids.sort_by_key(|id| id.0);
        ids
    }
}

impl SceneHost for Scene {
    fn selection(&self) -> Vec<NodeId> {
        self.selection.clone()
    }

    fn node_name(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node.0 as usize).map(|n| n.name.clone())
    }

    fn keyable_channels(&self, node: NodeId) -> Vec<ChannelId> {
        let Some(n) = self.nodes.get(node.0 as usize) else {
            return Vec::new();
        };
        n.channels
            .iter()
            .copied()
            .filter(|c| self.channel(*c).map(|ch| ch.spec.keyable).unwrap_or(false))
            .collect()
    }

    fn find_channel(&self, node: NodeId, attr: &str) -> Option<ChannelId> {
        let n = self.nodes.get(node.0 as usize)?;
        n.channels.iter().copied().find(|c| {
            self.channel(*c)
                .map(|ch| ch.spec.name == attr || ch.spec.short_name.as_deref() == Some(attr))
                .unwrap_or(false)
        })
    }

    fn channel_info(&self, channel: ChannelId) -> Option<ChannelInfo> {
        let ch = self.channel(channel).ok()?;
        Some(ChannelInfo {
            node: ch.node,
            name: ch.spec.name.clone(),
            short_name: ch.spec.short_name.clone(),
            kind: ch.spec.kind,
            locked: ch.spec.locked,
        })
    }

    fn channel_value(&self, channel: ChannelId) -> Option<f64> {
        self.channel(channel).ok().map(|ch| ch.spec.value)
    }

    fn animated_channels(&self, nodes: &[NodeId]) -> Vec<ChannelId> {
        let mut out = Vec::new();
        for node in nodes {
            let Some(n) = self.nodes.get(node.0 as usize) else {
                continue;
            };
            for &c in &n.channels {
                if !out.contains(&c) && self.curves.values().any(|sc| sc.channel == c) {
                    out.push(c);
                }
            }
        }
        out
    }

    fn driving_curves(&self, channel: ChannelId) -> Vec<CurveId> {
        self.sorted_curve_ids()
            .into_iter()
            .filter(|id| self.curves[id].channel == channel)
            .collect()
    }

    fn curve(&self, curve: CurveId) -> Option<Curve> {
        self.curves.get(&curve).map(|c| c.data.clone())
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn playback_range(&self) -> PlaybackRange {
        self.playback
    }

    fn create_curve(
        &mut self,
        channel: ChannelId,
        name: &str,
        curve: Curve,
    ) -> Result<CurveId, HostError> {
        self.unlocked_channel_mut(channel)?;
        self.add_curve(channel, name, curve)
    }

    fn delete_curve(&mut self, curve: CurveId) -> Result<(), HostError> {
        self.curves
            .remove(&curve)
            .map(|_| ())
            .ok_or(HostError::UnknownCurve(curve))
    }

    fn replace_curve(&mut self, curve: CurveId, data: Curve) -> Result<(), HostError> {
        let sc = self
            .curves
            .get_mut(&curve)
            .ok_or(HostError::UnknownCurve(curve))?;
        sc.data = data;
        Ok(())
    }

    fn set_channel_value(&mut self, channel: ChannelId, value: f64) -> Result<(), HostError> {
        self.unlocked_channel_mut(channel)?.spec.value = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animclip_core::{Keyframe, TangentType};

    fn curve_at(t: f64) -> Curve {
        let mut c = Curve::new(CurveKind::TimeLinear);
        c.push_key(Keyframe::new(t, 1.0, TangentType::Linear, TangentType::Linear));
        c
    }

    #[test]
    fn find_channel_matches_long_and_short_names() {
        let mut s = Scene::new();
        let n = s.add_node("ns:L_arm");
        let tx = s
            .add_channel(n, ChannelSpec::new("translateX", CurveKind::TimeLinear).short("tx"))
            .unwrap();
        assert_eq!(s.find_channel(n, "translateX"), Some(tx));
        assert_eq!(s.find_channel(n, "tx"), Some(tx));
        assert_eq!(s.find_channel(n, "ty"), None);
        assert_eq!(s.channel_by_path("ns:L_arm", "tx"), Some(tx));
    }

    #[test]
    fn curve_names_are_made_unique() {
        let mut s = Scene::new();
        let n = s.add_node("a");
        let tx = s
            .add_channel(n, ChannelSpec::new("tx", CurveKind::TimeLinear))
            .unwrap();
        let c0 = s.add_curve(tx, "a_tx", curve_at(0.0)).unwrap();
        let c1 = s.add_curve(tx, "a_tx", curve_at(1.0)).unwrap();
        assert_eq!(s.scene_curve(c0).unwrap().name, "a_tx");
        assert_eq!(s.scene_curve(c1).unwrap().name, "a_tx1");
        assert_eq!(s.driving_curves(tx), vec![c0, c1]);
    }

    #[test]
    fn locked_channels_reject_writes() {
        let mut s = Scene::new();
        let n = s.add_node("a");
        let tx = s
            .add_channel(n, ChannelSpec::new("tx", CurveKind::TimeLinear).locked(true))
            .unwrap();
        assert!(matches!(
            s.set_channel_value(tx, 2.0),
            Err(HostError::LockedChannel(_))
        ));
        assert!(s.create_curve(tx, "a_tx", curve_at(0.0)).is_err());
        s.set_locked(tx, false).unwrap();
        s.set_channel_value(tx, 2.0).unwrap();
        assert_eq!(s.channel_value(tx), Some(2.0));
    }

    #[test]
    fn animated_channels_follow_node_order() {
        let mut s = Scene::new();
        let a = s.add_node("a");
        let b = s.add_node("b");
        let a_tx = s.add_channel(a, ChannelSpec::new("tx", CurveKind::TimeLinear)).unwrap();
        let _a_ty = s.add_channel(a, ChannelSpec::new("ty", CurveKind::TimeLinear)).unwrap();
        let b_tx = s.add_channel(b, ChannelSpec::new("tx", CurveKind::TimeLinear)).unwrap();
        s.add_curve(b_tx, "b_tx", curve_at(0.0)).unwrap();
        s.add_curve(a_tx, "a_tx", curve_at(0.0)).unwrap();
        assert_eq!(s.animated_channels(&[b, a]), vec![b_tx, a_tx]);
        assert_eq!(s.animated_channels(&[a]), vec![a_tx]);
    }
}
