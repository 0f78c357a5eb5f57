//! Import: file -> clip document -> staged host changes -> one commit.
//!
//! Every selected object is resolved against the document (exact name, then
//! mirrored). Curves are decoded with the requested time offset and either
//! create a new curve on the channel or are merged into each curve already
//! driving it. Static values are set verbatim. Decoding finishes for the whole
//! selection before anything is committed, so a malformed curve aborts with
//! the scene untouched.

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::change::{ChangeOp, ChangeSet};
use crate::codec::decode_curve;
use crate::document::{ClipDocument, ObjectEntry};
use crate::error::{ClipError, HostError, Result};
use crate::host::{ChannelId, ChannelInfo, NodeId, SceneHost};
use crate::report::{ImportReport, ResolvedObject, Skip};
use crate::resolve::{local_name, resolve};

/// Command-level arguments; an absent start frame means the host's current time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportArgs {
    pub file: Option<PathBuf>,
    pub start_frame: Option<i32>,
}

/// Read `args.file` and apply it to the current selection.
pub fn load_clip<H: SceneHost + ?Sized>(
    host: &mut H,
    args: &ImportArgs,
) -> Result<ImportReport> {
    let path = args.file.as_deref().ok_or(ClipError::MissingFilePath)?;
    let doc = ClipDocument::read_from(path)?;
    let report = import_clip(host, &doc, args.start_frame.map(f64::from))?;
    info!("Import anim clip from '{}'", path.display());
    Ok(report)
}

/// Apply `doc` to the current selection, offsetting key times by
/// `start_frame` (or the host's current time).
pub fn import_clip<H: SceneHost + ?Sized>(
    host: &mut H,
    doc: &ClipDocument,
    start_frame: Option<f64>,
) -> Result<ImportReport> {
    let time_offset = start_frame.unwrap_or_else(|| host.current_time());

    let mut stage = Staging::default();
    for node in host.selection() {
        stage.object(&*host, doc, node, time_offset)?;
    }

    let Staging {
        changes,
        resolved,
        skipped,
        curves_created,
        curves_merged,
        values_set,
    } = stage;

    debug!(
        "committing {} staged changes ({} skipped items)",
        changes.len(),
        skipped.len()
    );
    let transaction = changes.commit(host)?;

    Ok(ImportReport {
        resolved,
        skipped,
        time_offset,
        curves_created,
        curves_merged,
        values_set,
        transaction,
    })
}

/// Read-only pass that turns document entries into staged changes.
#[derive(Default)]
struct Staging {
    changes: ChangeSet,
    resolved: Vec<ResolvedObject>,
    skipped: Vec<Skip>,
    curves_created: usize,
    curves_merged: usize,
    values_set: usize,
}

impl Staging {
    fn skip(&mut self, skip: Skip) {
        warn!("{skip}");
        self.skipped.push(skip);
    }

    fn object<H: SceneHost + ?Sized>(
        &mut self,
        host: &H,
        doc: &ClipDocument,
        node: NodeId,
        time_offset: f64,
    ) -> Result<()> {
        let name = host.node_name(node).ok_or(HostError::UnknownNode(node))?;
        let local = local_name(&name);

        let Some(resolution) = resolve(doc, local) else {
            self.skip(Skip::UnresolvedObject {
                object: local.to_string(),
            });
            return Ok(());
        };
        if resolution.is_mirrored() {
            debug!("'{local}' resolved to mirrored entry '{}'", resolution.key());
        }
        let Some(entry) = doc.get(resolution.key()) else {
            return Ok(());
        };
        let key = resolution.key().to_string();

        self.animation(host, node, &name, &key, entry, time_offset)?;
        self.statics(host, node, &name, entry);

        self.resolved.push(ResolvedObject {
            object: name,
            resolution,
        });
        Ok(())
    }

    /// Destination channel for `attr`, or a recorded skip when it is missing or locked.
    fn destination<H: SceneHost + ?Sized>(
        &mut self,
        host: &H,
        node: NodeId,
        name: &str,
        attr: &str,
    ) -> Option<(ChannelId, ChannelInfo)> {
        let found = host
            .find_channel(node, attr)
            .and_then(|c| host.channel_info(c).map(|info| (c, info)));
        match found {
            None => {
                self.skip(Skip::MissingAttribute {
                    object: name.to_string(),
                    attribute: attr.to_string(),
                });
                None
            }
            Some((_, info)) if info.locked => {
                self.skip(Skip::LockedChannel {
                    object: name.to_string(),
                    attribute: attr.to_string(),
                });
                None
            }
            found => found,
        }
    }

    fn animation<H: SceneHost + ?Sized>(
        &mut self,
        host: &H,
        node: NodeId,
        name: &str,
        key: &str,
        entry: &ObjectEntry,
        time_offset: f64,
    ) -> Result<()> {
        for (attr, obj) in &entry.animation {
            let Some((channel, info)) = self.destination(host, node, name, attr) else {
                continue;
            };

            let existing = host.driving_curves(channel);
            if existing.is_empty() {
                let curve = decode_curve(obj, info.kind, time_offset)
                    .map_err(|e| e.at(key, attr))?;
                self.changes.push(ChangeOp::CreateCurve {
                    channel,
                    name: format!("{key}_{attr}"),
                    curve,
                });
                self.curves_created += 1;
            } else {
                for id in existing {
                    let kind = host.curve(id).ok_or(HostError::UnknownCurve(id))?.kind;
                    let incoming = decode_curve(obj, kind, time_offset)
                        .map_err(|e| e.at(key, attr))?;
                    self.changes.push(ChangeOp::MergeKeys {
                        curve: id,
                        incoming,
                    });
                    self.curves_merged += 1;
                }
            }
        }
        Ok(())
    }

    fn statics<H: SceneHost + ?Sized>(
        &mut self,
        host: &H,
        node: NodeId,
        name: &str,
        entry: &ObjectEntry,
    ) {
        for (attr, &value) in &entry.static_values {
            let Some((channel, _)) = self.destination(host, node, name, attr) else {
                continue;
            };
            self.changes.push(ChangeOp::SetValue { channel, value });
            self.values_set += 1;
        }
    }
}
