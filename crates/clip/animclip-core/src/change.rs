//! Reversible host mutations.
//!
//! Import stages every mutation in a [`ChangeSet`]; nothing reaches the host
//! until [`ChangeSet::commit`] applies the whole log in order. The returned
//! [`Transaction`] undoes it as one unit (inverses replayed in reverse) and
//! can redo it.

use log::{debug, error};

use crate::curve::Curve;
use crate::error::{HostError, Result};
use crate::host::{ChannelId, CurveId, SceneHost};

type HostResult<T> = std::result::Result<T, HostError>;

/// One staged mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeOp {
    /// Create a named curve bound to a channel that has none.
    CreateCurve {
        channel: ChannelId,
        name: String,
        curve: Curve,
    },
    /// Add keys on top of an existing curve (no pre-clear).
    MergeKeys { curve: CurveId, incoming: Curve },
    /// Set a channel's scalar value.
    SetValue { channel: ChannelId, value: f64 },
}

/// Data needed to take back one applied [`ChangeOp`].
#[derive(Clone, Debug, PartialEq)]
enum Inverse {
    DeleteCurve(CurveId),
    RestoreCurve { curve: CurveId, snapshot: Curve },
    RestoreValue { channel: ChannelId, value: f64 },
}

fn apply_op<H: SceneHost + ?Sized>(host: &mut H, op: &ChangeOp) -> HostResult<Inverse> {
    match op {
        ChangeOp::CreateCurve {
            channel,
            name,
            curve,
        } => {
            let id = host.create_curve(*channel, name, curve.clone())?;
            debug!("created curve '{name}' ({} keys) as {id:?}", curve.len());
            Ok(Inverse::DeleteCurve(id))
        }
        ChangeOp::MergeKeys { curve, incoming } => {
            let snapshot = host.curve(*curve).ok_or(HostError::UnknownCurve(*curve))?;
            let mut merged = snapshot.clone();
            merged.merge_keys(incoming);
            host.replace_curve(*curve, merged)?;
            debug!("merged {} keys into {curve:?}", incoming.len());
            Ok(Inverse::RestoreCurve {
                curve: *curve,
                snapshot,
            })
        }
        ChangeOp::SetValue { channel, value } => {
            let previous = host
                .channel_value(*channel)
                .ok_or(HostError::UnknownChannel(*channel))?;
            host.set_channel_value(*channel, *value)?;
            Ok(Inverse::RestoreValue {
                channel: *channel,
                value: previous,
            })
        }
    }
}

fn apply_inverse<H: SceneHost + ?Sized>(host: &mut H, inv: &Inverse) -> HostResult<()> {
    match inv {
        Inverse::DeleteCurve(id) => host.delete_curve(*id),
        Inverse::RestoreCurve { curve, snapshot } => host.replace_curve(*curve, snapshot.clone()),
        Inverse::RestoreValue { channel, value } => host.set_channel_value(*channel, *value),
    }
}

fn revert<H: SceneHost + ?Sized>(host: &mut H, inverses: &[Inverse]) -> HostResult<()> {
    for inv in inverses.iter().rev() {
        apply_inverse(host, inv)?;
    }
    Ok(())
}

/// Apply `ops` in order. On failure, roll back what was applied and return the error.
fn apply_all<H: SceneHost + ?Sized>(host: &mut H, ops: &[ChangeOp]) -> Result<Vec<Inverse>> {
    let mut inverses = Vec::with_capacity(ops.len());
    for op in ops {
        match apply_op(host, op) {
            Ok(inv) => inverses.push(inv),
            Err(e) => {
                if let Err(rollback) = revert(host, &inverses) {
                    error!("rollback after failed commit also failed: {rollback}");
                }
                return Err(e.into());
            }
        }
    }
    Ok(inverses)
}

/// Ordered, not-yet-applied mutations.
#[derive(Clone, Debug, Default)]
pub struct ChangeSet {
    ops: Vec<ChangeOp>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: ChangeOp) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeOp> {
        self.ops.iter()
    }

    /// Apply every staged op once. All-or-nothing: a host failure rolls back
    /// the ops already applied.
    pub fn commit<H: SceneHost + ?Sized>(self, host: &mut H) -> Result<Transaction> {
        let inverses = apply_all(host, &self.ops)?;
        Ok(Transaction {
            ops: self.ops,
            inverses,
            applied: true,
        })
    }
}

/// A committed [`ChangeSet`] that can be undone and redone as a unit.
#[derive(Clone, Debug)]
pub struct Transaction {
    ops: Vec<ChangeOp>,
    inverses: Vec<Inverse>,
    applied: bool,
}

impl Transaction {
    pub fn ops(&self) -> &[ChangeOp] {
        &self.ops
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Replay inverses in reverse order. No-op if already undone.
    pub fn undo<H: SceneHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        if !self.applied {
            return Ok(());
        }
        revert(host, &self.inverses)?;
        self.inverses.clear();
        self.applied = false;
        Ok(())
    }

    /// Re-apply the forward ops. No-op if currently applied.
    pub fn redo<H: SceneHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        if self.applied {
            return Ok(());
        }
        self.inverses = apply_all(host, &self.ops)?;
        self.applied = true;
        Ok(())
    }
}
