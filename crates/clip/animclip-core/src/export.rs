//! Export: scene selection -> clip document -> file.
//!
//! A window no wider than [`ClipConfig::pose_span`] captures the current pose
//! (static values of keyable channels). Anything wider captures the curves of
//! every animated channel on the selection, windowed and rebased to the start.
//! Export never mutates the host.

use std::path::PathBuf;

use log::{debug, info};

use crate::codec::{encode_curve_with, FrameWindow};
use crate::config::ClipConfig;
use crate::document::ClipDocument;
use crate::error::{ClipError, Result};
use crate::host::{NodeId, SceneHost};
use crate::report::{ExportMode, ExportReport};
use crate::resolve::local_name;

/// Command-level arguments; absent frames fall back to the playback range.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportArgs {
    pub file: Option<PathBuf>,
    pub start_frame: Option<i32>,
    pub end_frame: Option<i32>,
}

/// Export the current selection to `args.file`.
pub fn save_clip<H: SceneHost + ?Sized>(
    host: &H,
    args: &ExportArgs,
    config: &ClipConfig,
) -> Result<ExportReport> {
    let path = args.file.as_deref().ok_or(ClipError::MissingFilePath)?;
    let report = export_clip(
        host,
        args.start_frame.map(f64::from),
        args.end_frame.map(f64::from),
        config,
    )?;
    report.document.write_to(path)?;

    match report.mode {
        ExportMode::Pose => info!("Export pose clip to '{}'", path.display()),
        ExportMode::Range { start, end } => info!(
            "Export anim clip in range {}..{} to '{}'",
            start as i64,
            end as i64,
            path.display()
        ),
    }
    Ok(report)
}

/// Build the clip document for the current selection without writing it.
pub fn export_clip<H: SceneHost + ?Sized>(
    host: &H,
    start_frame: Option<f64>,
    end_frame: Option<f64>,
    config: &ClipConfig,
) -> Result<ExportReport> {
    let range = host.playback_range();
    let start = start_frame.unwrap_or(range.start);
    let end = end_frame.unwrap_or(range.end);
    let selection = host.selection();

    let (mode, document) = if end - start <= config.pose_span {
        (ExportMode::Pose, export_pose(host, &selection, config))
    } else {
        let window = FrameWindow::new(Some(start), Some(end));
        (
            ExportMode::Range { start, end },
            export_range(host, &selection, window, config)?,
        )
    };

    let curves = document.iter().map(|(_, e)| e.animation.len()).sum();
    let statics = document.iter().map(|(_, e)| e.static_values.len()).sum();
    debug!(
        "exported {} objects ({curves} curves, {statics} static values)",
        document.len()
    );
    Ok(ExportReport {
        mode,
        document,
        curves,
        statics,
    })
}

fn export_pose<H: SceneHost + ?Sized>(
    host: &H,
    selection: &[NodeId],
    config: &ClipConfig,
) -> ClipDocument {
    let mut doc = ClipDocument::new();
    for &node in selection {
        let Some(name) = host.node_name(node) else {
            continue;
        };
        let entry = doc.entry_mut(local_name(&name));

        for channel in host.keyable_channels(node) {
            if let (Some(info), Some(value)) =
                (host.channel_info(channel), host.channel_value(channel))
            {
                entry.set_static(info.attribute_key(), value);
            }
        }

        let ro = &config.rotate_order_attribute;
        if let Some(value) = host
            .find_channel(node, ro)
            .and_then(|c| host.channel_value(c))
        {
            entry.set_static(ro.clone(), value);
        }
    }
    doc
}

fn export_range<H: SceneHost + ?Sized>(
    host: &H,
    selection: &[NodeId],
    window: FrameWindow,
    config: &ClipConfig,
) -> Result<ClipDocument> {
    let mut doc = ClipDocument::new();
    let ro = config.rotate_order_attribute.as_str();

    for channel in host.animated_channels(selection) {
        let curves = host.driving_curves(channel);
        let Some(&first) = curves.first() else {
            continue;
        };
        let (Some(info), Some(curve)) = (host.channel_info(channel), host.curve(first)) else {
            continue;
        };
        let Some(name) = host.node_name(info.node) else {
            continue;
        };
        let local = local_name(&name);
        let attr = info.attribute_key();
        if curves.len() > 1 {
            debug!(
                "'{name}.{attr}' has {} driving curves; exporting the first",
                curves.len()
            );
        }
        if !curve.kind.is_time_input() {
            debug!(
                "'{name}.{attr}' is a {} curve; the window applies to its input values",
                curve.kind
            );
        }

        let encoded =
            encode_curve_with(&curve, window, config).map_err(|e| e.at(local, attr))?;
        let entry = doc.entry_mut(local);
        if !entry.static_values.contains_key(ro) {
            if let Some(value) = host
                .find_channel(info.node, ro)
                .and_then(|c| host.channel_value(c))
            {
                entry.set_static_once(ro, value);
            }
        }
        entry.insert_curve(attr, encoded);
    }
    Ok(doc)
}
