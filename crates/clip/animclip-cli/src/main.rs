//! # animclip
//!
//! Save and load animation clips against a JSON scene file.
//!
//! ```bash
//! # export the selection's curves over the playback range (or a pose if it spans <= 1 frame)
//! animclip save --scene shot.json -f walk.clip.json
//! animclip save --scene shot.json -f walk.clip.json --start-frame 10 --end-frame 40
//!
//! # apply a clip to the selection at frame 100 and write the scene back
//! animclip load --scene rig.json -f walk.clip.json --start-frame 100
//! animclip load --scene rig.json -f walk.clip.json --output rig.out.json
//! ```
//!
//! `RUST_LOG` controls verbosity (default `info`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use animclip_core::{load_clip, save_clip, ClipConfig, ExportArgs, ExportMode, ImportArgs};
use animclip_scene::Scene;

#[derive(Parser)]
#[command(name = "animclip")]
#[command(about = "Save and load animation clips against a JSON scene file")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with clip options (pose_span, rotate_order_attribute, legacy_out_tangent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the selected objects to a clip file
    Save {
        /// Scene file to read
        #[arg(long)]
        scene: PathBuf,

        /// Clip file to write
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,

        /// First frame (default: start of playback range)
        #[arg(long, alias = "sf", allow_negative_numbers = true)]
        start_frame: Option<i32>,

        /// Last frame (default: end of playback range)
        #[arg(long, alias = "ef", allow_negative_numbers = true)]
        end_frame: Option<i32>,
    },

    /// Apply a clip file to the selected objects
    Load {
        /// Scene file to modify
        #[arg(long)]
        scene: PathBuf,

        /// Clip file to read
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,

        /// Frame that clip time 0 lands on (default: scene current time)
        #[arg(long, alias = "sf", allow_negative_numbers = true)]
        start_frame: Option<i32>,

        /// Where to write the modified scene (default: overwrite --scene)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ClipConfig> {
    let Some(path) = path else {
        return Ok(ClipConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    ClipConfig::from_json_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Save {
            scene,
            file,
            start_frame,
            end_frame,
        } => {
            let host = Scene::load(&scene)
                .with_context(|| format!("failed to load scene {}", scene.display()))?;
            let args = ExportArgs {
                file,
                start_frame,
                end_frame,
            };
            let report = save_clip(&host, &args, &config)?;
            match report.mode {
                ExportMode::Pose => info!(
                    "{} objects, {} static values",
                    report.document.len(),
                    report.statics
                ),
                ExportMode::Range { .. } => info!(
                    "{} objects, {} curves, {} static values",
                    report.document.len(),
                    report.curves,
                    report.statics
                ),
            }
        }
        Commands::Load {
            scene,
            file,
            start_frame,
            output,
        } => {
            let mut host = Scene::load(&scene)
                .with_context(|| format!("failed to load scene {}", scene.display()))?;
            let args = ImportArgs { file, start_frame };
            let report = load_clip(&mut host, &args)?;
            if report.has_skips() {
                warn!("{} items skipped", report.skipped.len());
            }
            info!(
                "{} curves created, {} curves merged, {} values set at offset {}",
                report.curves_created, report.curves_merged, report.values_set, report.time_offset
            );
            let out = output.unwrap_or(scene);
            host.save(&out)
                .with_context(|| format!("failed to write scene {}", out.display()))?;
        }
    }
    Ok(())
}
