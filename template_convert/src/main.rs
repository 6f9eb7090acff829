use anyhow::{bail, Context};
use clap::Parser;
use serde_derive::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use unistroke::{RawTemplate, Stroke};

/// Converts recorded gestures into the binary template library.
#[derive(Parser, Debug)]
#[command(name = "template_convert", version)]
struct Cli {
    /// Recorded gestures (JSON array of `{ name, points: [[x, y, t], ...] }`)
    #[arg(long, default_value = "./unistroke/data/templates.json")]
    input: PathBuf,

    /// Binary library to write
    #[arg(long, default_value = "./unistroke/data/templates.bin")]
    output: PathBuf,
}

// One recorded gesture; `t` is milliseconds since the stroke began
#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct RecordedGesture {
    name: String,
    points: Vec<[f64; 3]>,
}

fn parse_recorded(fname: &Path) -> anyhow::Result<Vec<RawTemplate>> {
    let file = File::open(fname).with_context(|| format!("Failed to open {}", fname.display()))?;
    let recorded: Vec<RecordedGesture> = serde_json::from_reader(file)
        .with_context(|| format!("{} should hold a JSON array of gestures", fname.display()))?;

    let mut res: Vec<RawTemplate> = Vec::with_capacity(recorded.len());
    for gesture in recorded {
        if gesture.name.trim().is_empty() {
            bail!("Gesture #{} has no name", res.len() + 1);
        }
        // Timestamps belong to the recorder; only geometry goes into the library
        let points: Vec<[f32; 2]> = gesture.points.iter().map(|pt| [pt[0] as f32, pt[1] as f32]).collect();
        let template = RawTemplate {
            name: gesture.name,
            points,
        };
        // Refuse anything the recognizer would refuse to register
        if let Err(e) = Stroke::new(template.to_points()) {
            warn!(gesture = %template.name, error = %e, "Skipping gesture");
            continue;
        }
        res.push(template);
    }
    Ok(res)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let templates = parse_recorded(&cli.input)?;
    let mut f = File::create(&cli.output).with_context(|| format!("Failed to create {}", cli.output.display()))?;
    bincode::serialize_into(&mut f, &templates).context("Failed to serialize into binary file")?;
    info!(count = templates.len(), output = %cli.output.display(), "Wrote template library");
    Ok(())
}
