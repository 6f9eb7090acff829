use anyhow::Context;
use clap::Parser;
use serde_derive::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use unistroke::{Point, Recognizer, RecognizerConfig};

/// Replays labelled strokes through the recognizer and reports accuracy and speed.
#[derive(Parser, Debug)]
#[command(name = "cli_demo", version)]
struct Cli {
    /// Labelled strokes, one JSON object per line
    #[arg(long, default_value = "cli_demo/data/inputs.jsonl")]
    inputs: PathBuf,

    /// Evaluation cycles over all inputs
    #[arg(long, default_value_t = 1000)]
    iters: usize,

    /// Acceptance threshold applied to the best score
    #[arg(long, default_value_t = 0.7)]
    threshold: f64,

    /// Recognizer configuration (TOML); defaults when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fewest points a stroke needs to be recognized (overrides the config)
    #[arg(long)]
    min_points: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize, Deserialize)]
struct Input {
    name: String,
    points: Vec<[f64; 2]>,
}

impl Input {
    fn to_points(&self) -> Vec<Point> {
        self.points.iter().map(|pt| Point::new(pt[0], pt[1])).collect()
    }
}

fn read_inputs(fname: &Path) -> anyhow::Result<Vec<Input>> {
    let mut res: Vec<Input> = Vec::new();
    let file = File::open(fname).with_context(|| format!("Failed to open {}", fname.display()))?;
    for (ix, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let input: Input = serde_json::from_str(&line)
            .with_context(|| format!("Line {} is not a labelled stroke", ix + 1))?;
        res.push(input);
    }
    Ok(res)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let mut config = match &cli.config {
        Some(path) => RecognizerConfig::load(path)?,
        None => RecognizerConfig::default(),
    };
    if let Some(min_points) = cli.min_points {
        config = config.with_min_points(min_points);
    }
    let recognizer = Recognizer::with_builtin_templates(config)?;
    info!(templates = recognizer.template_count(), "Loaded built-in templates");

    let inputs = read_inputs(&cli.inputs)?;
    println!("Loaded {} inputs; starting {} cycles of evaluation.", inputs.len(), cli.iters);
    let strokes: Vec<(String, Vec<Point>)> = inputs.iter().map(|i| (i.name.clone(), i.to_points())).collect();

    // One verbose pass so misses can be inspected
    for (expected, points) in &strokes {
        let res = recognizer.recognize(points);
        if res.accept(cli.threshold) == Some(expected.as_str()) {
            debug!(expected = %expected, score = res.score, "Recognized");
        } else {
            warn!(expected = %expected, got = %res.name, score = res.score, "Missed");
        }
    }

    let start = Instant::now();
    let mut guessed = 0;
    for _ in 0..cli.iters {
        for (expected, points) in &strokes {
            let res = recognizer.recognize(points);
            if res.accept(cli.threshold) == Some(expected.as_str()) {
                guessed += 1;
            }
        }
    }
    let duration = start.elapsed();
    let total = cli.iters * strokes.len();
    println!("Finished in {:?}. Correct guesses: {} of {}.", duration, guessed, total);
    if total > 0 {
        println!("Mean time per stroke: {:?}.", duration / total as u32);
    }
    Ok(())
}
