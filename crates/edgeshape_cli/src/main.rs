//! edgeshape CLI
//!
//! Convert edge-format shapes to SVG path data.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use edgeshape_core::{parse_segments, point_list_to_path, ShapeInput, ShapeSource};

mod config;

use config::EdgeshapeConfig;

#[derive(Parser)]
#[command(name = "edgeshape")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reconstruct SVG paths from edge-format shapes", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./edgeshape.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a shape to fill and stroke paths
    Convert {
        /// Shape JSON, raw or normalized ("-" for stdin)
        input: PathBuf,

        /// Output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render as a mask
        #[arg(long)]
        mask: bool,
    },

    /// Decode a raw shape into a normalized shape document
    Normalize {
        /// Raw shape JSON ("-" for stdin)
        input: PathBuf,

        /// Output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep every style reference
        #[arg(long)]
        mask: bool,
    },

    /// Print the segments of a single edge string
    Edge {
        /// Edge string, e.g. "!0 0|200 0|200 200"
        edges: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let config = match cli.config.as_deref() {
        Some(path) => EdgeshapeConfig::load_file(path)?,
        None => EdgeshapeConfig::load_from_dir(&std::env::current_dir()?)?,
    };
    debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Convert {
            input,
            output,
            mask,
        } => cmd_convert(&config, &input, output.as_deref(), mask),

        Commands::Normalize {
            input,
            output,
            mask,
        } => cmd_normalize(&config, &input, output.as_deref(), mask),

        Commands::Edge { edges } => cmd_edge(&edges),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    text.push('\n');

    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn cmd_convert(
    config: &EdgeshapeConfig,
    input: &Path,
    output: Option<&Path>,
    mask: bool,
) -> Result<()> {
    let content = read_input(input)?;
    let mut shape: ShapeInput = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse shape {}", input.display()))?;
    if mask || config.convert.mask {
        shape.set_mask(true);
    }

    let result = shape
        .convert()
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    info!(
        "Converted {}: {} fill(s), {} stroke(s), {} warning(s)",
        input.display(),
        result.fills.len(),
        result.strokes.len(),
        result.warnings.len()
    );

    write_json(&result, output, config.output.pretty)
}

fn cmd_normalize(
    config: &EdgeshapeConfig,
    input: &Path,
    output: Option<&Path>,
    mask: bool,
) -> Result<()> {
    let content = read_input(input)?;
    let mut source: ShapeSource = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse shape {}", input.display()))?;
    if mask || config.convert.mask {
        source.mask = true;
    }

    let document = source
        .normalize()
        .with_context(|| format!("Failed to normalize {}", input.display()))?;

    info!(
        "Normalized {}: {} segment(s)",
        input.display(),
        document.shape.len()
    );

    write_json(&document, output, config.output.pretty)
}

fn cmd_edge(edges: &str) -> Result<()> {
    let segments = parse_segments(edges).context("Failed to parse edge string")?;

    println!("{} segment(s)", segments.len());
    for (index, segment) in segments.iter().enumerate() {
        let b = segment.bounds();
        println!(
            "  [{}] {}  bounds ({}, {}) - ({}, {})",
            index,
            point_list_to_path(segment.points()),
            b.min_x,
            b.min_y,
            b.max_x,
            b.max_y
        );
    }

    Ok(())
}
