//! Rank-truncated SVD reconstruction of a grayscale image.
//!
//! Usage:
//!   svdrecon --image photo.png --output-dir out/
//!   svdrecon --levels 0.01,0.05,0.2 --full

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use svdrecon::imaging::{DEFAULT_SEED, DEFAULT_SIZE, default_image, load_grayscale, save_grayscale};
use svdrecon::metrics::relative_error;
use svdrecon::{Decomposer, Layout, reconstruct_levels, retention_levels};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_NAME: &str = "Default";

#[derive(Parser, Debug)]
#[command(name = "svdrecon")]
#[command(about = "Approximate a grayscale image by keeping its leading singular values")]
struct Args {
    /// Path to the input image. A built-in test image is used when omitted.
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Fractions of the singular values to keep, each in [0, 1]
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = parse_fraction,
        default_values_t = vec![0.05, 0.10, 0.25, 0.50, 1.0]
    )]
    levels: Vec<f64>,

    /// Write the grayscale original and every reconstruction as PNG files here
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Compute square U and V instead of the economy factors
    #[arg(long)]
    full: bool,
}

fn parse_fraction(s: &str) -> Result<f64> {
    let f: f64 = s.trim().parse().with_context(|| format!("not a number: {s}"))?;
    if !(0.0..=1.0).contains(&f) {
        bail!("fraction must be between 0 and 1, got {f}");
    }
    Ok(f)
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_NAME.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let (name, matrix) = match &args.image {
        Some(path) => {
            let matrix = load_grayscale(path)
                .with_context(|| format!("failed to load image {}", path.display()))?;
            info!(path = %path.display(), "image loaded as a numerical array");
            (display_name(path), matrix)
        }
        None => {
            info!(size = DEFAULT_SIZE, "no image given, using the built-in test image");
            (DEFAULT_NAME.to_string(), default_image(DEFAULT_SIZE, DEFAULT_SEED))
        }
    };

    let layout = if args.full { Layout::Full } else { Layout::Economy };
    let decomposition = Decomposer::new()
        .layout(layout)
        .decompose(&matrix)
        .context("failed to factorize image")?;
    info!(
        rows = matrix.nrows(),
        cols = matrix.ncols(),
        singular_values = decomposition.rank(),
        "image factorized"
    );

    let levels = retention_levels(decomposition.rank(), &args.levels);
    let reconstructions = reconstruct_levels(&decomposition, &levels);

    println!("{name}: {} x {}", matrix.nrows(), matrix.ncols());
    println!(
        "{:<10} {:>8} {:>14} {:>16}",
        "Fraction", "k", "Energy kept", "Relative error"
    );
    println!("{}", "-".repeat(51));
    for (fraction, rec) in args.levels.iter().zip(&reconstructions) {
        let err = relative_error(&matrix, &rec.matrix)?;
        println!(
            "{:<10.2} {:>8} {:>14.6} {:>16.6}",
            fraction,
            rec.k,
            decomposition.energy_ratio(rec.k),
            err
        );
    }

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let original = dir.join(format!("{name}_original.png"));
        save_grayscale(&matrix, &original)?;
        for rec in &reconstructions {
            save_grayscale(&rec.matrix, &dir.join(format!("{name}_k{}.png", rec.k)))?;
        }
        info!(dir = %dir.display(), files = reconstructions.len() + 1, "reconstructions written");
    }

    Ok(())
}
