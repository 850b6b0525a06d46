//! georef CLI: estimate a raster/CRS homography from control points and
//! transform GIS line features into pixel space.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use flexi_logger::{Logger, LoggerHandle};
use georef::core::{Pt2, Real};
use georef::linear::apply_homography;
use georef::pipeline::{
    estimate_from_documents, io, transform_lines, ControlPixelRecord, Direction, EstimateConfig,
    FeatureCollection, MatrixRecord, Pairing, TransformConfig, TransformSummary,
};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "georef")]
#[command(about = "Align a raster image to a projected CRS from four control points")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. `debug`, `georef_linear=trace`).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Estimate H_qgis_to_px and H_px_to_qgis from paired control points.
    Estimate(EstimateArgs),

    /// Transform LineString / MultiLineString features with a stored matrix.
    Transform(TransformArgs),

    /// Apply a stored matrix to individual `x,y` points.
    Project(ProjectArgs),
}

#[derive(Debug, Clone, Args)]
struct EstimateArgs {
    /// Pixel control points (`{ "image": ..., "points": [{ "id", "px" }] }`).
    #[arg(long)]
    control_px: PathBuf,

    /// Reference control points as a GeoJSON Point feature collection.
    #[arg(long)]
    control_crs: PathBuf,

    /// Path to write the matrix record (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Pair control points by id instead of by position.
    #[arg(long)]
    pair_by_label: bool,

    /// Skip the coincident/collinear control point check.
    #[arg(long)]
    no_degeneracy_check: bool,

    /// Optional JSON EstimateConfig. Flags above override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct TransformArgs {
    /// Matrix record written by `georef estimate`.
    #[arg(long)]
    matrix: PathBuf,

    /// GeoJSON feature collection of line features.
    #[arg(long)]
    input: PathBuf,

    /// Path to write the transformed lines (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Use H_px_to_qgis (pixel → CRS) instead of H_qgis_to_px.
    #[arg(long)]
    inverse: bool,

    /// Optional JSON TransformConfig. `--inverse` overrides its direction.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct ProjectArgs {
    /// Matrix record written by `georef estimate`.
    #[arg(long)]
    matrix: PathBuf,

    /// Use H_px_to_qgis (pixel → CRS) instead of H_qgis_to_px.
    #[arg(long)]
    inverse: bool,

    /// Points as `x,y`.
    #[arg(required = true, allow_hyphen_values = true)]
    points: Vec<String>,
}

fn init_logging(level: &str) -> Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(level)
        .with_context(|| format!("invalid log specification '{level}'"))?
        .log_to_stderr()
        .start()
        .context("failed to start logger")?;
    Ok(handle)
}

fn load_estimate_config(args: &EstimateArgs) -> Result<EstimateConfig> {
    let mut config = match &args.config {
        Some(path) => io::load_json_file::<EstimateConfig>(path)?,
        None => EstimateConfig::default(),
    };
    if args.pair_by_label {
        config.pairing = Pairing::ByLabel;
    }
    if args.no_degeneracy_check {
        config.check_degeneracy = false;
    }
    if config.control_point_order.is_none() {
        config.control_point_order = Some(config.control_point_order_for(
            &io::file_name(&args.control_px),
            &io::file_name(&args.control_crs),
        ));
    }
    Ok(config)
}

fn direction_for(inverse: bool, fallback: Direction) -> Direction {
    if inverse {
        Direction::PixelToCrs
    } else {
        fallback
    }
}

fn run_estimate_from_files(args: &EstimateArgs) -> Result<MatrixRecord> {
    let control_px: ControlPixelRecord = io::load_json_file(&args.control_px)?;
    let control_crs: FeatureCollection = io::load_json_file(&args.control_crs)?;
    let config = load_estimate_config(args)?;

    let record = estimate_from_documents(&control_px, &control_crs, &config)
        .context("homography estimation failed")?;
    io::write_json_file(&args.out, &record)?;
    info!("wrote {}", args.out.display());
    Ok(record)
}

fn run_transform_from_files(args: &TransformArgs) -> Result<TransformSummary> {
    let matrix: MatrixRecord = io::load_json_file(&args.matrix)?;
    let input: FeatureCollection = io::load_json_file(&args.input)?;
    let mut config = match &args.config {
        Some(path) => io::load_json_file::<TransformConfig>(path)?,
        None => TransformConfig::default(),
    };
    config.direction = direction_for(args.inverse, config.direction);

    let source = io::file_name(&args.input);
    let (out, summary) = transform_lines(&matrix, &source, &input, &config)
        .with_context(|| format!("failed to transform {}", args.input.display()))?;
    io::write_json_file(&args.out, &out)?;
    info!("wrote {}", args.out.display());
    Ok(summary)
}

fn parse_point(s: &str) -> Result<Pt2> {
    let Some((x, y)) = s.split_once(',') else {
        bail!("expected 'x,y', got '{s}'");
    };
    let x: Real = x
        .trim()
        .parse()
        .with_context(|| format!("invalid x in '{s}'"))?;
    let y: Real = y
        .trim()
        .parse()
        .with_context(|| format!("invalid y in '{s}'"))?;
    Ok(Pt2::new(x, y))
}

fn run_project(matrix_path: &Path, inverse: bool, points: &[String]) -> Result<Vec<[Real; 2]>> {
    let record: MatrixRecord = io::load_json_file(matrix_path)?;
    let h = record.matrix(direction_for(inverse, Direction::CrsToPixel))?;
    let points = points
        .iter()
        .map(|s| parse_point(s))
        .collect::<Result<Vec<_>>>()?;
    let projected = apply_homography(&h, &points)?;
    Ok(projected.iter().map(|p| [p.x, p.y]).collect())
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Estimate(args) => {
            run_estimate_from_files(&args)?;
        }
        Commands::Transform(args) => {
            let summary = run_transform_from_files(&args)?;
            println!(
                "{} polyline(s) from {} feature(s) -> {}",
                summary.lines,
                summary.features,
                args.out.display()
            );
        }
        Commands::Project(args) => {
            let projected = run_project(&args.matrix, args.inverse, &args.points)?;
            println!("{}", serde_json::to_string(&projected)?);
        }
    }
    Ok(())
}
