use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use sbd_core::{Blocks, Matrix, Partition, distance};
use sbd_fit::{BallFitConfig, Bandwidth, Estimator};
use sbd_io::{ExperimentName, MatrixReader, ResultWriter};

#[derive(Parser)]
#[command(name = "sbd")]
#[command(about = "Shape-based distance between two groups of observations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

/// Input matrix and its group layout.
#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Path to the distance matrix CSV file
    #[arg(long)]
    data: PathBuf,

    /// The CSV file starts with a header row
    #[arg(long, default_value_t = false)]
    header: bool,

    /// Number of reference rows in the first group
    #[arg(long)]
    n1: usize,

    /// Number of columns belonging to the first group
    #[arg(long)]
    n1_total: usize,

    /// Number of reference rows in the second group
    #[arg(long)]
    n2: usize,

    /// Number of columns belonging to the second group
    #[arg(long)]
    n2_total: usize,

    /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long)]
    experiment: String,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the shape-based distance between the two groups
    Distance {
        #[command(flatten)]
        input: InputArgs,

        /// Ball-probability estimator: "empirical" or "logistic"
        #[arg(long, default_value = "empirical")]
        estimator: String,

        /// Fixed logistic kernel bandwidth (Silverman's rule if not set)
        #[arg(long)]
        bandwidth: Option<f64>,
    },

    /// Split the matrix into its four group blocks
    Partition {
        #[command(flatten)]
        input: InputArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct DistanceOutput {
    experiment: String,
    estimator: &'static str,
    distance: f64,
    first_term: f64,
    second_term: f64,
}

#[derive(Serialize)]
struct PartitionOutput {
    experiment: String,
    xx: [usize; 2],
    xy: [usize; 2],
    yx: [usize; 2],
    yy: [usize; 2],
}

fn dims(m: &Matrix) -> [usize; 2] {
    [m.rows(), m.cols()]
}

fn parse_estimator(name: &str, bandwidth: Option<f64>) -> Result<Estimator> {
    match (name, bandwidth) {
        ("empirical", None) => Ok(Estimator::Empirical),
        ("empirical", Some(_)) => {
            anyhow::bail!("--bandwidth only applies to the logistic estimator")
        }
        ("logistic", None) => Ok(Estimator::Logistic {
            bandwidth: Bandwidth::Silverman,
        }),
        ("logistic", Some(h)) => Ok(Estimator::Logistic {
            bandwidth: Bandwidth::fixed(h)?,
        }),
        (other, _) => anyhow::bail!("unknown estimator: {other} (expected empirical or logistic)"),
    }
}

/// Read the input matrix and split it into blocks.
fn load_blocks(input: &InputArgs) -> Result<(Partition, Blocks)> {
    let partition = Partition::new(input.n1, input.n1_total, input.n2, input.n2_total)
        .context("invalid group counts")?;

    let matrix = MatrixReader::new(&input.data)
        .with_header(input.header)
        .read()
        .context("failed to read input CSV")?;
    info!(shape = %matrix.shape(), "matrix loaded");

    let blocks = partition
        .split_view(matrix.as_view())
        .context("matrix shape does not match the group counts")?;
    Ok((partition, blocks))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Distance {
            input,
            estimator,
            bandwidth,
        } => {
            let experiment_name = ExperimentName::new(input.experiment.clone())?;
            let estimator = parse_estimator(&estimator, bandwidth)?;
            let config = BallFitConfig::new().with_estimator(estimator);

            let (partition, blocks) = load_blocks(&input)?;
            let result = distance(blocks, &config).context("distance computation failed")?;

            let writer = ResultWriter::new(&input.output_dir, experiment_name)?;
            writer.write_distance(&partition, &result, estimator.name())?;

            let output = DistanceOutput {
                experiment: input.experiment,
                estimator: estimator.name(),
                distance: result.distance.value(),
                first_term: result.first_term,
                second_term: result.second_term,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Partition { input } => {
            let experiment_name = ExperimentName::new(input.experiment.clone())?;
            let (_, blocks) = load_blocks(&input)?;

            let writer = ResultWriter::new(&input.output_dir, experiment_name)?;
            writer.write_blocks(&blocks)?;

            let output = PartitionOutput {
                experiment: input.experiment,
                xx: dims(&blocks.xx),
                xy: dims(&blocks.xy),
                yx: dims(&blocks.yx),
                yy: dims(&blocks.yy),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
