// Command-line runner for the cloud counter. Results go to stdout, logs to
// stderr, so the output can be piped.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cloud_count::core_modules::sky_loader::sky_loader;
use cloud_count::survey::{CloudSurvey, SurveyConfig, SurveySummary};
use cloud_count::{Cloud, count_sky, find_clouds, samples};

#[derive(Parser)]
#[command(name = "cloud_count")]
#[command(version)]
#[command(about = "Counts clouds in satellite heat-radiation grids")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cloud count of every built-in sample sky
    Samples,

    /// Count the clouds in one sky file (.txt, .json or an image)
    Count {
        path: PathBuf,

        /// Also list every cloud's size and bounding box
        #[arg(long)]
        details: bool,
    },

    /// Count many sky files concurrently
    Survey {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Worker count (overrides the config file)
        #[arg(long, env = "CLOUD_COUNT_WORKERS")]
        workers: Option<usize>,

        /// JSON survey config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,

        /// Collect per-cloud details into each report
        #[arg(long)]
        details: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "cloud_count=debug"
    } else {
        "cloud_count=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_cloud(cloud: &Cloud) {
    let (top_left, bottom_right) = cloud.bounding_box;
    println!(
        "  cloud {}: {} cells, box ({}, {})-({}, {}), coldest {}, mean {:.2}",
        cloud.id,
        cloud.size_in_cells,
        top_left.x,
        top_left.y,
        bottom_right.x,
        bottom_right.y,
        cloud.coldest_index,
        cloud.mean_index,
    );
}

fn run_samples() {
    for sky in samples::all() {
        println!("{}", count_sky(&sky));
    }
}

fn run_count(path: PathBuf, details: bool) -> Result<()> {
    let sky = sky_loader::load_path(&path)
        .with_context(|| format!("failed to load sky from {}", path.display()))?;

    if details {
        let clouds = find_clouds(&sky);
        println!("{}", clouds.len());
        clouds.iter().for_each(print_cloud);
    } else {
        println!("{}", count_sky(&sky));
    }
    Ok(())
}

async fn run_survey(
    paths: Vec<PathBuf>,
    workers: Option<usize>,
    config: Option<PathBuf>,
    json: bool,
    details: bool,
) -> Result<()> {
    let mut survey_config = match config {
        Some(path) => SurveyConfig::from_path(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => SurveyConfig::default(),
    };
    if let Some(workers) = workers {
        survey_config.workers = workers;
    }
    survey_config.collect_clouds |= details;

    let mut skies = Vec::with_capacity(paths.len());
    for path in &paths {
        match sky_loader::load_path(path) {
            Ok(sky) => skies.push((path.display().to_string(), sky)),
            Err(err) => warn!(path = %path.display(), error = %err, "skipping sky"),
        }
    }
    if skies.is_empty() {
        bail!("none of the {} sky files could be loaded", paths.len());
    }

    let survey = CloudSurvey::new(survey_config)?;
    let reports = survey.run(skies).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        println!("{}\t{}", report.name, report.cloud_count);
        report.clouds.iter().for_each(print_cloud);
    }
    let summary = SurveySummary::from_reports(&reports);
    info!(
        skies = summary.skies,
        total_clouds = summary.total_clouds,
        largest_cloud = ?summary.largest_cloud,
        cloudiest = ?summary.cloudiest,
        "survey summary"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Samples => run_samples(),
        Commands::Count { path, details } => run_count(path, details)?,
        Commands::Survey {
            paths,
            workers,
            config,
            json,
            details,
        } => run_survey(paths, workers, config, json, details).await?,
    }

    Ok(())
}
