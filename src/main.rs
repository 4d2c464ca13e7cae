use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use moviedash::config::DashboardConfig;
use moviedash::data::Dataset;
use moviedash::metric::{DirectorMetric, GenreMetric, HistogramField, Metric};
use moviedash::parser::parse_selection;
use moviedash::runtime::render_view;
use moviedash::state::{Interaction, View, ViewState};
use moviedash::OutputFormat;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "moviedash")]
#[command(about = "Explore a top-rated movies dataset: filter, tabulate and chart it", long_about = None)]
struct Args {
    /// JSON file with the movie records
    #[arg(long, default_value = "data/csfd_movies.json")]
    data: PathBuf,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Selection expression, e.g. 'genres(Drama, "Film noir") | rating(85..) | votes(..50000)'
    #[arg(long)]
    filter: Option<String>,

    /// Output format: png, svg or json
    #[arg(long)]
    format: Option<OutputFormat>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    view: ViewCommand,
}

#[derive(Subcommand, Debug)]
enum ViewCommand {
    /// Filtered rows as CSV (JSON with --format json)
    Dataset,
    /// Average rating and number of ratings by rank
    Ratings,
    /// Per-genre averages
    Genres {
        /// avg_rating, avg_votes or avg_duration
        #[arg(long)]
        metric: Option<String>,
    },
    /// Ranking of the top directors
    Directors {
        /// avg_rating, total_votes, count_movies, avg_footage or count_genres
        #[arg(long)]
        metric: Option<String>,
        /// Number of directors shown
        #[arg(long)]
        top: Option<usize>,
    },
    /// Movie length against rating with a linear fit
    Scatter,
    /// Distribution of one field
    Histogram {
        /// rating_avg, rating_total, duration or year
        #[arg(long)]
        field: Option<String>,
        /// Bin width
        #[arg(long)]
        step: Option<f64>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(format) = args.format {
        config.render.format = format;
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let dataset = Dataset::load(&args.data).context("Failed to load dataset")?;

    let mut interactions = match &args.filter {
        Some(expr) => parse_selection(expr).context("Failed to parse --filter")?,
        None => Vec::new(),
    };

    let view = match &args.view {
        ViewCommand::Dataset => View::Dataset,
        ViewCommand::Ratings => View::Ratings,
        ViewCommand::Genres { metric } => {
            if let Some(key) = metric {
                interactions.push(Interaction::SetGenreMetric(GenreMetric::from_key(key)?));
            }
            View::Genres
        }
        ViewCommand::Directors { metric, top } => {
            if let Some(key) = metric {
                interactions.push(Interaction::SetDirectorMetric(DirectorMetric::from_key(key)?));
            }
            if let Some(n) = top {
                config.top_directors = *n;
            }
            View::Directors
        }
        ViewCommand::Scatter => View::Scatter,
        ViewCommand::Histogram { field, step } => {
            let field = match field {
                Some(key) => HistogramField::from_key(key)?,
                None => HistogramField::default_metric(),
            };
            interactions.push(Interaction::SetHistogramField(field));
            if let Some(step) = step {
                config.bin_steps.set(field, *step);
            }
            View::Histogram
        }
    };

    let state = ViewState::new(&dataset)
        .apply_all(&dataset, interactions)
        .context("Failed to apply selection")?;

    let bytes = render_view(&dataset, &state, view, &config)
        .with_context(|| format!("Failed to render view '{}'", view.key()))?;

    match &args.output {
        Some(path) => {
            fs::write(path, &bytes)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "Wrote output");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&bytes)
                .context("Failed to write output to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
