//! CLI entry point for the review statistics tool.
//!
//! Loads a review CSV once, then either runs a single aggregation subcommand
//! or opens the interactive menu.

mod menu;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use review_stats::analyzers::DEFAULT_TOP_N;
use review_stats::analyzers::temporal::Granularity;
use review_stats::loader::load_reviews;
use review_stats::output::load_summary_text;
use review_stats::report::{Query, run_query};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_SOURCE: &str = "Reviews.csv";

#[derive(Parser)]
#[command(name = "review_stats")]
#[command(about = "Descriptive statistics over a product review CSV", long_about = None)]
struct Cli {
    /// Review CSV to load (falls back to $REVIEWS_CSV, then Reviews.csv)
    #[arg(short, long, global = true, value_name = "FILE")]
    source: Option<String>,

    /// Print results as JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive menu (default)
    Menu,
    /// Total reviews, mean score, mean helpfulness and score distribution
    Summary,
    /// Number of reviews per score
    Distribution,
    /// Users with the highest mean score
    UserMeans {
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },
    /// Products with the highest mean score
    ProductMeans {
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },
    /// Products with the most reviews of a given score
    TopScored {
        #[arg(long, default_value_t = 5)]
        score: i32,
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },
    /// Products with the highest helpfulness-weighted mean score
    Weighted {
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },
    /// Convert a Unix timestamp (default: the first review's) to a UTC date
    Date {
        #[arg(value_name = "TIMESTAMP")]
        timestamp: Option<String>,
    },
    /// Number of reviews per year
    ByYear,
    /// Period with the most reviews
    Busiest {
        #[arg(short, long, value_enum, default_value_t = Granularity::Month)]
        granularity: Granularity,
    },
    /// Mean score per period
    ScoreOverTime {
        #[arg(short, long, value_enum, default_value_t = Granularity::Month)]
        granularity: Granularity,
        /// Only show the first N periods
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Users with the most reviews
    ActiveUsers {
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },
    /// Users whose reviews received the most helpful votes
    HelpfulUsers {
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },
    /// Users with the longest reviews on average
    WordsPerUser {
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },
}

impl Commands {
    /// The aggregation this subcommand runs, or `None` for the menu.
    fn query(self) -> Option<Query> {
        Some(match self {
            Commands::Menu => return None,
            Commands::Summary => Query::Summary,
            Commands::Distribution => Query::Distribution,
            Commands::UserMeans { top } => Query::UserMeans { top },
            Commands::ProductMeans { top } => Query::ProductMeans { top },
            Commands::TopScored { score, top } => Query::TopScored { score, top },
            Commands::Weighted { top } => Query::Weighted { top },
            Commands::Date { timestamp } => Query::Date { timestamp },
            Commands::ByYear => Query::ByYear,
            Commands::Busiest { granularity } => Query::Busiest { granularity },
            Commands::ScoreOverTime { granularity, limit } => {
                Query::ScoreOverTime { granularity, limit }
            }
            Commands::ActiveUsers { top } => Query::ActiveUsers { top },
            Commands::HelpfulUsers { top } => Query::HelpfulUsers { top },
            Commands::WordsPerUser { top } => Query::WordsPerUser { top },
        })
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/review_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("review_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let source = cli
        .source
        .or_else(|| std::env::var("REVIEWS_CSV").ok())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    let loaded = match load_reviews(&source) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!(category = e.category(), error = %e, "Failed to load reviews");
            return Err(anyhow!("{}: {e}. Exiting.", e.category()));
        }
    };
    info!(source = %source, "{}", load_summary_text(&loaded));

    match cli.command.and_then(Commands::query) {
        Some(query) => println!("{}", run_query(&query, &loaded.reviews, cli.json)?),
        None => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            menu::run_menu(
                &loaded.reviews,
                &mut stdin.lock(),
                &mut stdout.lock(),
                cli.json,
            )?;
        }
    }

    Ok(())
}
