use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use crossterm::terminal;
use dotenvy::dotenv;
use std::fs;
use std::io::stdout;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tweet_cell::config::Config;
use tweet_cell::display::{self, DisplayMode};
use tweet_cell::preview;
use tweet_cell::twitter_client::api;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tweet JSON as returned by the statuses endpoints
    tweet: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Mode::Compact)]
    mode: Mode,

    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render as of this instant (RFC 3339) instead of now
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Compact,
    Detail,
}

impl From<Mode> for DisplayMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Compact => DisplayMode::Compact,
            Mode::Detail => DisplayMode::Detail,
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    dotenv().ok();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .with_env_overrides();

    init_tracing(&config.log_filter);
    let formatter = config.date_formatter()?;

    let tweet = fs::read_to_string(&args.tweet)
        .with_context(|| format!("Failed to read {}", args.tweet.display()))?;
    let tweet: api::Tweet = serde_json::from_str(&tweet)
        .with_context(|| format!("Failed to parse {}", args.tweet.display()))?;
    debug!(tweet_id = ?tweet.id, retweet = tweet.is_retweet(), "Loaded tweet");

    let now = args.now.unwrap_or_else(Utc::now);
    let plan = display::resolve(&tweet, args.mode.into(), now, &formatter);

    // NB: not a terminal when piped
    let (cols, _rows) = terminal::size().unwrap_or((80, 24));
    preview::render_plan(&mut stdout(), &plan, cols as usize)?;

    Ok(())
}
