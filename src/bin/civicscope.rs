//! CLI binary for civicscope.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `LookupConfig`, runs one query and prints its JSON payload.

use anyhow::{Context, Result};
use civicscope::{
    representative_query, respond, vote_query, CivicError, LookupConfig, OverrideTable,
    VoteRequest,
};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Representatives for a postal code
  civicscope reps "T5J 2R7"

  # Latest recorded divisions for an MLA
  civicscope votes --name "Rachel Notley"

  # Disambiguate members sharing a surname
  civicscope votes --name "Jane Smith" --riding "Calgary-Centre"

  # Single-line JSON for piping
  civicscope --compact reps K1A0A6 | jq .federal

ENVIRONMENT VARIABLES:
  CIVICSCOPE_PDFIUM_LIB       Path to libpdfium (file or directory)
  CIVICSCOPE_REPRESENT_URL    Represent API base URL
  CIVICSCOPE_GEOCODER_URL     Geocoder endpoint
  CIVICSCOPE_RECORDS_URL      Votes & Proceedings index page
  CIVICSCOPE_OVERRIDES        Replacement override table (JSON)
  RUST_LOG                    tracing filter, overrides --verbose/--quiet
"#;

/// Canadian representative and legislative-vote lookups.
#[derive(Parser, Debug)]
#[command(
    name = "civicscope",
    version,
    about = "Canadian representative and legislative-vote lookups",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, env = "CIVICSCOPE_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Path to a libpdfium shared library or the directory holding it.
    #[arg(long, global = true, env = "CIVICSCOPE_PDFIUM_LIB")]
    pdfium_lib: Option<PathBuf>,

    /// JSON file replacing the built-in override table.
    #[arg(long, global = true, env = "CIVICSCOPE_OVERRIDES")]
    overrides: Option<PathBuf>,

    /// Represent API base URL.
    #[arg(long, global = true, env = "CIVICSCOPE_REPRESENT_URL")]
    represent_url: Option<String>,

    /// Geocoder endpoint queried with `?q=<postal>`.
    #[arg(long, global = true, env = "CIVICSCOPE_GEOCODER_URL")]
    geocoder_url: Option<String>,

    /// Votes & Proceedings index page.
    #[arg(long, global = true, env = "CIVICSCOPE_RECORDS_URL")]
    records_index_url: Option<String>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "CIVICSCOPE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the result.
    #[arg(short, long, global = true, env = "CIVICSCOPE_QUIET")]
    quiet: bool,

    /// Disable the spinner.
    #[arg(long, global = true, env = "CIVICSCOPE_NO_PROGRESS")]
    no_progress: bool,

    /// Print single-line JSON.
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recorded divisions for a member in the latest Votes & Proceedings.
    Votes {
        /// Member's full name; the surname is what gets matched.
        #[arg(long)]
        name: String,

        /// Riding, for members sharing a surname.
        #[arg(long)]
        riding: Option<String>,

        /// Most recent records to keep.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Municipal, provincial and federal representatives for a postal code.
    Reps {
        /// Postal code, with or without the space.
        postal: String,
    },
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn build_config(cli: &Cli) -> Result<LookupConfig, CivicError> {
    let mut builder = LookupConfig::builder().request_timeout_secs(cli.timeout);

    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(path);
    }
    if let Some(ref path) = cli.overrides {
        builder = builder.overrides(OverrideTable::from_path(path)?);
    }
    if let Some(ref url) = cli.represent_url {
        builder = builder.represent_base_url(url);
    }
    if let Some(ref url) = cli.geocoder_url {
        builder = builder.geocoder_url(url);
    }
    if let Some(ref url) = cli.records_index_url {
        builder = builder.records_index_url(url);
    }
    if let Command::Votes { limit, .. } = cli.command {
        builder = builder.max_vote_items(limit);
    }

    builder.build()
}

/// Build the config and run the selected query. Every failure, config
/// errors included, comes back as an error payload.
async fn run(cli: &Cli) -> Value {
    let config = match build_config(cli) {
        Ok(config) => config,
        Err(e) => return respond::<()>(Err(e)),
    };

    match &cli.command {
        Command::Votes { name, riding, .. } => {
            let request = VoteRequest {
                name: name.clone(),
                riding: riding.clone(),
            };
            respond(vote_query(&request, &config).await)
        }
        Command::Reps { postal } => respond(representative_query(postal, &config).await),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Run query ────────────────────────────────────────────────────────
    let bar = show_progress.then(|| match &cli.command {
        Command::Votes { name, .. } => spinner(&format!("Reading votes for {name}…")),
        Command::Reps { postal } => spinner(&format!("Looking up {postal}…")),
    });

    let body = run(&cli).await;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    // ── Print ────────────────────────────────────────────────────────────
    let rendered = if cli.compact {
        serde_json::to_string(&body)
    } else {
        serde_json::to_string_pretty(&body)
    }
    .context("Failed to serialize result")?;
    println!("{rendered}");

    let failed = body.get("error").is_some() && body.get("status").is_some();
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
