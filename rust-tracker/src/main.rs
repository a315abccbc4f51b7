//! mailtrack - command-line front end for the tracking pipeline.
//!
//! Reads an HTML body (or a raw `.eml` message) from a file or stdin and
//! writes the tracked body to a file or stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Full pipeline: links, unsubscribe footer, open pixel
//! mailtrack process --input body.html --campaign-id spring --recipient-id r42 \
//!     --base-url https://t.example.com
//!
//! # List the hrefs the rewriter sees
//! mailtrack links --input message.eml --eml
//!
//! # Check a rewritten body
//! mailtrack report --input tracked.html --base-url https://t.example.com
//!
//! # JSON-lines jobs in, JSON-lines results out
//! mailtrack batch --input jobs.jsonl --output tracked.jsonl
//! ```
//!
//! # Environment Variables
//!
//! - `TRACKING_BASE_URL`, `TRACKING_CAMPAIGN_ID`, `TRACKING_RECIPIENT_ID`: defaults for the flags
//! - `TRACKING_UNSUBSCRIBE_FOOTER`: inject the footer (default `true`)
//! - `LOG_FORMAT`: `json` (default) or `pretty`
//! - `RUST_LOG`: log filter (default `info`)

use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mailtrack::config::{is_absolute_http_url, LogFormat};
use mailtrack::{
    extract_links, inspect, parse_raw_email, process_complete_email, process_email_for_tracking,
    Config, JobDefaults, TrackingConfig,
};

/// Inject open, click and unsubscribe tracking into HTML email bodies.
#[derive(Parser)]
#[command(name = "mailtrack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite one email body
    Process {
        #[command(flatten)]
        files: IoArgs,

        #[command(flatten)]
        ids: IdArgs,

        /// Treat the input as a raw RFC 5322 message
        #[arg(long)]
        eml: bool,

        /// Skip the unsubscribe footer
        #[arg(long)]
        no_unsubscribe: bool,
    },

    /// Print every href in document order
    Links {
        #[command(flatten)]
        files: IoArgs,

        /// Treat the input as a raw RFC 5322 message
        #[arg(long)]
        eml: bool,
    },

    /// Print a JSON report of the tracking found in a body
    Report {
        #[command(flatten)]
        files: IoArgs,

        /// Tracking receiver base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Process JSON-lines tracking jobs
    Batch {
        #[command(flatten)]
        files: IoArgs,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input file (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct IdArgs {
    /// Campaign identifier
    #[arg(long)]
    campaign_id: Option<String>,

    /// Recipient identifier
    #[arg(long)]
    recipient_id: Option<String>,

    /// Tracking receiver base URL
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    init_logging(config.log_format);

    info!(
        base_url_set = config.base_url.is_some(),
        unsubscribe_footer = config.unsubscribe_footer,
        "config_loaded"
    );

    match cli.command {
        Commands::Process {
            files,
            ids,
            eml,
            no_unsubscribe,
        } => run_process(&config, &files, ids, eml, no_unsubscribe),
        Commands::Links { files, eml } => run_links(&files, eml),
        Commands::Report { files, base_url } => run_report(&config, &files, base_url),
        Commands::Batch { files } => run_batch(&config, &files),
    }
}

/// Initialize structured logging on stderr, keeping stdout for output.
fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = (format == LogFormat::Json)
        .then(|| fmt::layer().json().flatten_event(true).with_writer(io::stderr));
    let pretty =
        (format == LogFormat::Pretty).then(|| fmt::layer().pretty().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(io::BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Read the HTML body, pulling it out of a raw message when `eml` is set.
fn read_html(path: Option<&Path>, eml: bool) -> Result<String> {
    let raw = read_input(path)?;
    if !eml {
        return Ok(raw);
    }

    let parsed = parse_raw_email(&raw)?;
    info!(
        message_id = ?parsed.message_id,
        subject = ?parsed.subject,
        "eml_input_parsed"
    );

    match parsed.html {
        Some(html) => Ok(html),
        None => bail!("Email has no HTML body"),
    }
}

fn warn_if_not_absolute(base_url: &str) {
    if !base_url.is_empty() && !is_absolute_http_url(base_url) {
        warn!(base_url, "base_url_not_absolute");
    }
}

fn run_process(
    config: &Config,
    files: &IoArgs,
    ids: IdArgs,
    eml: bool,
    no_unsubscribe: bool,
) -> Result<()> {
    let tracking = TrackingConfig::new(
        ids.campaign_id.or_else(|| config.campaign_id.clone()).unwrap_or_default(),
        ids.recipient_id.or_else(|| config.recipient_id.clone()).unwrap_or_default(),
        ids.base_url.or_else(|| config.base_url.clone()).unwrap_or_default(),
    );
    tracking.validate().context("Invalid tracking config")?;
    warn_if_not_absolute(&tracking.base_url);

    let html = read_html(files.input.as_deref(), eml)?;
    let footer = config.unsubscribe_footer && !no_unsubscribe;

    let tracked = if footer {
        process_complete_email(&html, &tracking)
    } else {
        process_email_for_tracking(&html, &tracking)
    };

    let mut out = open_output(files.output.as_deref())?;
    out.write_all(tracked.as_bytes()).context("Failed to write output")?;
    out.flush().context("Failed to write output")?;

    info!(
        campaign_id = %tracking.campaign_id,
        input_length = html.len(),
        output_length = tracked.len(),
        footer,
        "email_processed"
    );

    Ok(())
}

fn run_links(files: &IoArgs, eml: bool) -> Result<()> {
    let html = read_html(files.input.as_deref(), eml)?;
    let links = extract_links(&html);

    let mut out = open_output(files.output.as_deref())?;
    for link in &links {
        writeln!(out, "{link}").context("Failed to write output")?;
    }
    out.flush().context("Failed to write output")?;

    info!(count = links.len(), "links_listed");
    Ok(())
}

fn run_report(config: &Config, files: &IoArgs, base_url: Option<String>) -> Result<()> {
    let Some(base_url) = base_url.or_else(|| config.base_url.clone()) else {
        bail!("A base URL is required (--base-url or TRACKING_BASE_URL)");
    };
    warn_if_not_absolute(&base_url);

    let tracking = TrackingConfig::new(
        config.campaign_id.clone().unwrap_or_default(),
        config.recipient_id.clone().unwrap_or_default(),
        base_url,
    );

    let html = read_input(files.input.as_deref())?;
    let report = inspect(&html, &tracking);

    let mut out = open_output(files.output.as_deref())?;
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    writeln!(out, "{json}").context("Failed to write output")?;
    out.flush().context("Failed to write output")?;

    Ok(())
}

fn run_batch(config: &Config, files: &IoArgs) -> Result<()> {
    let defaults = JobDefaults {
        base_url: config.base_url.clone(),
        unsubscribe_footer: config.unsubscribe_footer,
    };

    let reader: Box<dyn BufRead> = match files.input.as_deref() {
        Some(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let out = open_output(files.output.as_deref())?;

    mailtrack::run_batch(reader, out, &defaults)?;
    Ok(())
}
