//! `eio`: encode and inspect single engine transport frames.
//!
//! # Usage
//!
//! ```text
//! eio [--config <PATH>] [--max-body-size <N>] <COMMAND>
//!
//! Commands:
//!   encode --kind <KIND> [--body <TEXT> | --body-file <PATH>] [--output <PATH>]
//!   decode [--input <PATH>] [--json]
//!   config init [--force]
//! ```
//!
//! `KIND` is a kind name (`open`, `ping`, `MESSAGE`, ...) or its identifier
//! digit (`0`..`6`).  Frames go to stdout and come from stdin unless a path
//! is given; logs always go to stderr.
//!
//! # Environment variable overrides
//!
//! | Variable            | Description                                  |
//! |---------------------|----------------------------------------------|
//! | `EIO_CONFIG`        | Path of the TOML config file                 |
//! | `EIO_MAX_BODY_SIZE` | Reject decoded bodies longer than this       |
//! | `RUST_LOG`          | Log filter; overrides `log_level` in config  |

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use eio_cli::commands::{self, BodyFormat};
use eio_cli::config::{init_config, load_config, CliConfig};
use eio_core::{FrameLimits, PacketKind};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Encode and inspect engine transport frames.
#[derive(Debug, Parser)]
#[command(name = "eio", about = "Encode and inspect engine transport frames", version)]
struct Cli {
    /// TOML config file.  A missing file means built-in defaults.
    #[arg(long, global = true, env = "EIO_CONFIG")]
    config: Option<PathBuf>,

    /// Largest body `decode` accepts, in bytes.  Overrides the config file.
    #[arg(long, global = true, env = "EIO_MAX_BODY_SIZE")]
    max_body_size: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write one frame to stdout or a file.
    Encode {
        /// Packet kind: name (case-insensitive) or identifier digit.
        #[arg(long)]
        kind: PacketKind,

        /// Body text.
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,

        /// Read the body bytes from this file.
        #[arg(long)]
        body_file: Option<PathBuf>,

        /// Write the frame here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Read one frame from stdin or a file and print it.
    Decode {
        /// Read the frame from this file instead of stdin.
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Pretty-print the body as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage the config file named by `--config`.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Write a config file holding the defaults.
    Init {
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Loads the config file, or defaults when no path was given.
    fn load_config(&self) -> anyhow::Result<CliConfig> {
        match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config from '{}'", path.display())),
            None => Ok(CliConfig::default()),
        }
    }

    /// Frame limits after applying `--max-body-size` over the config file.
    fn frame_limits(&self, config: &CliConfig) -> FrameLimits {
        self.max_body_size
            .map(FrameLimits::with_max_body_size)
            .unwrap_or(config.limits)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // `config init` must work even when the existing file does not parse.
    let config = match cli.command {
        Command::Config { .. } => CliConfig::default(),
        _ => cli.load_config()?,
    };

    // `RUST_LOG` wins; otherwise the configured level applies.
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => config_filter(&config.log_level)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let limits = cli.frame_limits(&config);
    debug!(?limits, config = ?cli.config, "starting");

    match cli.command {
        Command::Encode {
            kind,
            body,
            body_file,
            output,
        } => run_encode(kind, body, body_file, output),
        Command::Decode { input, json } => run_decode(input, json, &limits),
        Command::Config {
            action: ConfigAction::Init { force },
        } => run_config_init(cli.config, force),
    }
}

/// Parses the configured `log_level` into a filter.
fn config_filter(log_level: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(log_level)
        .with_context(|| format!("invalid log_level '{log_level}' in config"))
}

fn run_config_init(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.context("no config path given; pass --config or set EIO_CONFIG")?;
    init_config(&path, force)
        .with_context(|| format!("failed to initialise config at '{}'", path.display()))?;
    info!(path = %path.display(), "wrote default config");
    Ok(())
}

fn run_encode(
    kind: PacketKind,
    body: Option<String>,
    body_file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let body = match (body, body_file) {
        (Some(text), _) => text.into_bytes(),
        (None, Some(path)) => std::fs::read(&path)
            .with_context(|| format!("failed to read body from '{}'", path.display()))?,
        (None, None) => Vec::new(),
    };

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            commands::encode(kind, body, &mut BufWriter::new(file))
                .with_context(|| format!("failed to write frame to '{}'", path.display()))?;
        }
        None => {
            commands::encode(kind, body, &mut io::stdout().lock())
                .context("failed to write frame to stdout")?;
        }
    }
    Ok(())
}

fn run_decode(input: Option<PathBuf>, json: bool, limits: &FrameLimits) -> anyhow::Result<()> {
    let mut source: Box<dyn Read> = match &input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    let outcome = commands::decode(&mut source, limits).context("failed to decode frame")?;

    let format = if json { BodyFormat::Json } else { BodyFormat::Text };
    let mut out = io::stdout().lock();
    commands::render(&outcome, format, &mut out).context("failed to print frame")?;
    out.flush()?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
