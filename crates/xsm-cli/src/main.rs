/// XSM command-line tool — encode, decode, inspect, and validate
/// structured messages, and compute transfer CRC64s.
///
/// # Command overview
///
/// ```text
/// xsm <COMMAND> [OPTIONS]
///
/// Commands:
///   encode     Wrap a file for upload and print the transport headers
///   decode     Validate a structured message and write its payload
///   inspect    Print the layout of a structured message
///   validate   Check a structured message for corruption
///   checksum   Print the CRC64 of a file
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Enable debug logging on stderr
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                       |
/// |------|-----------------------------------------------|
/// | 0    | Success                                       |
/// | 1    | Error (I/O failure, corrupt or malformed file) |
///
/// Logging honours `RUST_LOG`; without it the level is `warn`, or `debug`
/// with `--verbose`. Logs and errors go to stderr so stdout can be piped.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use xsm_transfer::TransferValidation;
use xsm_transfer::config::DEFAULT_MAX_BUFFERED_LEN;

mod cmd_checksum;
mod cmd_decode;
mod cmd_encode;
mod cmd_inspect;
mod cmd_validate;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// The XSM structured-message command-line tool.
#[derive(Parser)]
#[command(name = "xsm", version, about = "Structured message transfer-integrity tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Wrap a file for upload and print the transport headers.
    Encode(EncodeArgs),
    /// Validate a structured message and write its payload.
    Decode(DecodeArgs),
    /// Print the layout of a structured message.
    Inspect(InspectArgs),
    /// Check a structured message for corruption.
    Validate(ValidateArgs),
    /// Print the CRC64 of a file.
    Checksum(ChecksumArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Validation strategy selectable from the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Strategy {
    /// Frame the file as a structured message.
    Structured,
    /// Send the file unchanged with a whole-body CRC64 header.
    Crc64,
}

impl Strategy {
    pub fn validation(self) -> TransferValidation {
        match self {
            Self::Structured => TransferValidation::StructuredMessage,
            Self::Crc64 => TransferValidation::ComputeCrc64,
        }
    }
}

/// Arguments for `xsm encode`.
///
/// ```text
/// ┌──────────────┬──────────────────────────────────────────────────┐
/// │ Flag         │ Effect                                           │
/// ├──────────────┼──────────────────────────────────────────────────┤
/// │ --strategy   │ structured (default) | crc64                     │
/// │ --max-size   │ refuse inputs larger than this many bytes        │
/// │ -o/--output  │ where to write the body that would be sent       │
/// └──────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct EncodeArgs {
    /// File to encode.
    pub input: PathBuf,

    /// Output file for the body that would be sent.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Validation strategy.
    #[arg(long, value_enum, default_value_t = Strategy::Structured)]
    pub strategy: Strategy,

    /// Largest input, in bytes, that may be buffered.
    #[arg(long, default_value_t = DEFAULT_MAX_BUFFERED_LEN)]
    pub max_size: usize,
}

/// Arguments for `xsm decode`.
///
/// `--content-length` is the original payload size the sender reported.
/// Without it the length inside the message is trusted, which skips the
/// truncation guard.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Structured message to decode.
    pub input: PathBuf,

    /// Write the payload to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Expected payload length, as sent by the producer.
    #[arg(long)]
    pub content_length: Option<u64>,

    /// Largest message, in bytes, that may be buffered.
    #[arg(long, default_value_t = DEFAULT_MAX_BUFFERED_LEN)]
    pub max_size: usize,
}

/// Arguments for `xsm inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Structured message to inspect.
    pub input: PathBuf,

    /// Emit the layout as JSON.
    #[arg(long)]
    pub json: bool,

    /// Include a hex dump of each segment's data (first 64 bytes).
    #[arg(long)]
    pub show_hex: bool,
}

/// Arguments for `xsm validate`.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Structured message to validate.
    pub input: PathBuf,

    /// Expected payload length, as sent by the producer.
    #[arg(long)]
    pub content_length: Option<u64>,
}

/// Arguments for `xsm checksum`.
#[derive(clap::Args)]
pub struct ChecksumArgs {
    /// Files to checksum.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Encode(args) => cmd_encode::run(&args),
        Commands::Decode(args) => cmd_decode::run(&args),
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Checksum(args) => cmd_checksum::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
