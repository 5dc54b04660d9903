#![forbid(unsafe_code)]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use reorder_runtime::logging::{self, LogFormat};
use reorder_runtime::{MemoryPersister, ReorderHost, SequenceUpdate, read_trace_file, replay};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per change.
    #[default]
    Json,
    /// One human-readable line per change.
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormatArg {
    #[default]
    Human,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Human => Self::Human,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "reorder-replay",
    about = "Replay a drag-and-drop gesture trace and print the resulting sequence updates",
    version
)]
pub struct Cli {
    /// JSONL gesture trace.
    pub trace: PathBuf,

    /// Output format for emitted changes.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Log output format (filter with RUST_LOG).
    #[arg(long, value_enum, default_value_t = LogFormatArg::Human)]
    pub log_format: LogFormatArg,

    /// Make the in-memory persister reject every request with this reason.
    #[arg(long, value_name = "REASON")]
    pub reject_persist: Option<String>,

    /// Print fatal errors as a JSON object on stderr.
    #[arg(long)]
    pub json_errors: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format.into())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}

/// Replay `cli.trace`, writing one line per emitted change to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let records = read_trace_file(&cli.trace)?;
    let persister = match &cli.reject_persist {
        Some(reason) => MemoryPersister::rejecting(reason.clone()),
        None => MemoryPersister::new(),
    };
    let mut host = ReorderHost::new().with_persister(persister.clone());
    let changes = replay(&records, &mut host)?;

    for replayed in &changes {
        let update = SequenceUpdate::from_change(&replayed.change);
        match cli.format {
            OutputFormat::Json => {
                let line = serde_json::json!({
                    "record": replayed.record,
                    "list_id": replayed.list_id,
                    "update": update,
                });
                writeln!(out, "{}", serde_json::to_string(&line)?)?;
            }
            OutputFormat::Text => {
                writeln!(
                    out,
                    "#{} {}: {}",
                    replayed.record,
                    replayed.list_id,
                    update.summary()
                )?;
            }
        }
    }

    tracing::info!(
        message = "replay.done",
        changes = changes.len(),
        persisted = persister.requests().len()
    );
    Ok(())
}
