#![forbid(unsafe_code)]

//! Gesture trace replay for deterministic debugging.
//!
//! A trace is JSONL: one [`TraceRecord`] per line, tagged by `event`.
//!
//! ```text
//! {"event":"setup","config":{"list_id":"tasks","mode":"swap"},"order":["a","b","c"]}
//! {"event":"start","list_id":"tasks","dragged":"a"}
//! {"event":"swapped","list_id":"tasks","swapped":"b"}
//! {"event":"stop","list_id":"tasks"}
//! {"event":"teardown","list_id":"tasks"}
//! ```
//!
//! Blank lines are skipped. [`replay`] feeds records through a
//! [`ReorderHost`] in order and collects every emitted change.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use reorder_core::{GestureNotification, GestureStop, ItemId, SequenceChanged};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ReorderConfig;
use crate::host::ReorderHost;
use crate::registry::SetupError;

/// A single line of a gesture trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceRecord {
    Setup {
        config: ReorderConfig,
        order: Vec<ItemId>,
    },
    Start {
        list_id: String,
        dragged: ItemId,
    },
    Swapped {
        list_id: String,
        swapped: ItemId,
    },
    Stop {
        list_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        old_index: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_index: Option<usize>,
    },
    Teardown {
        list_id: String,
    },
}

impl TraceRecord {
    /// Gesture notification carried by this record, with its list id.
    #[must_use]
    pub fn notification(&self) -> Option<(&str, GestureNotification)> {
        match self {
            Self::Start { list_id, dragged } => Some((
                list_id,
                GestureNotification::Start {
                    dragged: dragged.clone(),
                },
            )),
            Self::Swapped { list_id, swapped } => Some((
                list_id,
                GestureNotification::Swapped {
                    swapped: swapped.clone(),
                },
            )),
            Self::Stop {
                list_id,
                old_index,
                new_index,
            } => Some((
                list_id,
                GestureNotification::Stop(GestureStop {
                    old_index: *old_index,
                    new_index: *new_index,
                }),
            )),
            Self::Setup { .. } | Self::Teardown { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),
    #[error("trace line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("trace record {record}: setup refused: {source}")]
    Setup {
        record: usize,
        #[source]
        source: SetupError,
    },
}

pub type Result<T> = std::result::Result<T, ReplayError>;

/// A change emitted during replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayedChange {
    /// Zero-based index of the record that produced the change.
    pub record: usize,
    pub list_id: String,
    pub change: SequenceChanged,
}

/// Parse a JSONL trace.
///
/// # Errors
///
/// Returns [`ReplayError::Parse`] with the 1-based line number of the first
/// malformed record.
pub fn read_trace<R: BufRead>(reader: R) -> Result<Vec<TraceRecord>> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| ReplayError::Parse {
            line: i + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Parse a JSONL trace file.
///
/// # Errors
///
/// See [`read_trace`].
pub fn read_trace_file(path: impl AsRef<Path>) -> Result<Vec<TraceRecord>> {
    let file = File::open(path.as_ref())?;
    read_trace(BufReader::new(file))
}

/// Feed `records` through `host`, returning every emitted change in order.
///
/// # Errors
///
/// Stops at the first setup record the host refuses.
pub fn replay(records: &[TraceRecord], host: &mut ReorderHost) -> Result<Vec<ReplayedChange>> {
    let mut changes = Vec::new();
    for (record, entry) in records.iter().enumerate() {
        match entry {
            TraceRecord::Setup { config, order } => {
                host.setup(config.clone(), order.clone())
                    .map_err(|source| ReplayError::Setup { record, source })?;
            }
            TraceRecord::Teardown { list_id } => {
                host.teardown(list_id);
            }
            other => {
                let Some((list_id, notification)) = other.notification() else {
                    continue;
                };
                if let Some(change) = host.notify(list_id, &notification) {
                    changes.push(ReplayedChange {
                        record,
                        list_id: list_id.to_owned(),
                        change,
                    });
                }
            }
        }
    }
    tracing::info!(
        message = "trace.replayed",
        records = records.len(),
        changes = changes.len()
    );
    Ok(changes)
}
