#![forbid(unsafe_code)]

//! Replay tool for drag-and-drop gesture traces.
//!
//! Reads a JSONL trace (see `reorder_runtime::trace`), feeds it through a
//! host with an in-memory persister, and prints one line per emitted change.

pub mod cli;
pub mod error;

pub use cli::{Cli, OutputFormat, run, run_from_env};
pub use error::{ReplayCliError, Result};
