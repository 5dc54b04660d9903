#![forbid(unsafe_code)]

//! Runtime: configuration, tracker registry and consumer dispatch for
//! `reorder-core`.
//!
//! # Primary responsibilities
//! - **ReorderConfig**: per-list settings loaded from TOML/JSON and validated
//!   before any tracker exists.
//! - **TrackerRegistry**: one tracker per list id, with teardown-on-replace.
//! - **ReorderHost**: routes gesture notifications and delivers emitted
//!   changes to listeners, a persister or a named callback.
//! - **SequenceUpdate**: the colon-joined wire payload sent downstream.
//! - **Trace replay**: JSONL gesture traces for deterministic debugging.
//! - **Logging**: `tracing-subscriber` setup for binaries.

pub mod config;
pub mod host;
pub mod logging;
pub mod registry;
pub mod trace;
pub mod update;

pub use config::{ConfigError, GestureOptions, ReorderAction, ReorderConfig};
pub use host::{
    HostEvent, HostListener, MemoryPersister, PersistError, PersistRequest, Persister,
    ReorderHost,
};
pub use registry::{ListEntry, SetupError, TrackerRegistry};
pub use trace::{ReplayError, ReplayedChange, TraceRecord, read_trace, read_trace_file, replay};
pub use update::{SEQUENCE_SEPARATOR, SequenceUpdate};

pub use reorder_core::{
    GestureNotification, GestureStop, ItemId, Order, ReorderMode, ReorderTracker,
    SequenceChanged,
};
