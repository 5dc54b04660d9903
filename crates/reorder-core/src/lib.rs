#![forbid(unsafe_code)]

//! Core: drag-and-drop reorder tracking.
//!
//! # Role
//! `reorder-core` owns the only non-trivial logic of a drag-and-drop list:
//! deciding whether a completed gesture actually changed the list's order and,
//! if it did, describing that change unambiguously.
//!
//! # Primary responsibilities
//! - **Order**: the authoritative, duplicate-free sequence of item ids.
//! - **Sort resolver**: single remove-then-insert moves reported by position.
//! - **Swap resolver**: reconstruction of the final order from a stream of
//!   pairwise-exchange notifications.
//! - **ReorderTracker**: the per-list shell that consumes gesture notifications
//!   and emits at most one [`SequenceChanged`] per gesture.
//!
//! # How it fits
//! The gesture engine, DOM feedback and persistence all live outside this
//! crate. `reorder-runtime` wires trackers to configuration, consumers and
//! logging.

pub mod event;
pub mod item;
pub mod sort;
pub mod swap;
pub mod tracker;

pub use event::{GestureNotification, GestureStop, ReorderMode, SequenceChanged, UnknownMode};
pub use item::{ItemId, Order, OrderError};
pub use tracker::ReorderTracker;
