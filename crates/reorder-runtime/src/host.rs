#![forbid(unsafe_code)]

//! Host: routes gesture notifications to trackers and delivers emitted
//! changes to consumers.
//!
//! For every effective gesture the host:
//!
//! 1. broadcasts [`HostEvent::SequenceUpdate`] to all listeners, then
//! 2. performs the list's configured [`ReorderAction`]:
//!    - `event`: nothing further;
//!    - `persist`: builds a [`PersistRequest`] and hands it to the
//!      [`Persister`], broadcasting [`HostEvent::UpdateComplete`] or
//!      [`HostEvent::PersistFailed`];
//!    - `callback`: invokes the named callback, or broadcasts
//!      [`HostEvent::CallbackMissing`] if none is registered.
//!
//! Nothing is retried. A failed persist leaves the tracker's order updated;
//! surfacing the failure is up to listeners.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use reorder_core::{GestureNotification, ItemId, SequenceChanged};
use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;

use crate::config::{ReorderAction, ReorderConfig};
use crate::registry::{ListEntry, SetupError, TrackerRegistry};
use crate::update::SequenceUpdate;

// ---------------------------------------------------------------------------
// Consumer-facing types
// ---------------------------------------------------------------------------

/// Notifications broadcast to [`HostListener`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A list's order changed.
    SequenceUpdate {
        list_id: String,
        change: SequenceChanged,
    },
    /// The persistence endpoint accepted the change.
    UpdateComplete {
        list_id: String,
        update: SequenceUpdate,
    },
    /// The persistence endpoint rejected the change or none is configured.
    PersistFailed {
        list_id: String,
        update: SequenceUpdate,
        error: String,
    },
    /// The list's configured callback is not registered.
    CallbackMissing { list_id: String, callback: String },
}

impl HostEvent {
    #[must_use]
    pub fn list_id(&self) -> &str {
        match self {
            Self::SequenceUpdate { list_id, .. }
            | Self::UpdateComplete { list_id, .. }
            | Self::PersistFailed { list_id, .. }
            | Self::CallbackMissing { list_id, .. } => list_id,
        }
    }
}

pub trait HostListener {
    fn on_event(&mut self, event: &HostEvent);
}

impl<F> HostListener for F
where
    F: FnMut(&HostEvent),
{
    fn on_event(&mut self, event: &HostEvent) {
        self(event);
    }
}

/// Request handed to a [`Persister`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistRequest {
    pub list_id: String,
    pub endpoint: String,
    /// JSON-encoded [`SequenceUpdate`].
    pub payload: String,
    /// Page items to submit alongside the payload.
    pub page_items: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no persister configured")]
    Unavailable,
    #[error("failed to encode sequence update: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("persist request rejected: {0}")]
    Rejected(String),
}

/// Delivers a change to durable storage. Called synchronously, once per change.
pub trait Persister {
    /// # Errors
    ///
    /// Returns [`PersistError`] if the change could not be stored.
    fn persist(&mut self, request: &PersistRequest) -> Result<(), PersistError>;
}

/// Callback invoked for lists configured with [`ReorderAction::Callback`].
///
/// Receives the change with its sequences as id arrays; only the persist
/// payload joins them.
pub type Callback = Box<dyn FnMut(&SequenceChanged) + Send>;

// ---------------------------------------------------------------------------
// ReorderHost
// ---------------------------------------------------------------------------

/// Owns the tracker registry and its consumers.
#[derive(Default)]
pub struct ReorderHost {
    registry: TrackerRegistry,
    listeners: Vec<Box<dyn HostListener + Send>>,
    persister: Option<Box<dyn Persister + Send>>,
    callbacks: FxHashMap<String, Callback>,
}

impl fmt::Debug for ReorderHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReorderHost")
            .field("registry", &self.registry)
            .field("listeners", &self.listeners.len())
            .field("persister", &self.persister.is_some())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl ReorderHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_persister(mut self, persister: impl Persister + Send + 'static) -> Self {
        self.persister = Some(Box::new(persister));
        self
    }

    pub fn add_listener(&mut self, listener: impl HostListener + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Register `callback` under `name`, replacing any previous one.
    pub fn register_callback(
        &mut self,
        name: impl Into<String>,
        callback: impl FnMut(&SequenceChanged) + Send + 'static,
    ) {
        self.callbacks.insert(name.into(), Box::new(callback));
    }

    #[must_use]
    pub const fn registry(&self) -> &TrackerRegistry {
        &self.registry
    }

    /// Set up (or replace) the tracker for `config.list_id`.
    ///
    /// # Errors
    ///
    /// See [`TrackerRegistry::setup`].
    pub fn setup(
        &mut self,
        config: ReorderConfig,
        initial: Vec<ItemId>,
    ) -> Result<&mut ListEntry, SetupError> {
        self.registry.setup(config, initial)
    }

    pub fn teardown(&mut self, list_id: &str) -> Option<ListEntry> {
        self.registry.teardown(list_id)
    }

    /// Route `notification` to `list_id` and deliver any resulting change.
    pub fn notify(
        &mut self,
        list_id: &str,
        notification: &GestureNotification,
    ) -> Option<SequenceChanged> {
        let change = self.registry.dispatch(list_id, notification)?;
        let Some(entry) = self.registry.get(list_id) else {
            return Some(change);
        };
        let config = entry.config.clone();

        self.broadcast(&HostEvent::SequenceUpdate {
            list_id: list_id.to_owned(),
            change: change.clone(),
        });

        match config.action {
            ReorderAction::Event => {}
            ReorderAction::Persist => self.persist(&config, SequenceUpdate::from_change(&change)),
            ReorderAction::Callback => self.invoke_callback(&config, &change),
        }
        Some(change)
    }

    fn persist(&mut self, config: &ReorderConfig, update: SequenceUpdate) {
        let list_id = config.list_id.clone();
        let result = match self.persister.as_mut() {
            None => Err(PersistError::Unavailable),
            Some(persister) => update.to_json().map_err(PersistError::from).and_then(|payload| {
                let request = PersistRequest {
                    list_id: list_id.clone(),
                    endpoint: config.persist_endpoint.clone().unwrap_or_default(),
                    payload,
                    page_items: config.items_to_submit.clone(),
                };
                persister.persist(&request)
            }),
        };

        let event = match result {
            Ok(()) => {
                tracing::debug!(message = "host.persisted", list_id = %list_id);
                HostEvent::UpdateComplete { list_id, update }
            }
            Err(err) => {
                tracing::error!(message = "host.persist_failed", list_id = %list_id, error = %err);
                HostEvent::PersistFailed {
                    list_id,
                    update,
                    error: err.to_string(),
                }
            }
        };
        self.broadcast(&event);
    }

    fn invoke_callback(&mut self, config: &ReorderConfig, change: &SequenceChanged) {
        let name = config.callback.clone().unwrap_or_default();
        match self.callbacks.get_mut(&name) {
            Some(callback) => callback(change),
            None => {
                tracing::warn!(
                    message = "host.callback_missing",
                    list_id = %config.list_id,
                    callback = %name
                );
                self.broadcast(&HostEvent::CallbackMissing {
                    list_id: config.list_id.clone(),
                    callback: name,
                });
            }
        }
    }

    fn broadcast(&mut self, event: &HostEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory persister
// ---------------------------------------------------------------------------

/// Persister that records every request in memory.
///
/// Used by the replay tool and tests; optionally rejects every request.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersister {
    requests: Arc<Mutex<Vec<PersistRequest>>>,
    reject_with: Option<String>,
}

impl MemoryPersister {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A persister that rejects every request with `reason`.
    #[must_use]
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            reject_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Requests received so far, including rejected ones.
    #[must_use]
    pub fn requests(&self) -> Vec<PersistRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Persister for MemoryPersister {
    fn persist(&mut self, request: &PersistRequest) -> Result<(), PersistError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        match &self.reject_with {
            Some(reason) => Err(PersistError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }
}
