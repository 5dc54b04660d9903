#![forbid(unsafe_code)]

//! Registry of reorder trackers keyed by list id.
//!
//! Setting up a list that already has a tracker tears the old one down
//! (via [`ReorderTracker::destroy`]) before the new one takes its place, so
//! re-initializing a list never leaves two trackers answering for it.

use reorder_core::{GestureNotification, ItemId, Order, OrderError, ReorderTracker, SequenceChanged};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::config::{ConfigError, ReorderConfig};

/// Setup refused: no tracker was created.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid initial order: {0}")]
    Order(#[from] OrderError),
}

/// A registered list: its configuration and tracker.
#[derive(Debug)]
pub struct ListEntry {
    pub config: ReorderConfig,
    pub tracker: ReorderTracker,
}

#[derive(Debug, Default)]
pub struct TrackerRegistry {
    lists: FxHashMap<String, ListEntry>,
}

impl TrackerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `config`, build a tracker over `initial`, and register it,
    /// replacing any tracker already registered for the same list.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the config is invalid or `initial` contains
    /// duplicate ids. The registry is left untouched in that case.
    pub fn setup(
        &mut self,
        config: ReorderConfig,
        initial: Vec<ItemId>,
    ) -> Result<&mut ListEntry, SetupError> {
        let config = config.validated()?;
        let order = Order::new(initial)?;
        let list_id = config.list_id.clone();
        let tracker = ReorderTracker::new(config.mode, order);

        if let Some(mut previous) = self.lists.remove(&list_id) {
            previous.tracker.destroy();
            tracing::info!(
                message = "registry.replace",
                list_id = %list_id,
                previous_mode = previous.config.mode.as_str(),
                mode = config.mode.as_str()
            );
        } else {
            tracing::info!(
                message = "registry.setup",
                list_id = %list_id,
                mode = config.mode.as_str(),
                items = tracker.order().len()
            );
        }

        Ok(self
            .lists
            .entry(list_id)
            .or_insert(ListEntry { config, tracker }))
    }

    /// Tear down and remove the tracker for `list_id`.
    pub fn teardown(&mut self, list_id: &str) -> Option<ListEntry> {
        let mut entry = self.lists.remove(list_id)?;
        entry.tracker.destroy();
        tracing::info!(message = "registry.teardown", list_id);
        Some(entry)
    }

    #[must_use]
    pub fn get(&self, list_id: &str) -> Option<&ListEntry> {
        self.lists.get(list_id)
    }

    pub fn get_mut(&mut self, list_id: &str) -> Option<&mut ListEntry> {
        self.lists.get_mut(list_id)
    }

    #[must_use]
    pub fn tracker(&self, list_id: &str) -> Option<&ReorderTracker> {
        self.lists.get(list_id).map(|entry| &entry.tracker)
    }

    #[must_use]
    pub fn contains(&self, list_id: &str) -> bool {
        self.lists.contains_key(list_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Registered list ids, sorted.
    #[must_use]
    pub fn list_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.lists.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Route a gesture notification to the tracker for `list_id`.
    ///
    /// Unknown lists are ignored.
    pub fn dispatch(
        &mut self,
        list_id: &str,
        notification: &GestureNotification,
    ) -> Option<SequenceChanged> {
        let Some(entry) = self.lists.get_mut(list_id) else {
            tracing::warn!(message = "registry.unknown_list", list_id);
            return None;
        };
        entry.tracker.handle(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reorder_core::{GestureStop, ReorderMode};

    fn ids(names: &[&str]) -> Vec<ItemId> {
        names.iter().map(|n| ItemId::from(*n)).collect()
    }

    fn start(name: &str) -> GestureNotification {
        GestureNotification::Start {
            dragged: name.into(),
        }
    }

    #[test]
    fn setup_registers_tracker() {
        let mut registry = TrackerRegistry::new();
        let entry = registry
            .setup(ReorderConfig::new("tasks", ReorderMode::Sort), ids(&["a", "b"]))
            .unwrap();
        assert_eq!(entry.tracker.order().len(), 2);
        assert!(registry.contains("tasks"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn invalid_config_creates_nothing() {
        let mut registry = TrackerRegistry::new();
        let err = registry
            .setup(ReorderConfig::default(), ids(&["a"]))
            .unwrap_err();
        assert!(matches!(err, SetupError::Config(ConfigError::Invalid(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicate_ids_create_nothing() {
        let mut registry = TrackerRegistry::new();
        registry
            .setup(ReorderConfig::new("tasks", ReorderMode::Sort), ids(&["a"]))
            .unwrap();
        let err = registry
            .setup(ReorderConfig::new("tasks", ReorderMode::Swap), ids(&["a", "a"]))
            .unwrap_err();
        assert!(matches!(err, SetupError::Order(_)));
        // The previous tracker survives a refused re-setup.
        assert_eq!(
            registry.tracker("tasks").map(ReorderTracker::mode),
            Some(ReorderMode::Sort)
        );
    }

    #[test]
    fn number_and_text_ids_with_same_display_are_refused() {
        let mut registry = TrackerRegistry::new();
        let err = registry
            .setup(
                ReorderConfig::new("tasks", ReorderMode::Sort),
                vec![ItemId::from(7), ItemId::from("7"), ItemId::from("x")],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SetupError::Order(reorder_core::OrderError::DuplicateId { index: 1, .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn re_setup_replaces_tracker() {
        let mut registry = TrackerRegistry::new();
        registry
            .setup(ReorderConfig::new("tasks", ReorderMode::Swap), ids(&["a", "b"]))
            .unwrap();
        registry.dispatch("tasks", &start("a"));
        assert!(registry.tracker("tasks").unwrap().is_dragging());

        registry
            .setup(ReorderConfig::new("tasks", ReorderMode::Sort), ids(&["x", "y", "z"]))
            .unwrap();
        let tracker = registry.tracker("tasks").unwrap();
        assert_eq!(tracker.mode(), ReorderMode::Sort);
        assert!(!tracker.is_dragging());
        assert!(!tracker.is_destroyed());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn teardown_destroys_tracker() {
        let mut registry = TrackerRegistry::new();
        registry
            .setup(ReorderConfig::new("tasks", ReorderMode::Sort), ids(&["a", "b"]))
            .unwrap();
        let entry = registry.teardown("tasks").unwrap();
        assert!(entry.tracker.is_destroyed());
        assert!(registry.teardown("tasks").is_none());
        assert!(
            registry
                .dispatch("tasks", &GestureNotification::Stop(GestureStop::at(0, 1)))
                .is_none()
        );
    }

    #[test]
    fn lists_are_isolated() {
        let mut registry = TrackerRegistry::new();
        registry
            .setup(ReorderConfig::new("left", ReorderMode::Sort), ids(&["a", "b"]))
            .unwrap();
        registry
            .setup(ReorderConfig::new("right", ReorderMode::Sort), ids(&["a", "b"]))
            .unwrap();
        let change = registry
            .dispatch("left", &GestureNotification::Stop(GestureStop::at(0, 1)))
            .unwrap();
        assert_eq!(change.sequence_after.join(":"), "b:a");
        assert_eq!(registry.tracker("right").unwrap().order().join(":"), "a:b");
        assert_eq!(registry.list_ids(), vec!["left", "right"]);
    }
}
