#![forbid(unsafe_code)]

//! Wire payload describing a sequence change to downstream consumers.
//!
//! # Format
//!
//! ```json
//! {"sorted":{"dragId":"a","dropId":"c"},"sequence":{"before":"a:b:c","after":"b:c:a"}}
//! ```
//!
//! The first key is `sorted` or `swapped` depending on the tracker mode.
//! Sequences are the item ids joined with [`SEQUENCE_SEPARATOR`].
//!
//! In `swapped` payloads `dragId` is always the item the user dragged, also
//! for rightward drags. Consumers that read the pair positionally from the
//! first differing index (new id first, old id second) see it reversed when
//! the dragged item moved right.

use reorder_core::{ItemId, ReorderMode, SequenceChanged};
use serde::{Deserialize, Serialize};

/// Separator used when flattening a sequence into a single string.
pub const SEQUENCE_SEPARATOR: &str = ":";

/// `drag_id` is the dragged item in both modes, whichever direction it moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragDrop {
    pub drag_id: ItemId,
    pub drop_id: ItemId,
}

/// Mode-tagged drag/drop pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Sorted(DragDrop),
    Swapped(DragDrop),
}

impl ChangeKind {
    #[must_use]
    pub fn pair(&self) -> &DragDrop {
        match self {
            Self::Sorted(pair) | Self::Swapped(pair) => pair,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ReorderMode {
        match self {
            Self::Sorted(_) => ReorderMode::Sort,
            Self::Swapped(_) => ReorderMode::Swap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePair {
    pub before: String,
    pub after: String,
}

/// Payload sent to the persistence endpoint and carried by persist events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceUpdate {
    #[serde(flatten)]
    pub kind: ChangeKind,
    pub sequence: SequencePair,
}

impl SequenceUpdate {
    /// Build the payload for an emitted change.
    #[must_use]
    pub fn from_change(change: &SequenceChanged) -> Self {
        let pair = DragDrop {
            drag_id: change.drag_id.clone(),
            drop_id: change.drop_id.clone(),
        };
        let kind = match change.mode {
            ReorderMode::Sort => ChangeKind::Sorted(pair),
            ReorderMode::Swap => ChangeKind::Swapped(pair),
        };
        Self {
            kind,
            sequence: SequencePair {
                before: change.sequence_before.join(SEQUENCE_SEPARATOR),
                after: change.sequence_after.join(SEQUENCE_SEPARATOR),
            },
        }
    }

    /// Serialize to a compact JSON string.
    ///
    /// # Errors
    ///
    /// Fails only if an id cannot be represented in JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// One-line summary, e.g. `sorted a→c [a:b:c → b:c:a]`.
    #[must_use]
    pub fn summary(&self) -> String {
        let label = match self.kind {
            ChangeKind::Sorted(_) => "sorted",
            ChangeKind::Swapped(_) => "swapped",
        };
        let pair = self.kind.pair();
        format!(
            "{label} {}→{} [{} → {}]",
            pair.drag_id, pair.drop_id, self.sequence.before, self.sequence.after
        )
    }
}

impl From<&SequenceChanged> for SequenceUpdate {
    fn from(change: &SequenceChanged) -> Self {
        Self::from_change(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reorder_core::Order;

    fn change(mode: ReorderMode) -> SequenceChanged {
        SequenceChanged {
            mode,
            drag_id: "a".into(),
            drop_id: "c".into(),
            sequence_before: Order::new(["a", "b", "c"]).unwrap(),
            sequence_after: Order::new(["b", "c", "a"]).unwrap(),
        }
    }

    #[test]
    fn sorted_payload_shape() {
        let update = SequenceUpdate::from_change(&change(ReorderMode::Sort));
        let json: serde_json::Value = serde_json::from_str(&update.to_json().unwrap()).unwrap();
        assert_eq!(json["sorted"]["dragId"], "a");
        assert_eq!(json["sorted"]["dropId"], "c");
        assert_eq!(json["sequence"]["before"], "a:b:c");
        assert_eq!(json["sequence"]["after"], "b:c:a");
        assert!(json.get("swapped").is_none());
    }

    #[test]
    fn swapped_payload_uses_swapped_key() {
        let update = SequenceUpdate::from(&change(ReorderMode::Swap));
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["swapped"]["dragId"], "a");
        assert!(json.get("sorted").is_none());
        assert_eq!(update.kind.mode(), ReorderMode::Swap);
    }

    #[test]
    fn rightward_swap_reports_dragged_item_as_drag_id() {
        use reorder_core::{GestureNotification, GestureStop, ReorderTracker};

        let mut tracker = ReorderTracker::new(ReorderMode::Swap, Order::new(["a", "b", "c"]).unwrap());
        tracker.handle(&GestureNotification::Start { dragged: "a".into() });
        tracker.handle(&GestureNotification::Swapped { swapped: "b".into() });
        let change = tracker
            .handle(&GestureNotification::Stop(GestureStop::bare()))
            .unwrap();

        let json = serde_json::to_value(SequenceUpdate::from_change(&change)).unwrap();
        assert_eq!(json["swapped"]["dragId"], "a");
        assert_eq!(json["swapped"]["dropId"], "b");
        assert_eq!(json["sequence"]["after"], "b:a:c");
    }

    #[test]
    fn payload_parses_back() {
        let raw = r#"{"swapped":{"dragId":4,"dropId":"x"},"sequence":{"before":"4:x","after":"x:4"}}"#;
        let update: SequenceUpdate = serde_json::from_str(raw).unwrap();
        assert_eq!(update.kind.pair().drag_id, ItemId::Number(4));
        assert_eq!(update.sequence.after, "x:4");
    }

    #[test]
    fn summary_is_single_line() {
        let update = SequenceUpdate::from_change(&change(ReorderMode::Sort));
        assert_eq!(update.summary(), "sorted a→c [a:b:c → b:c:a]");
    }
}
