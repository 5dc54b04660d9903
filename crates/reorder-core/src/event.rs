#![forbid(unsafe_code)]

//! Gesture notifications consumed by the tracker and the change event it emits.
//!
//! The gesture engine reports a drag as a short lifecycle:
//!
//! ```text
//! Start(dragged) ─▶ Swapped(id)* ─▶ Stop(old_index?, new_index?)
//! ```
//!
//! `Swapped` only occurs in [`ReorderMode::Swap`]. `Stop` carries positions
//! only in [`ReorderMode::Sort`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::item::{ItemId, Order};

/// How a completed drag rearranges the list.
///
/// Deserializes through [`FromStr`], so config files accept the same
/// spellings as `str::parse` (`"Swap"`, `" sort "`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ReorderMode {
    /// The dragged item moves to a new position; items in between shift.
    #[default]
    Sort,
    /// The dragged item exchanges places with exactly one other item.
    Swap,
}

impl ReorderMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sort => "sort",
            Self::Swap => "swap",
        }
    }
}

impl fmt::Display for ReorderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReorderMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sort" => Ok(Self::Sort),
            "swap" => Ok(Self::Swap),
            _ => Err(UnknownMode(s.to_owned())),
        }
    }
}

impl TryFrom<String> for ReorderMode {
    type Error = UnknownMode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A mode name that is neither `sort` nor `swap`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reorder mode '{0}' (expected 'sort' or 'swap')")]
pub struct UnknownMode(pub String);

/// Terminal notification of a gesture.
///
/// Sort mode supplies both positions; swap mode supplies neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GestureStop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_index: Option<usize>,
}

impl GestureStop {
    /// Stop carrying sort positions.
    #[must_use]
    pub const fn at(old_index: usize, new_index: usize) -> Self {
        Self {
            old_index: Some(old_index),
            new_index: Some(new_index),
        }
    }

    /// Stop without positional data.
    #[must_use]
    pub const fn bare() -> Self {
        Self {
            old_index: None,
            new_index: None,
        }
    }

    /// Both positions, if present.
    #[must_use]
    pub const fn positions(&self) -> Option<(usize, usize)> {
        match (self.old_index, self.new_index) {
            (Some(old), Some(new)) => Some((old, new)),
            _ => None,
        }
    }
}

/// A lifecycle notification from the gesture engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GestureNotification {
    /// A drag began on `dragged`.
    Start { dragged: ItemId },
    /// The dragged element exchanged places with `swapped` (swap mode).
    Swapped { swapped: ItemId },
    /// The drag ended.
    Stop(GestureStop),
}

/// Normalized description of one effective reorder.
///
/// `sequence_after` is always a permutation of `sequence_before`, and the
/// two differ in at least one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceChanged {
    pub mode: ReorderMode,
    /// The item the user dragged.
    pub drag_id: ItemId,
    /// Sort: the item that occupied the landing index before the move.
    /// Swap: the item the dragged one was exchanged with.
    pub drop_id: ItemId,
    pub sequence_before: Order,
    pub sequence_after: Order,
}

impl SequenceChanged {
    /// Number of positions whose occupant changed.
    #[must_use]
    pub fn displaced(&self) -> usize {
        self.sequence_before
            .iter()
            .zip(self.sequence_after.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!(" Swap ".parse::<ReorderMode>(), Ok(ReorderMode::Swap));
        assert_eq!("sort".parse::<ReorderMode>(), Ok(ReorderMode::Sort));
        assert!("shuffle".parse::<ReorderMode>().is_err());
    }

    #[test]
    fn mode_deserializes_like_parse() {
        let mode: ReorderMode = serde_json::from_str(r#"" Swap ""#).unwrap();
        assert_eq!(mode, ReorderMode::Swap);
        let mode: ReorderMode = serde_json::from_str(r#""SORT""#).unwrap();
        assert_eq!(mode, ReorderMode::Sort);
        let err = serde_json::from_str::<ReorderMode>(r#""shuffle""#).unwrap_err();
        assert!(err.to_string().contains("unknown reorder mode"));
        assert_eq!(serde_json::to_string(&ReorderMode::Swap).unwrap(), r#""swap""#);
    }

    #[test]
    fn stop_positions_require_both_indices() {
        assert_eq!(GestureStop::at(1, 3).positions(), Some((1, 3)));
        assert_eq!(GestureStop::bare().positions(), None);
        let half = GestureStop {
            old_index: Some(1),
            new_index: None,
        };
        assert_eq!(half.positions(), None);
    }

    #[test]
    fn notification_json_shape() {
        let start: GestureNotification =
            serde_json::from_str(r#"{"kind":"start","dragged":"a"}"#).unwrap();
        assert_eq!(
            start,
            GestureNotification::Start {
                dragged: ItemId::from("a")
            }
        );
        let stop: GestureNotification =
            serde_json::from_str(r#"{"kind":"stop","old_index":0,"new_index":2}"#).unwrap();
        assert_eq!(stop, GestureNotification::Stop(GestureStop::at(0, 2)));
    }

    #[test]
    fn change_serializes_camel_case() {
        let change = SequenceChanged {
            mode: ReorderMode::Swap,
            drag_id: "a".into(),
            drop_id: "b".into(),
            sequence_before: Order::new(["a", "b"]).unwrap(),
            sequence_after: Order::new(["b", "a"]).unwrap(),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["mode"], "swap");
        assert_eq!(json["dragId"], "a");
        assert_eq!(json["sequenceAfter"][0], "b");
        assert_eq!(change.displaced(), 2);
    }
}
