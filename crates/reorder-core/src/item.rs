#![forbid(unsafe_code)]

//! Item identifiers and the authoritative order of a list.
//!
//! An [`Order`] is a sequence of unique [`ItemId`]s. Uniqueness is checked
//! once, when the order is built from outside data; every order the tracker
//! derives afterwards is a permutation of a checked order and skips the check.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque identifier of a draggable element.
///
/// Serializes untagged, so `"a"` and `7` both deserialize directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Numeric identifier.
    Number(i64),
    /// Textual identifier.
    Text(String),
}

impl ItemId {
    /// Textual form, without allocating for text ids.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ItemId {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

/// Errors raised when building an [`Order`] from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The same id (by display form) appears more than once.
    #[error("duplicate item id '{id}' at index {index}")]
    DuplicateId { id: ItemId, index: usize },
}

/// Ordered sequence of unique item ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<ItemId>", into = "Vec<ItemId>")]
pub struct Order {
    ids: Vec<ItemId>,
}

impl Order {
    /// Build an order, rejecting duplicate ids.
    ///
    /// Ids are compared by their display form, so `7` and `"7"` count as the
    /// same id: they would be indistinguishable once the order is joined.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::DuplicateId`] for the first repeated id.
    pub fn new<I, T>(ids: I) -> Result<Self, OrderError>
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        let ids: Vec<ItemId> = ids.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(ids.len());
        for (index, id) in ids.iter().enumerate() {
            if !seen.insert(id.to_string()) {
                return Err(OrderError::DuplicateId {
                    id: id.clone(),
                    index,
                });
            }
        }
        Ok(Self { ids })
    }

    /// Wrap ids already known to be a permutation of a valid order.
    pub(crate) fn from_permutation(ids: Vec<ItemId>) -> Self {
        debug_assert!(Self::new(ids.clone()).is_ok(), "permutation lost uniqueness");
        Self { ids }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ItemId> {
        self.ids.get(index)
    }

    /// Position of `id`, if present.
    #[must_use]
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.index_of(id).is_some()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemId> {
        self.ids.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<ItemId> {
        self.ids
    }

    /// Copy of this order with the element at `from` removed and reinserted
    /// at `to`. Elements in between shift by one position.
    ///
    /// Returns `None` if either index is out of range.
    #[must_use]
    pub fn moved(&self, from: usize, to: usize) -> Option<Self> {
        if from >= self.ids.len() || to >= self.ids.len() {
            return None;
        }
        let mut ids = self.ids.clone();
        let item = ids.remove(from);
        ids.insert(to, item);
        Some(Self { ids })
    }

    /// Smallest index at which `other` differs from this order.
    ///
    /// Orders of different lengths differ at the shorter length if their
    /// common prefix matches.
    #[must_use]
    pub fn first_difference(&self, other: &[ItemId]) -> Option<usize> {
        self.ids
            .iter()
            .zip(other)
            .position(|(a, b)| a != b)
            .or_else(|| (self.ids.len() != other.len()).then(|| self.ids.len().min(other.len())))
    }

    /// True if `other` holds exactly the same ids in any arrangement.
    #[must_use]
    pub fn is_permutation_of(&self, other: &Self) -> bool {
        if self.ids.len() != other.ids.len() {
            return false;
        }
        let mine: HashSet<&ItemId> = self.ids.iter().collect();
        other.ids.iter().all(|id| mine.contains(id))
    }

    /// Ids joined with `sep`, e.g. `"a:b:c"` for `sep = ":"`.
    #[must_use]
    pub fn join(&self, sep: &str) -> String {
        let mut out = String::new();
        for (i, id) in self.ids.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(&id.to_string());
        }
        out
    }
}

impl TryFrom<Vec<ItemId>> for Order {
    type Error = OrderError;

    fn try_from(ids: Vec<ItemId>) -> Result<Self, Self::Error> {
        Self::new(ids)
    }
}

impl From<Order> for Vec<ItemId> {
    fn from(order: Order) -> Self {
        order.ids
    }
}

impl<'a> IntoIterator for &'a Order {
    type Item = &'a ItemId;
    type IntoIter = std::slice::Iter<'a, ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl PartialEq<[ItemId]> for Order {
    fn eq(&self, other: &[ItemId]) -> bool {
        self.ids.as_slice() == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(ids: &[&str]) -> Order {
        Order::new(ids.iter().copied()).expect("unique ids")
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Order::new(["a", "b", "a"]).unwrap_err();
        assert_eq!(
            err,
            OrderError::DuplicateId {
                id: ItemId::from("a"),
                index: 2
            }
        );
    }

    #[test]
    fn number_and_text_with_same_display_are_duplicates() {
        let err = Order::new([ItemId::from(7), ItemId::from("7"), ItemId::from("x")]).unwrap_err();
        assert_eq!(
            err,
            OrderError::DuplicateId {
                id: ItemId::from("7"),
                index: 1
            }
        );
        assert!(Order::new([ItemId::from(7), ItemId::from("x")]).is_ok());
    }

    #[test]
    fn index_of_finds_position() {
        let o = order(&["a", "b", "c"]);
        assert_eq!(o.index_of(&"c".into()), Some(2));
        assert_eq!(o.index_of(&"z".into()), None);
    }

    #[test]
    fn moved_forward_shifts_left() {
        let o = order(&["a", "b", "c", "d"]);
        assert_eq!(o.moved(0, 2), Some(order(&["b", "c", "a", "d"])));
    }

    #[test]
    fn moved_backward_shifts_right() {
        let o = order(&["a", "b", "c", "d"]);
        assert_eq!(o.moved(3, 1), Some(order(&["a", "d", "b", "c"])));
    }

    #[test]
    fn moved_out_of_range_is_none() {
        let o = order(&["a", "b"]);
        assert_eq!(o.moved(0, 2), None);
        assert_eq!(o.moved(5, 0), None);
    }

    #[test]
    fn first_difference_reports_smallest_index() {
        let o = order(&["a", "b", "c"]);
        let other = [ItemId::from("a"), "c".into(), "b".into()];
        assert_eq!(o.first_difference(&other), Some(1));
        assert_eq!(o.first_difference(o.as_slice()), None);
    }

    #[test]
    fn permutation_check() {
        let o = order(&["a", "b", "c"]);
        assert!(o.is_permutation_of(&order(&["c", "a", "b"])));
        assert!(!o.is_permutation_of(&order(&["a", "b", "d"])));
        assert!(!o.is_permutation_of(&order(&["a", "b"])));
    }

    #[test]
    fn join_uses_display_form() {
        let o = Order::new([ItemId::from(10), "x".into(), ItemId::from(3)]).unwrap();
        assert_eq!(o.join(":"), "10:x:3");
        assert_eq!(Order::default().join(":"), "");
    }

    #[test]
    fn serde_accepts_strings_and_numbers() {
        let o: Order = serde_json::from_str(r#"["a", 2, "c"]"#).unwrap();
        assert_eq!(o.get(1), Some(&ItemId::Number(2)));
        assert_eq!(serde_json::to_string(&o).unwrap(), r#"["a",2,"c"]"#);
    }

    #[test]
    fn serde_rejects_duplicates() {
        let result: Result<Order, _> = serde_json::from_str(r#"["a", "a"]"#);
        assert!(result.is_err());
    }
}
