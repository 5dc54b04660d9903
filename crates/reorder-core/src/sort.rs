#![forbid(unsafe_code)]

//! Sort-mode resolution.
//!
//! The gesture engine reports the drag's start and landing positions
//! directly, so the final order is a single remove-then-insert of the
//! original order.

use crate::item::{ItemId, Order};

/// Candidate order and the drag/drop pair for a sort gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortResolution {
    pub candidate: Order,
    /// Item at `old_index` in the original order.
    pub drag_id: ItemId,
    /// Item at `new_index` in the original order, the one displaced.
    pub drop_id: ItemId,
}

impl SortResolution {
    /// True if the move leaves `original` unchanged.
    #[must_use]
    pub fn is_noop(&self, original: &Order) -> bool {
        self.candidate == *original
    }
}

/// Resolve a sort stop against the authoritative `order`.
///
/// Equal indices yield a candidate identical to `order`. Returns `None`
/// if either index falls outside the order.
#[must_use]
pub fn resolve_sort(order: &Order, old_index: usize, new_index: usize) -> Option<SortResolution> {
    let drag_id = order.get(old_index)?.clone();
    let drop_id = order.get(new_index)?.clone();
    let candidate = if old_index == new_index {
        order.clone()
    } else {
        order.moved(old_index, new_index)?
    };
    Some(SortResolution {
        candidate,
        drag_id,
        drop_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(ids: &[&str]) -> Order {
        Order::new(ids.iter().copied()).unwrap()
    }

    #[test]
    fn forward_move_reports_displaced_item() {
        let o = order(&["A", "B", "C", "D"]);
        let res = resolve_sort(&o, 0, 2).unwrap();
        assert_eq!(res.candidate, order(&["B", "C", "A", "D"]));
        assert_eq!(res.drag_id, ItemId::from("A"));
        assert_eq!(res.drop_id, ItemId::from("C"));
        assert!(!res.is_noop(&o));
    }

    #[test]
    fn backward_move_reports_displaced_item() {
        let o = order(&["A", "B", "C", "D"]);
        let res = resolve_sort(&o, 3, 0).unwrap();
        assert_eq!(res.candidate, order(&["D", "A", "B", "C"]));
        assert_eq!(res.drag_id, ItemId::from("D"));
        assert_eq!(res.drop_id, ItemId::from("A"));
    }

    #[test]
    fn same_index_is_noop() {
        let o = order(&["A", "B", "C"]);
        let res = resolve_sort(&o, 1, 1).unwrap();
        assert!(res.is_noop(&o));
    }

    #[test]
    fn adjacent_move_matches_swap() {
        let o = order(&["A", "B", "C"]);
        let res = resolve_sort(&o, 1, 2).unwrap();
        assert_eq!(res.candidate, order(&["A", "C", "B"]));
        assert_eq!(res.drop_id, ItemId::from("C"));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let o = order(&["A", "B"]);
        assert_eq!(resolve_sort(&o, 0, 2), None);
        assert_eq!(resolve_sort(&o, 9, 0), None);
        assert_eq!(resolve_sort(&Order::default(), 0, 0), None);
    }
}
