#![forbid(unsafe_code)]

//! Swap-mode reconciliation.
//!
//! In swap mode the gesture engine never reports cumulative state. It emits a
//! `swapped` notification for every pairwise exchange the pointer passes over,
//! including exchanges that happen while the user drags back toward the start,
//! and the final `stop` carries no positions. The final order is therefore
//! rebuilt from those notifications.
//!
//! # Invariants
//!
//! 1. Each working order is derived from the authoritative order, never from
//!    the previous working order. Repeated notifications cannot drift.
//! 2. A working order differs from the authoritative order by at most one
//!    transposition, and that transposition always involves the dragged item.
//! 3. A swap with the original neighbour that the dragged item displaced one
//!    step earlier cancels the displacement instead of compounding it.
//!
//! # Failure Modes
//!
//! - The reversal check only looks one step away from the original position.
//!   A longer back-and-forth can leave the dragged item exchanged with an
//!   element the user merely passed over.

use crate::item::ItemId;

/// Recompute the working order after the dragged item exchanged places with
/// `swapped`.
///
/// `current_index` is where the dragged item sat in the previous working
/// order (equal to `original_index` before the first exchange). Returns
/// `None` if `swapped` is not part of `order` or `original_index` is out of
/// range.
#[must_use]
pub fn reconcile_swap(
    order: &[ItemId],
    dragged: &ItemId,
    original_index: usize,
    current_index: usize,
    swapped: &ItemId,
) -> Option<Vec<ItemId>> {
    if original_index >= order.len() {
        return None;
    }
    let swapped_index = order.iter().position(|id| id == swapped)?;

    if is_one_step_reversal(order, original_index, current_index, swapped) {
        return Some(order.to_vec());
    }

    let mut working = order.to_vec();
    working[swapped_index] = dragged.clone();
    working[original_index] = swapped.clone();
    Some(working)
}

/// True if `swapped` is the original neighbour on the side the dragged item
/// moved to, i.e. the exchange undoes a one-step displacement.
fn is_one_step_reversal(
    order: &[ItemId],
    original_index: usize,
    current_index: usize,
    swapped: &ItemId,
) -> bool {
    if current_index + 1 == original_index {
        // Moved one step left: returning means swapping with the left neighbour.
        return order.get(original_index - 1) == Some(swapped);
    }
    if current_index == original_index + 1 {
        return order.get(original_index + 1) == Some(swapped);
    }
    false
}

/// In-progress swap gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapSession {
    dragged: ItemId,
    original_index: usize,
    current_index: usize,
    working: Vec<ItemId>,
}

impl SwapSession {
    /// Open a session for `dragged`. Returns `None` if it is not in `order`.
    #[must_use]
    pub fn open(order: &[ItemId], dragged: &ItemId) -> Option<Self> {
        let original_index = order.iter().position(|id| id == dragged)?;
        Some(Self {
            dragged: dragged.clone(),
            original_index,
            current_index: original_index,
            working: order.to_vec(),
        })
    }

    #[must_use]
    pub fn dragged(&self) -> &ItemId {
        &self.dragged
    }

    #[must_use]
    pub const fn original_index(&self) -> usize {
        self.original_index
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn working_order(&self) -> &[ItemId] {
        &self.working
    }

    /// Apply a `swapped` notification against the authoritative `order`.
    ///
    /// Returns `false` and leaves the session untouched if `swapped` is
    /// unknown.
    pub fn apply(&mut self, order: &[ItemId], swapped: &ItemId) -> bool {
        let Some(working) = reconcile_swap(
            order,
            &self.dragged,
            self.original_index,
            self.current_index,
            swapped,
        ) else {
            return false;
        };
        // The dragged id is always present: it was found at open time and
        // reconciliation only permutes `order`.
        self.current_index = working
            .iter()
            .position(|id| *id == self.dragged)
            .unwrap_or(self.original_index);
        self.working = working;
        true
    }

    /// Consume the session, yielding the final candidate order.
    #[must_use]
    pub fn into_candidate(self) -> Vec<ItemId> {
        self.working
    }
}

/// Drag/drop pair of a swap, read at the first position where `candidate`
/// differs from `order`.
///
/// The pair is `(candidate[i], order[i])` unless `order[i]` is the dragged
/// item itself (it moved rightward), in which case the pair is flipped so the
/// first element is always `dragged`.
#[must_use]
pub fn swap_pair(order: &[ItemId], candidate: &[ItemId], dragged: &ItemId) -> Option<(ItemId, ItemId)> {
    let i = order.iter().zip(candidate).position(|(a, b)| a != b)?;
    let (landed, displaced) = (&candidate[i], &order[i]);
    if displaced == dragged {
        Some((displaced.clone(), landed.clone()))
    } else {
        Some((landed.clone(), displaced.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ItemId> {
        names.iter().map(|n| ItemId::from(*n)).collect()
    }

    fn id(name: &str) -> ItemId {
        ItemId::from(name)
    }

    // --- reconcile_swap ---

    #[test]
    fn first_swap_exchanges_with_original_slot() {
        let order = ids(&["A", "B", "C"]);
        let working = reconcile_swap(&order, &id("A"), 0, 0, &id("B")).unwrap();
        assert_eq!(working, ids(&["B", "A", "C"]));
    }

    #[test]
    fn swap_back_with_right_neighbour_resets() {
        let order = ids(&["A", "B", "C"]);
        let working = reconcile_swap(&order, &id("A"), 0, 1, &id("B")).unwrap();
        assert_eq!(working, order);
    }

    #[test]
    fn swap_back_with_left_neighbour_resets() {
        let order = ids(&["A", "B", "C"]);
        let working = reconcile_swap(&order, &id("C"), 2, 1, &id("B")).unwrap();
        assert_eq!(working, order);
    }

    #[test]
    fn neighbour_on_other_side_is_not_a_reversal() {
        // Dragged B moved right (current 2); swapping with left neighbour A is
        // a fresh exchange, not a return.
        let order = ids(&["A", "B", "C"]);
        let working = reconcile_swap(&order, &id("B"), 1, 2, &id("A")).unwrap();
        assert_eq!(working, ids(&["B", "A", "C"]));
    }

    #[test]
    fn further_swap_recomputes_from_original() {
        // A already sits at index 1 after swapping with B; passing over C
        // exchanges A with C relative to the original order.
        let order = ids(&["A", "B", "C", "D"]);
        let working = reconcile_swap(&order, &id("A"), 0, 1, &id("C")).unwrap();
        assert_eq!(working, ids(&["C", "B", "A", "D"]));
    }

    #[test]
    fn far_from_origin_never_resets() {
        let order = ids(&["A", "B", "C", "D"]);
        let working = reconcile_swap(&order, &id("A"), 0, 2, &id("B")).unwrap();
        assert_eq!(working, ids(&["B", "A", "C", "D"]));
    }

    #[test]
    fn unknown_swapped_is_rejected() {
        let order = ids(&["A", "B"]);
        assert_eq!(reconcile_swap(&order, &id("A"), 0, 0, &id("Z")), None);
        assert_eq!(reconcile_swap(&order, &id("A"), 7, 0, &id("B")), None);
    }

    #[test]
    fn swapping_with_itself_keeps_order() {
        let order = ids(&["A", "B"]);
        let working = reconcile_swap(&order, &id("B"), 1, 1, &id("B")).unwrap();
        assert_eq!(working, order);
    }

    // --- SwapSession ---

    #[test]
    fn session_tracks_current_index() {
        let order = ids(&["A", "B", "C"]);
        let mut session = SwapSession::open(&order, &id("A")).unwrap();
        assert_eq!(session.current_index(), 0);
        assert!(session.apply(&order, &id("B")));
        assert_eq!(session.current_index(), 1);
        assert!(session.apply(&order, &id("B")));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.into_candidate(), order);
    }

    #[test]
    fn session_ignores_unknown_ids() {
        let order = ids(&["A", "B", "C"]);
        let mut session = SwapSession::open(&order, &id("A")).unwrap();
        assert!(session.apply(&order, &id("B")));
        assert!(!session.apply(&order, &id("Q")));
        assert_eq!(session.working_order(), ids(&["B", "A", "C"]).as_slice());
    }

    #[test]
    fn session_requires_known_dragged() {
        assert!(SwapSession::open(&ids(&["A"]), &id("B")).is_none());
    }

    // --- swap_pair ---

    #[test]
    fn pair_orients_rightward_drag() {
        let order = ids(&["A", "B", "C"]);
        let candidate = ids(&["B", "A", "C"]);
        assert_eq!(swap_pair(&order, &candidate, &id("A")), Some((id("A"), id("B"))));
    }

    #[test]
    fn pair_orients_leftward_drag() {
        let order = ids(&["A", "B", "C"]);
        let candidate = ids(&["A", "C", "B"]);
        assert_eq!(swap_pair(&order, &candidate, &id("C")), Some((id("C"), id("B"))));
    }

    #[test]
    fn pair_none_when_unchanged() {
        let order = ids(&["A", "B"]);
        assert_eq!(swap_pair(&order, &order, &id("A")), None);
    }
}
