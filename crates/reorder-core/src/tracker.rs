#![forbid(unsafe_code)]

//! Reorder tracker: owns a list's authoritative order and turns gesture
//! lifecycles into [`SequenceChanged`] events.
//!
//! # State Machine
//!
//! ```text
//!            start(id)                 stop
//!   Idle ─────────────▶ Dragging ──────────────▶ Idle
//!    ▲                   │  ▲  │ swapped(id)
//!    │                   │  └──┘ (swap mode)
//!    └───── start(id) ───┘  (replaces the open session)
//! ```
//!
//! # Invariants
//!
//! 1. The authoritative order changes only on `stop`, and only when the
//!    candidate differs from it. It is replaced wholesale.
//! 2. A stop emits at most one event. An emitted event's sequences are
//!    permutations of each other and differ in at least one position.
//! 3. The drag session is discarded on every stop, whether or not anything
//!    changed.
//! 4. A start while a session is open resets state; sessions never merge.
//! 5. After [`ReorderTracker::destroy`] every notification is ignored.
//!
//! # Failure Modes
//!
//! - An unknown dragged id at start is ignored. No session is open afterwards.
//! - If the gesture engine aborts a drag without a stop, the stale session
//!   survives until the next start resets it.

use crate::event::{GestureNotification, GestureStop, ReorderMode, SequenceChanged};
use crate::item::{ItemId, Order};
use crate::sort::resolve_sort;
use crate::swap::{SwapSession, swap_pair};

/// Transient state between a gesture's start and stop.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DragSession {
    Sort {
        dragged: ItemId,
        original_index: usize,
    },
    Swap(SwapSession),
}

impl DragSession {
    fn dragged(&self) -> &ItemId {
        match self {
            Self::Sort { dragged, .. } => dragged,
            Self::Swap(session) => session.dragged(),
        }
    }
}

/// Tracks the order of one list across drag gestures.
#[derive(Debug, Clone)]
pub struct ReorderTracker {
    mode: ReorderMode,
    order: Order,
    session: Option<DragSession>,
    destroyed: bool,
}

impl ReorderTracker {
    /// Create a tracker for `order` in the given mode.
    #[must_use]
    pub fn new(mode: ReorderMode, order: Order) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "reorder.init",
            mode = mode.as_str(),
            items = order.len()
        );
        Self {
            mode,
            order,
            session: None,
            destroyed: false,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ReorderMode {
        self.mode
    }

    /// The authoritative order.
    #[must_use]
    pub const fn order(&self) -> &Order {
        &self.order
    }

    /// True while a gesture is open.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Id of the item being dragged, if any.
    #[must_use]
    pub fn dragged(&self) -> Option<&ItemId> {
        self.session.as_ref().map(DragSession::dragged)
    }

    /// Original index of the dragged item, if any.
    #[must_use]
    pub fn original_index(&self) -> Option<usize> {
        self.session.as_ref().map(|session| match session {
            DragSession::Sort { original_index, .. } => *original_index,
            DragSession::Swap(swap) => swap.original_index(),
        })
    }

    /// Provisional order of an in-progress swap gesture.
    #[must_use]
    pub fn working_order(&self) -> Option<&[ItemId]> {
        match &self.session {
            Some(DragSession::Swap(swap)) => Some(swap.working_order()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Dispatch a gesture notification.
    ///
    /// Returns the change event when a stop completes an effective reorder.
    pub fn handle(&mut self, notification: &GestureNotification) -> Option<SequenceChanged> {
        match notification {
            GestureNotification::Start { dragged } => {
                self.on_gesture_start(dragged);
                None
            }
            GestureNotification::Swapped { swapped } => {
                self.on_swapped(swapped);
                None
            }
            GestureNotification::Stop(stop) => self.on_gesture_stop(*stop),
        }
    }

    /// Open a drag session for `dragged`, replacing any open session.
    pub fn on_gesture_start(&mut self, dragged: &ItemId) {
        if self.destroyed {
            return;
        }
        #[cfg(feature = "tracing")]
        if self.session.is_some() {
            tracing::debug!(message = "reorder.session_reset", dragged = %dragged);
        }
        self.session = None;

        let Some(original_index) = self.order.index_of(dragged) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(message = "reorder.unknown_item", dragged = %dragged);
            return;
        };

        self.session = match self.mode {
            ReorderMode::Sort => Some(DragSession::Sort {
                dragged: dragged.clone(),
                original_index,
            }),
            ReorderMode::Swap => {
                SwapSession::open(self.order.as_slice(), dragged).map(DragSession::Swap)
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "reorder.start",
            mode = self.mode.as_str(),
            dragged = %dragged,
            original_index
        );
    }

    /// Record that the dragged item exchanged places with `swapped`.
    ///
    /// Ignored outside swap mode, without an open session, or for an id
    /// not in the order.
    pub fn on_swapped(&mut self, swapped: &ItemId) {
        let Some(DragSession::Swap(session)) = &mut self.session else {
            return;
        };
        let applied = session.apply(self.order.as_slice(), swapped);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "reorder.swapped",
            swapped = %swapped,
            applied,
            current_index = session.current_index()
        );
        #[cfg(not(feature = "tracing"))]
        let _ = applied;
    }

    /// Close the gesture and emit the change, if any.
    pub fn on_gesture_stop(&mut self, stop: GestureStop) -> Option<SequenceChanged> {
        if self.destroyed {
            return None;
        }
        let session = self.session.take();
        let change = match self.mode {
            ReorderMode::Sort => self.resolve_sort_stop(stop),
            ReorderMode::Swap => self.resolve_swap_stop(session),
        };

        match &change {
            Some(change) => {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    message = "reorder.sequence_changed",
                    mode = self.mode.as_str(),
                    drag_id = %change.drag_id,
                    drop_id = %change.drop_id,
                    displaced = change.displaced()
                );
                self.order = change.sequence_after.clone();
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(message = "reorder.noop", mode = self.mode.as_str());
            }
        }
        change
    }

    fn resolve_sort_stop(&self, stop: GestureStop) -> Option<SequenceChanged> {
        let (old_index, new_index) = stop.positions()?;
        let Some(resolution) = resolve_sort(&self.order, old_index, new_index) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                message = "reorder.index_out_of_range",
                old_index,
                new_index,
                len = self.order.len()
            );
            return None;
        };
        if resolution.is_noop(&self.order) {
            return None;
        }
        Some(SequenceChanged {
            mode: ReorderMode::Sort,
            drag_id: resolution.drag_id,
            drop_id: resolution.drop_id,
            sequence_before: self.order.clone(),
            sequence_after: resolution.candidate,
        })
    }

    fn resolve_swap_stop(&self, session: Option<DragSession>) -> Option<SequenceChanged> {
        let Some(DragSession::Swap(session)) = session else {
            return None;
        };
        let dragged = session.dragged().clone();
        let candidate = session.into_candidate();
        if self.order == *candidate.as_slice() {
            return None;
        }
        let (drag_id, drop_id) = swap_pair(self.order.as_slice(), &candidate, &dragged)?;
        Some(SequenceChanged {
            mode: ReorderMode::Swap,
            drag_id,
            drop_id,
            sequence_before: self.order.clone(),
            sequence_after: Order::from_permutation(candidate),
        })
    }

    /// Tear down the tracker. Any open session is dropped and further
    /// notifications are ignored.
    pub fn destroy(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "reorder.destroy",
            had_session = self.session.is_some()
        );
        self.session = None;
        self.destroyed = true;
    }
}
