#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reorder_core::{GestureStop, ItemId, Order, ReorderMode, ReorderTracker};

#[derive(Debug, Arbitrary)]
enum Step {
    Start(u8),
    Swapped(u8),
    Stop { old: Option<u8>, new: Option<u8> },
    Destroy,
}

#[derive(Debug, Arbitrary)]
struct Input {
    swap: bool,
    len: u8,
    steps: Vec<Step>,
}

fuzz_target!(|input: Input| {
    // Ids beyond `len` exercise the unknown-id paths.
    let len = i64::from(input.len % 32);
    let order = Order::new((0..len).map(ItemId::from)).expect("unique ids");
    let mode = if input.swap { ReorderMode::Swap } else { ReorderMode::Sort };
    let mut tracker = ReorderTracker::new(mode, order.clone());

    for step in input.steps {
        let before = tracker.order().clone();
        match step {
            Step::Start(i) => tracker.on_gesture_start(&ItemId::from(i64::from(i))),
            Step::Swapped(i) => tracker.on_swapped(&ItemId::from(i64::from(i))),
            Step::Stop { old, new } => {
                let stop = GestureStop {
                    old_index: old.map(usize::from),
                    new_index: new.map(usize::from),
                };
                match tracker.on_gesture_stop(stop) {
                    Some(change) => {
                        assert_eq!(change.sequence_before, before, "before must be the prior order");
                        assert!(change.sequence_after.is_permutation_of(&before), "not a permutation");
                        assert_ne!(change.sequence_after, before, "no-op emitted");
                        assert_eq!(tracker.order(), &change.sequence_after, "order not replaced");
                        if mode == ReorderMode::Swap {
                            assert_eq!(change.displaced(), 2, "swap moved more than a pair");
                        }
                    }
                    None => assert_eq!(tracker.order(), &before, "order changed silently"),
                }
                assert!(!tracker.is_dragging(), "session survived stop");
            }
            Step::Destroy => tracker.destroy(),
        }
        assert!(tracker.order().is_permutation_of(&order), "ids lost or invented");
    }
});
