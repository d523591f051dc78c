//! Re-entry: returning expired trains to the waiting queue.

use crate::snapshot::SimEvent;
use crate::train::TrainId;
use crate::yard::YardState;

/// Record an expired train for reinjection. Idempotent: a single
/// membership pass covers the re-entry queue and every yard structure, so
/// repeated clock ticks before a drain cannot duplicate an id.
pub fn mark_expired(state: &mut YardState, id: &TrainId) -> bool {
    if state.is_tracked(id) {
        return false;
    }
    state.reentry.push(id.clone());
    state.push_event(SimEvent::ReEntryQueued { id: id.clone() });
    true
}

/// Drain the re-entry queue into the waiting-queue tail, preserving the
/// order expiries were observed.
pub fn drain(state: &mut YardState) {
    if state.reentry.is_empty() {
        return;
    }
    let pending = std::mem::take(&mut state.reentry);
    for id in pending {
        // Same disjointness check as enqueue; the id left the re-entry
        // queue with the take above.
        if state.is_tracked(&id) {
            continue;
        }
        state.waiting.push_back(id.clone());
        state.push_event(SimEvent::Queued { id });
    }
}
