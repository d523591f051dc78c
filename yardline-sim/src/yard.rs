//! Yard state: the single owner of all train, track, and queue data.
//!
//! Every collection lives on [`YardState`] and is mutated only through
//! timer-callback entrypoints, matching the cooperative single-threaded
//! host model. There are no ambient globals.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use crate::healing::{CycleState, HealingBoard};
use crate::snapshot::{EventLog, Location, SimEvent};
use crate::tracks::{TrackId, TrackSet};
use crate::train::{TrainId, TrainRecord};

/// Complete mutable simulation state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YardState {
    /// Train table keyed by id.
    pub trains: HashMap<TrainId, TrainRecord>,
    /// Insertion-ordered roster, for deterministic iteration.
    pub roster: Vec<TrainId>,
    pub tracks: TrackSet,
    /// FIFO queue of trains awaiting a staged slot.
    pub waiting: VecDeque<TrainId>,
    /// Expired trains pending reinjection into the waiting queue.
    pub reentry: Vec<TrainId>,
    pub healing: HealingBoard,
    pub cycle: CycleState,
    /// Events accumulated since the last presentation drain.
    #[serde(skip)]
    pub events: EventLog,
}

impl YardState {
    /// Insert or replace a train record, keeping the roster in first-seen
    /// order.
    pub fn upsert_train(&mut self, record: TrainRecord) {
        if !self.trains.contains_key(&record.id) {
            self.roster.push(record.id.clone());
        }
        self.trains.insert(record.id.clone(), record);
    }

    /// Borrow a train record by id.
    #[must_use]
    pub fn train(&self, id: &TrainId) -> Option<&TrainRecord> {
        self.trains.get(id)
    }

    /// Mutably borrow a train record by id.
    pub fn train_mut(&mut self, id: &TrainId) -> Option<&mut TrainRecord> {
        self.trains.get_mut(id)
    }

    pub fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Drain accumulated events for the presentation layer.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        self.events.drain(..).collect()
    }

    /// Locate a train in the yard model.
    #[must_use]
    pub fn locate(&self, id: &TrainId) -> Option<Location> {
        for track in self.tracks.iter() {
            if track.repair_occupant() == Some(id) {
                return Some(Location::Repair(track.id));
            }
            if track.staged_occupant() == Some(id) {
                return Some(Location::Staged(track.id));
            }
        }
        if self.waiting.contains(id) {
            return Some(Location::Waiting);
        }
        if self.reentry.contains(id) {
            return Some(Location::ReEntry);
        }
        None
    }

    /// Whether the train occupies any queue or slot.
    #[must_use]
    pub fn is_tracked(&self, id: &TrainId) -> bool {
        self.locate(id).is_some()
    }

    /// Append a train to the waiting queue, refusing duplicates and trains
    /// already placed elsewhere.
    pub fn enqueue(&mut self, id: TrainId) -> bool {
        if self.is_tracked(&id) {
            log::debug!("{id} already tracked, not enqueueing");
            return false;
        }
        self.waiting.push_back(id.clone());
        self.push_event(SimEvent::Queued { id });
        true
    }

    /// Move the staged occupant into an empty repair slot and backfill the
    /// staged slot from the queue head. No-op when repair is occupied.
    pub fn promote(&mut self, track_id: TrackId) -> bool {
        if !self.tracks.get(track_id).repair_is_empty() {
            return false;
        }
        if let Some(train) = self.tracks.get_mut(track_id).clear_staged() {
            self.tracks.get_mut(track_id).occupy_repair(train.clone());
            self.push_event(SimEvent::Promoted {
                id: train,
                track: track_id,
            });
        }
        self.backfill_staged(track_id);
        true
    }

    /// Fill an empty staged slot from the waiting-queue head.
    pub fn backfill_staged(&mut self, track_id: TrackId) {
        if !self.tracks.get(track_id).staged_is_empty() {
            return;
        }
        if let Some(next) = self.waiting.pop_front() {
            self.tracks.get_mut(track_id).occupy_staged(next.clone());
            self.push_event(SimEvent::Staged {
                id: next,
                track: track_id,
            });
        }
    }

    /// Clear the repair slot after a completed exit, then promote.
    pub fn release(&mut self, track_id: TrackId) -> Option<TrainId> {
        let released = self.tracks.get_mut(track_id).clear_repair();
        self.promote(track_id);
        released
    }

    /// First-load placement: up to four trains straight into repair slots,
    /// the next batch into staged slots, the remainder into the waiting
    /// queue, preserving input order.
    pub fn place_initial(&mut self, ids: &[TrainId]) {
        let mut ids = ids.iter();
        for track_id in TrackId::ALL {
            let Some(id) = ids.next() else { return };
            self.tracks.get_mut(track_id).occupy_repair(id.clone());
        }
        for track_id in TrackId::ALL {
            let Some(id) = ids.next() else { return };
            self.tracks.get_mut(track_id).occupy_staged(id.clone());
        }
        for id in ids {
            self.waiting.push_back(id.clone());
            self.push_event(SimEvent::Queued { id: id.clone() });
        }
    }

    /// Movement sweep: ascending over tracks, promote into empty repair
    /// slots and keep staged slots fed from the queue.
    pub fn sweep_promotions(&mut self) {
        for track_id in TrackId::ALL {
            if self.tracks.get(track_id).repair_is_empty() {
                self.promote(track_id);
            } else {
                self.backfill_staged(track_id);
            }
        }
    }

    /// Number of occupied repair slots.
    #[must_use]
    pub fn repairs_in_progress(&self) -> usize {
        self.tracks
            .iter()
            .filter(|track| !track.repair_is_empty())
            .count()
    }

    /// Invariant check used by tests and the QA harness: no roster train
    /// occupies more than one location bucket. Zero buckets is legal only
    /// between exit and re-entry, while the train is out in service.
    #[must_use]
    pub fn occupancy_is_consistent(&self) -> bool {
        self.roster.iter().all(|id| {
            let mut buckets = 0usize;
            for track in self.tracks.iter() {
                buckets += usize::from(track.repair_occupant() == Some(id));
                buckets += usize::from(track.staged_occupant() == Some(id));
            }
            buckets += self.waiting.iter().filter(|w| *w == id).count();
            buckets += self.reentry.iter().filter(|r| *r == id).count();
            buckets <= 1
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<TrainId> {
        (1..=n).map(|i| TrainId::new(&format!("TS-{i:02}"))).collect()
    }

    fn seeded_state(n: usize) -> YardState {
        let mut state = YardState::default();
        for id in ids(n) {
            state.upsert_train(TrainRecord::new(id, 20.0));
        }
        let roster = state.roster.clone();
        state.place_initial(&roster);
        state
    }

    #[test]
    fn initial_placement_fills_repair_then_staged_then_queue() {
        let state = seeded_state(10);
        for (i, track_id) in TrackId::ALL.iter().enumerate() {
            let track = state.tracks.get(*track_id);
            assert_eq!(
                track.repair_occupant(),
                Some(&TrainId::new(&format!("TS-{:02}", i + 1)))
            );
            assert_eq!(
                track.staged_occupant(),
                Some(&TrainId::new(&format!("TS-{:02}", i + 5)))
            );
        }
        let queued: Vec<&str> = state.waiting.iter().map(TrainId::as_str).collect();
        assert_eq!(queued, ["TS-09", "TS-10"]);
        assert!(state.occupancy_is_consistent());
    }

    #[test]
    fn short_roster_leaves_later_slots_empty() {
        let state = seeded_state(3);
        assert!(state.tracks.get(TrackId::ALL[3]).repair_is_empty());
        assert!(state.tracks.get(TrackId::ALL[0]).staged_is_empty());
        assert!(state.waiting.is_empty());
    }

    #[test]
    fn promote_moves_staged_and_backfills_from_queue() {
        let mut state = seeded_state(10);
        let track = TrackId::ALL[0];
        state.release(track);

        let after = state.tracks.get(track);
        assert_eq!(after.repair_occupant(), Some(&TrainId::new("TS-05")));
        assert_eq!(after.staged_occupant(), Some(&TrainId::new("TS-09")));
        assert_eq!(state.waiting.front(), Some(&TrainId::new("TS-10")));
    }

    #[test]
    fn promote_is_a_no_op_when_repair_is_occupied() {
        let mut state = seeded_state(10);
        let track = TrackId::ALL[1];
        assert!(!state.promote(track));
        assert_eq!(
            state.tracks.get(track).repair_occupant(),
            Some(&TrainId::new("TS-02"))
        );
    }

    #[test]
    fn enqueue_rejects_tracked_trains() {
        let mut state = seeded_state(10);
        assert!(!state.enqueue(TrainId::new("TS-01")));
        assert!(!state.enqueue(TrainId::new("TS-09")));
        state.upsert_train(TrainRecord::new(TrainId::new("TS-11"), 30.0));
        assert!(state.enqueue(TrainId::new("TS-11")));
        assert_eq!(state.waiting.back(), Some(&TrainId::new("TS-11")));
    }

    #[test]
    fn locate_reports_each_bucket() {
        let mut state = seeded_state(10);
        assert_eq!(
            state.locate(&TrainId::new("TS-01")),
            Some(Location::Repair(TrackId::ALL[0]))
        );
        assert_eq!(
            state.locate(&TrainId::new("TS-06")),
            Some(Location::Staged(TrackId::ALL[1]))
        );
        assert_eq!(state.locate(&TrainId::new("TS-09")), Some(Location::Waiting));
        assert_eq!(state.locate(&TrainId::new("TS-99")), None);

        state.upsert_train(TrainRecord::new(TrainId::new("TS-12"), 0.0));
        state.reentry.push(TrainId::new("TS-12"));
        assert_eq!(state.locate(&TrainId::new("TS-12")), Some(Location::ReEntry));
    }
}
