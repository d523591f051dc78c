//! Simulated maintenance: healing entries and the round-robin cycle.
//!
//! A healing cycle visits tracks strictly 1→4. Visiting a track starts a
//! healing entry for its repair occupant when one is due; the cycle then
//! waits that track's configured delay before moving on, so starts are
//! staggered rather than simultaneous. Only one cycle runs at a time.

use serde::{Deserialize, Serialize};

use crate::clock::SimNow;
use crate::constants::TRACK_COUNT;
use crate::sim::SimTuning;
use crate::snapshot::SimEvent;
use crate::tracks::TrackId;
use crate::train::{HealthTier, TrainId};
use crate::yard::YardState;

/// Ephemeral record of an in-progress simulated repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealingEntry {
    pub train: TrainId,
    pub track: TrackId,
    pub started_at: SimNow,
    pub duration_ms: u64,
}

impl HealingEntry {
    /// Completion fraction in `0.0..=1.0` at the given instant.
    #[must_use]
    pub fn progress(&self, now: SimNow) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now.since(self.started_at) as f32;
        (elapsed / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_complete(&self, now: SimNow) -> bool {
        now.since(self.started_at) >= self.duration_ms
    }
}

/// At most one healing entry per track, indexed by track id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealingBoard([Option<HealingEntry>; TRACK_COUNT]);

impl HealingBoard {
    #[must_use]
    pub const fn entry(&self, track: TrackId) -> Option<&HealingEntry> {
        self.0[track.index()].as_ref()
    }

    /// Whether any track is healing the given train.
    #[must_use]
    pub fn entry_for_train(&self, train: &TrainId) -> Option<&HealingEntry> {
        self.0
            .iter()
            .flatten()
            .find(|entry| &entry.train == train)
    }

    /// Install an entry, refusing when the track already has one.
    pub fn start(&mut self, entry: HealingEntry) -> bool {
        let slot = &mut self.0[entry.track.index()];
        if let Some(current) = slot {
            log::debug!(
                "{}: healing entry already active for {}, ignoring {}",
                entry.track,
                current.train,
                entry.train
            );
            return false;
        }
        *slot = Some(entry);
        true
    }

    /// Remove and return the entry for a track.
    pub fn clear(&mut self, track: TrackId) -> Option<HealingEntry> {
        self.0[track.index()].take()
    }

    /// Active entries in ascending track order.
    pub fn iter(&self) -> impl Iterator<Item = &HealingEntry> {
        self.0.iter().flatten()
    }
}

/// Where the round-robin cycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum CycleState {
    /// No cycle in progress; the next trigger may start one.
    #[default]
    Idle,
    /// Mid-cycle: `next_track` is visited once `due` passes. A value past
    /// the last track means the trailing delay is draining before idle.
    Waiting { next_track: u8, due: SimNow },
}

impl CycleState {
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Healing duration for a tier, `None` when no repair is warranted.
#[must_use]
pub fn heal_duration_ms(tier: HealthTier, tuning: &SimTuning) -> Option<u64> {
    match tier {
        HealthTier::Critical => Some(tuning.heal_critical_ms),
        HealthTier::Minor => Some(tuning.heal_minor_ms),
        HealthTier::Healthy => None,
    }
}

/// Begin a new cycle if none is in progress: visit track 1 immediately and
/// schedule the rest. Returns false when a cycle was already running.
pub fn trigger_cycle(state: &mut YardState, tuning: &SimTuning, now: SimNow) -> bool {
    if !state.cycle.is_idle() {
        return false;
    }
    let first = TrackId::ALL[0];
    visit_track(state, tuning, now, first);
    state.cycle = CycleState::Waiting {
        next_track: 2,
        due: now.plus_millis(tuning.track_visit_delays_ms[first.index()]),
    };
    true
}

/// Advance any due track visits. Called from the fast polls so the cycle
/// marches through tracks 2..=4 as their stagger delays elapse.
pub fn advance_cycle(state: &mut YardState, tuning: &SimTuning, now: SimNow) {
    while let CycleState::Waiting { next_track, due } = state.cycle {
        if !now.has_reached(due) {
            return;
        }
        match TrackId::new(next_track) {
            Some(track) => {
                visit_track(state, tuning, due, track);
                state.cycle = CycleState::Waiting {
                    next_track: next_track + 1,
                    due: due.plus_millis(tuning.track_visit_delays_ms[track.index()]),
                };
            }
            None => {
                state.cycle = CycleState::Idle;
            }
        }
    }
}

/// Visit one track: start a healing entry when the repair occupant needs
/// one. Healthy occupants and occupied boards are skipped.
fn visit_track(state: &mut YardState, tuning: &SimTuning, now: SimNow, track: TrackId) {
    let Some(occupant) = state.tracks.get(track).repair_occupant().cloned() else {
        return;
    };
    if state.healing.entry(track).is_some() {
        return;
    }
    let Some(record) = state.train(&occupant) else {
        log::debug!("{track}: repair occupant {occupant} has no record, skipping visit");
        return;
    };
    if record.is_exiting() {
        return;
    }
    let Some(duration_ms) = heal_duration_ms(record.tier, tuning) else {
        return;
    };
    state.healing.start(HealingEntry {
        train: occupant.clone(),
        track,
        started_at: now,
        duration_ms,
    });
    state.push_event(SimEvent::HealingStarted {
        id: occupant,
        track,
        duration_ms,
    });
}

/// Complete any entries whose duration has elapsed: force the occupant
/// Healthy, restart its countdown, stamp the scheduled exit, and drop the
/// entry. The repair slot stays occupied until the exit timestamp passes.
pub fn complete_due_entries(state: &mut YardState, tuning: &SimTuning, now: SimNow) {
    for track in TrackId::ALL {
        let Some(entry) = state.healing.entry(track) else {
            continue;
        };
        if !entry.is_complete(now) {
            continue;
        }
        let train_id = entry.train.clone();
        state.healing.clear(track);
        if let Some(record) = state.train_mut(&train_id) {
            record.reset_after_service(tuning.post_repair_reset_days);
            record.scheduled_exit = Some(now.plus_millis(tuning.exit_delay_ms));
        }
        state.push_event(SimEvent::HealingCompleted {
            id: train_id,
            track,
        });
    }
}

/// Release repair occupants whose scheduled exit has passed, restarting
/// their fitness clocks by way of the countdown already reset at
/// completion. Promotion fires immediately on release.
pub fn process_exits(state: &mut YardState, now: SimNow) {
    for track in TrackId::ALL {
        let Some(occupant) = state.tracks.get(track).repair_occupant().cloned() else {
            continue;
        };
        let due = state
            .train(&occupant)
            .and_then(|record| record.scheduled_exit)
            .is_some_and(|exit_at| now.has_reached(exit_at));
        if !due {
            continue;
        }
        if let Some(record) = state.train_mut(&occupant) {
            record.scheduled_exit = None;
            record.cycles += 1;
        }
        state.release(track);
        state.push_event(SimEvent::Exited {
            id: occupant,
            track,
        });
    }
}
