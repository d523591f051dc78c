//! The simulation facade: one object owning all yard state, mutated only
//! through explicit-time timer entrypoints.
//!
//! Hosts wire four recurring timers to [`YardSim::tick_clock`],
//! [`YardSim::trigger_cycle`], [`YardSim::poll_movement`], and
//! [`YardSim::poll_progress`]. The browser uses real intervals; tests and
//! the headless tester use the deterministic scheduler.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::clock::SimNow;
use crate::constants::{
    CLOCK_TICK_MS, CYCLE_TRIGGER_MS, DAYS_PER_REAL_SECOND, EXIT_DELAY_MS,
    HEAL_DURATION_CRITICAL_MS, HEAL_DURATION_MINOR_MS, MOVEMENT_POLL_MS, POST_REPAIR_RESET_DAYS,
    PROGRESS_POLL_MS, STATUS_POLL_MS, TRACK_COUNT, TRACK_VISIT_DELAYS_MS,
};
use crate::healing;
use crate::reentry;
use crate::snapshot::{Location, SimEvent, TrackView, TrainView, YardSnapshot};
use crate::source::{Recommendation, StatusRecord};
use crate::tracks::TrackId;
use crate::train::{TrainId, TrainRecord};
use crate::yard::YardState;

/// Fixed simulation tuning. Defaults mirror the compiled-in constants;
/// tests shorten the durations to keep scenarios fast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimTuning {
    pub clock_tick_ms: u64,
    pub cycle_trigger_ms: u64,
    pub movement_poll_ms: u64,
    pub progress_poll_ms: u64,
    pub status_poll_ms: u64,
    pub days_per_real_second: f32,
    pub post_repair_reset_days: f32,
    pub track_visit_delays_ms: [u64; TRACK_COUNT],
    pub heal_critical_ms: u64,
    pub heal_minor_ms: u64,
    pub exit_delay_ms: u64,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            clock_tick_ms: CLOCK_TICK_MS,
            cycle_trigger_ms: CYCLE_TRIGGER_MS,
            movement_poll_ms: MOVEMENT_POLL_MS,
            progress_poll_ms: PROGRESS_POLL_MS,
            status_poll_ms: STATUS_POLL_MS,
            days_per_real_second: DAYS_PER_REAL_SECOND,
            post_repair_reset_days: POST_REPAIR_RESET_DAYS,
            track_visit_delays_ms: TRACK_VISIT_DELAYS_MS,
            heal_critical_ms: HEAL_DURATION_CRITICAL_MS,
            heal_minor_ms: HEAL_DURATION_MINOR_MS,
            exit_delay_ms: EXIT_DELAY_MS,
        }
    }
}

/// The depot simulation.
#[derive(Debug, Clone, Default)]
pub struct YardSim {
    state: YardState,
    tuning: SimTuning,
    last_tick: Option<SimNow>,
    placed: bool,
}

impl YardSim {
    #[must_use]
    pub fn new(tuning: SimTuning) -> Self {
        Self {
            state: YardState::default(),
            tuning,
            last_tick: None,
            placed: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &YardState {
        &self.state
    }

    pub const fn state_mut(&mut self) -> &mut YardState {
        &mut self.state
    }

    #[must_use]
    pub const fn tuning(&self) -> &SimTuning {
        &self.tuning
    }

    /// Merge backend data into the yard.
    ///
    /// The first refresh performs initial placement; later refreshes
    /// enqueue newcomers at the waiting-queue tail. Trains currently
    /// healing or pending exit keep their local tier, countdown, and note;
    /// only passthrough fields are updated for them.
    pub fn refresh(&mut self, status: &[StatusRecord], recommendations: &[Recommendation]) {
        let reasons: HashMap<&TrainId, &str> = recommendations
            .iter()
            .map(|rec| (&rec.train_id, rec.reason.as_str()))
            .collect();

        let mut newcomers: Vec<TrainId> = Vec::new();
        let mut flips: Vec<SimEvent> = Vec::new();
        for record in status {
            let id = record.train_id.clone();
            let note = reasons
                .get(&id)
                .map_or_else(|| record.consequence_if_skipped.clone(), ToString::to_string);
            let locally_overridden = self.state.healing.entry_for_train(&id).is_some()
                || self.state.train(&id).is_some_and(TrainRecord::is_exiting);

            if let Some(train) = self.state.train_mut(&id) {
                train.yard_position = record.yard_position.clone();
                train.job_card_status = record.job_card_status.clone();
                if !locally_overridden {
                    train.days_to_service = record.days_remaining();
                    train.note = note;
                    if let Some(previous) = train.retier() {
                        flips.push(SimEvent::TierChanged {
                            id: id.clone(),
                            from: previous,
                            to: train.tier,
                        });
                    }
                }
            } else {
                let mut train = TrainRecord::new(id.clone(), record.days_remaining());
                train.note = note;
                train.yard_position = record.yard_position.clone();
                train.job_card_status = record.job_card_status.clone();
                self.state.upsert_train(train);
                newcomers.push(id);
            }
        }
        for event in flips {
            self.state.push_event(event);
        }

        if self.placed {
            for id in newcomers {
                self.state.enqueue(id);
            }
        } else if !newcomers.is_empty() {
            let roster = self.state.roster.clone();
            self.state.place_initial(&roster);
            self.placed = true;
        }
    }

    /// Fitness clock tick: advance every train that is neither in a
    /// repair slot nor under an active healing entry, then queue expired
    /// trains for re-entry.
    pub fn tick_clock(&mut self, now: SimNow) {
        let Some(last) = self.last_tick.replace(now) else {
            return;
        };
        let elapsed = now.since(last);
        if elapsed == 0 {
            return;
        }
        let days_per_second = self.tuning.days_per_real_second;
        let roster = self.state.roster.clone();
        for id in roster {
            let paused = self
                .state
                .tracks
                .iter()
                .any(|track| track.repair_occupant() == Some(&id))
                || self.state.healing.entry_for_train(&id).is_some();
            if paused {
                continue;
            }
            let mut flip = None;
            let mut expired = false;
            if let Some(train) = self.state.train_mut(&id) {
                if let Some(previous) = train.advance_days(elapsed, days_per_second) {
                    flip = Some((previous, train.tier));
                }
                expired = train.is_expired();
            }
            if let Some((from, to)) = flip {
                self.state.push_event(SimEvent::TierChanged {
                    id: id.clone(),
                    from,
                    to,
                });
            }
            if expired {
                reentry::mark_expired(&mut self.state, &id);
            }
        }
    }

    /// Healing-cycle trigger: start a new round-robin sweep when idle.
    pub fn trigger_cycle(&mut self, now: SimNow) {
        healing::advance_cycle(&mut self.state, &self.tuning, now);
        healing::trigger_cycle(&mut self.state, &self.tuning, now);
    }

    /// Movement check: finish exits, drain re-entries, and keep slots fed.
    pub fn poll_movement(&mut self, now: SimNow) {
        healing::advance_cycle(&mut self.state, &self.tuning, now);
        healing::process_exits(&mut self.state, now);
        reentry::drain(&mut self.state);
        self.state.sweep_promotions();
    }

    /// Healing-progress poll: advance due visits and complete entries.
    pub fn poll_progress(&mut self, now: SimNow) {
        healing::advance_cycle(&mut self.state, &self.tuning, now);
        healing::complete_due_entries(&mut self.state, &self.tuning, now);
    }

    /// Immutable presentation snapshot at the given instant.
    #[must_use]
    pub fn snapshot(&self, now: SimNow) -> YardSnapshot {
        let trains = self
            .state
            .roster
            .iter()
            .filter_map(|id| {
                let record = self.state.train(id)?;
                Some(TrainView {
                    id: id.clone(),
                    tier: record.tier,
                    days_to_service: record.days_to_service,
                    location: self.state.locate(id).unwrap_or(Location::InService),
                    cycles: record.cycles,
                    healing_progress: self
                        .state
                        .healing
                        .entry_for_train(id)
                        .map(|entry| entry.progress(now)),
                    exiting: record.is_exiting(),
                    note: record.note.clone(),
                })
            })
            .collect();

        let tracks = TrackId::ALL
            .iter()
            .map(|track_id| {
                let track = self.state.tracks.get(*track_id);
                TrackView {
                    id: *track_id,
                    repair: track.repair_occupant().cloned(),
                    staged: track.staged_occupant().cloned(),
                    healing_progress: self
                        .state
                        .healing
                        .entry(*track_id)
                        .map(|entry| entry.progress(now)),
                    exiting: track
                        .repair_occupant()
                        .and_then(|id| self.state.train(id))
                        .is_some_and(TrainRecord::is_exiting),
                }
            })
            .collect();

        YardSnapshot {
            trains,
            tracks,
            waiting: self.state.waiting.iter().cloned().collect(),
        }
    }

    /// Drain accumulated events for the presentation layer.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        self.state.take_events()
    }
}
