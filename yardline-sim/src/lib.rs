//! Yardline Depot Engine
//!
//! Platform-agnostic core for the Yardline fleet-maintenance demo. This
//! crate owns the depot simulation (fitness clocks, slot allocation,
//! healing progression, re-entry) and the rule-based fleet advisor,
//! without UI or platform-specific dependencies.

pub mod advisor;
pub mod clock;
pub mod constants;
pub mod healing;
pub mod reentry;
pub mod scheduler;
pub mod sim;
pub mod snapshot;
pub mod source;
pub mod synthetic;
pub mod tracks;
pub mod train;
pub mod yard;

// Re-export commonly used types
pub use advisor::{
    AdvisorError, FleetLog, FleetLogRow, FleetSnapshot, RankedTrain, RecommendedAction,
    TrainOverride, apply_overrides, consequence_if_skipped, fitness_status, score_and_rank,
};
pub use clock::SimNow;
pub use healing::{CycleState, HealingBoard, HealingEntry};
pub use scheduler::{Scheduler, TimerKind};
pub use sim::{SimTuning, YardSim};
pub use snapshot::{Location, SimEvent, TrackView, TrainView, YardSnapshot};
pub use source::{EmbeddedFleetProvider, Recommendation, StatusProvider, StatusRecord};
pub use synthetic::{SyntheticFleetCfg, generate_fleet_log};
pub use tracks::{Track, TrackId, TrackSet};
pub use train::{HealthTier, TrainId, TrainRecord};
pub use yard::YardState;

use anyhow::Context;

/// Engine binding a status provider to a running simulation, with the
/// stale-but-available fallback the demo favors over hard errors.
pub struct DepotEngine<P>
where
    P: StatusProvider,
{
    provider: P,
    sim: YardSim,
    last_status: Vec<StatusRecord>,
    last_recommendations: Vec<Recommendation>,
}

impl<P> DepotEngine<P>
where
    P: StatusProvider,
{
    /// Create an engine over the given provider.
    #[must_use]
    pub fn new(provider: P, tuning: SimTuning) -> Self {
        Self {
            provider,
            sim: YardSim::new(tuning),
            last_status: Vec::new(),
            last_recommendations: Vec::new(),
        }
    }

    /// First load: fetch, remember, and place the fleet.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial fetch fails; unlike later polls,
    /// there is no stale data to fall back on yet.
    pub fn bootstrap(&mut self) -> anyhow::Result<()> {
        let status = self
            .provider
            .fetch_status()
            .map_err(anyhow::Error::new)
            .context("initial status fetch failed")?;
        let recommendations = self
            .provider
            .fetch_recommendations()
            .map_err(anyhow::Error::new)
            .context("initial recommendation fetch failed")?;
        self.last_status = status;
        self.last_recommendations = recommendations;
        self.sim.refresh(&self.last_status, &self.last_recommendations);
        Ok(())
    }

    /// Poll the provider and merge. A failed fetch logs a warning and
    /// reuses the last-known sequences; it is never surfaced as an error.
    pub fn refresh(&mut self) {
        match self.provider.fetch_status() {
            Ok(status) => self.last_status = status,
            Err(err) => log::warn!("status fetch failed, reusing last data: {err}"),
        }
        match self.provider.fetch_recommendations() {
            Ok(recommendations) => self.last_recommendations = recommendations,
            Err(err) => log::warn!("recommendation fetch failed, reusing last data: {err}"),
        }
        self.sim.refresh(&self.last_status, &self.last_recommendations);
    }

    #[must_use]
    pub const fn sim(&self) -> &YardSim {
        &self.sim
    }

    pub const fn sim_mut(&mut self) -> &mut YardSim {
        &mut self.sim
    }

    #[must_use]
    pub fn last_status(&self) -> &[StatusRecord] {
        &self.last_status
    }

    #[must_use]
    pub fn last_recommendations(&self) -> &[Recommendation] {
        &self.last_recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fmt;

    /// Provider that can be flipped into a failing state.
    struct FlakyProvider {
        inner: EmbeddedFleetProvider,
        fail: Cell<bool>,
    }

    #[derive(Debug)]
    struct FetchDown;

    impl fmt::Display for FetchDown {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("backend unreachable")
        }
    }

    impl std::error::Error for FetchDown {}

    impl StatusProvider for FlakyProvider {
        type Error = FetchDown;

        fn fetch_status(&self) -> Result<Vec<StatusRecord>, Self::Error> {
            if self.fail.get() {
                return Err(FetchDown);
            }
            Ok(self.inner.fetch_status().unwrap_or_default())
        }

        fn fetch_recommendations(&self) -> Result<Vec<Recommendation>, Self::Error> {
            if self.fail.get() {
                return Err(FetchDown);
            }
            Ok(self.inner.fetch_recommendations().unwrap_or_default())
        }
    }

    #[test]
    fn bootstrap_places_the_fleet() {
        let provider = FlakyProvider {
            inner: EmbeddedFleetProvider::load_from_static(),
            fail: Cell::new(false),
        };
        let mut engine = DepotEngine::new(provider, SimTuning::default());
        engine.bootstrap().expect("bootstrap succeeds");
        assert_eq!(engine.sim().state().repairs_in_progress(), 4);
        assert_eq!(engine.last_status().len(), 10);
    }

    #[test]
    fn bootstrap_propagates_initial_failure() {
        let provider = FlakyProvider {
            inner: EmbeddedFleetProvider::load_from_static(),
            fail: Cell::new(true),
        };
        let mut engine = DepotEngine::new(provider, SimTuning::default());
        assert!(engine.bootstrap().is_err());
    }

    #[test]
    fn refresh_falls_back_to_stale_data() {
        let provider = FlakyProvider {
            inner: EmbeddedFleetProvider::load_from_static(),
            fail: Cell::new(false),
        };
        let mut engine = DepotEngine::new(provider, SimTuning::default());
        engine.bootstrap().expect("bootstrap succeeds");
        let before = engine.last_status().to_vec();

        engine.provider.fail.set(true);
        engine.refresh();
        assert_eq!(engine.last_status(), before.as_slice());
        assert_eq!(engine.sim().state().roster.len(), 10);
    }
}
