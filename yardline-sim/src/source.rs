//! The backend collaborator contract and its embedded implementation.
//!
//! The simulation consumes two read-only sequences: per-train status
//! records and induction recommendations. Platform hosts provide these
//! however they like (the web crate polls HTTP); the embedded provider
//! here serves them straight from the bundled fleet log so the demo runs
//! with no backend at all.

use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::advisor::{
    FleetLog, FleetSnapshot, consequence_if_skipped, fitness_status, next_service_due,
    recommendation_reason,
};
use crate::constants::MINOR_THRESHOLD_DAYS;
use crate::train::{HealthTier, TrainId};

const DEFAULT_FLEET_LOG: &str = include_str!("../data/fleet_log.json");

static SHARED: OnceCell<EmbeddedFleetProvider> = OnceCell::new();

/// Per-train status as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub train_id: TrainId,
    #[serde(default)]
    pub yard_position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run_date: Option<NaiveDate>,
    pub next_service_due_date: NaiveDate,
    pub next_service_due_mileage: i64,
    pub days_until_next_service: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage_remaining: Option<i64>,
    pub fitness_status: HealthTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_validity: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_fitness_expiry: Option<i64>,
    #[serde(default)]
    pub job_card_status: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub consequence_if_skipped: String,
}

impl StatusRecord {
    /// Countdown seed for the simulation's fitness clock, reconciled with
    /// the reported tier so the local days↔tier invariant holds from the
    /// first tick.
    #[must_use]
    pub fn days_remaining(&self) -> f32 {
        match self.fitness_status {
            HealthTier::Critical => 0.0,
            HealthTier::Minor => {
                let days = self
                    .days_until_fitness_expiry
                    .filter(|d| *d > 0)
                    .unwrap_or(self.days_until_next_service);
                (days as f32).clamp(1.0, MINOR_THRESHOLD_DAYS)
            }
            HealthTier::Healthy => self.days_until_next_service.max(0) as f32,
        }
    }
}

/// One induction recommendation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub train_id: TrainId,
    pub reason: String,
    pub consequence_if_skipped: String,
    pub fitness_status: HealthTier,
}

/// Trait for abstracting the scoring backend.
/// Platform-specific implementations should provide this.
pub trait StatusProvider {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the current per-train status sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or parsed.
    fn fetch_status(&self) -> Result<Vec<StatusRecord>, Self::Error>;

    /// Fetch the current recommendation sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or parsed.
    fn fetch_recommendations(&self) -> Result<Vec<Recommendation>, Self::Error>;
}

/// Backend stub computing status and recommendations from a fleet log via
/// the advisor rules. The bundled log keeps the demo self-contained.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedFleetProvider {
    log: FleetLog,
}

impl EmbeddedFleetProvider {
    /// Wrap an already-parsed fleet log.
    #[must_use]
    pub const fn from_log(log: FleetLog) -> Self {
        Self { log }
    }

    /// Parse the bundled fleet log. A malformed bundle degrades to an
    /// empty provider rather than failing the host.
    #[must_use]
    pub fn load_from_static() -> Self {
        match FleetLog::from_json(DEFAULT_FLEET_LOG) {
            Ok(log) => Self::from_log(log),
            Err(err) => {
                log::warn!("bundled fleet log is invalid: {err}");
                Self::default()
            }
        }
    }

    /// Process-wide shared instance of the bundled provider.
    pub fn shared() -> &'static Self {
        SHARED.get_or_init(Self::load_from_static)
    }

    #[must_use]
    pub const fn log(&self) -> &FleetLog {
        &self.log
    }

    /// "Today" for all date math: the newest log date, keeping results
    /// independent of the wall clock.
    fn today(&self) -> NaiveDate {
        self.log.latest_date().unwrap_or_default()
    }

    fn status_record(snapshot: &FleetSnapshot, today: NaiveDate) -> StatusRecord {
        let (due_date, due_mileage) =
            next_service_due(snapshot.last_cleaned, snapshot.mileage_km, today);
        let tier = fitness_status(snapshot.fitness_validity, &snapshot.job_card_status, today);
        StatusRecord {
            train_id: snapshot.train_id.clone(),
            yard_position: snapshot.yard_position.clone(),
            last_run_date: Some(snapshot.date),
            next_service_due_date: due_date,
            next_service_due_mileage: due_mileage,
            days_until_next_service: (due_date - today).num_days(),
            mileage_remaining: Some(due_mileage - snapshot.mileage_km as i64),
            fitness_status: tier,
            fitness_validity: snapshot.fitness_validity,
            days_until_fitness_expiry: snapshot
                .fitness_validity
                .map(|validity| (validity - today).num_days()),
            job_card_status: snapshot.job_card_status.clone(),
            status: snapshot.train_status.clone(),
            consequence_if_skipped: consequence_if_skipped(tier).to_string(),
        }
    }
}

impl StatusProvider for EmbeddedFleetProvider {
    type Error = Infallible;

    fn fetch_status(&self) -> Result<Vec<StatusRecord>, Self::Error> {
        let today = self.today();
        Ok(self
            .log
            .latest_snapshot()
            .iter()
            .map(|snapshot| Self::status_record(snapshot, today))
            .collect())
    }

    fn fetch_recommendations(&self) -> Result<Vec<Recommendation>, Self::Error> {
        let today = self.today();
        let mut recommendations: Vec<Recommendation> = self
            .log
            .latest_snapshot()
            .iter()
            .map(|snapshot| {
                let tier =
                    fitness_status(snapshot.fitness_validity, &snapshot.job_card_status, today);
                Recommendation {
                    train_id: snapshot.train_id.clone(),
                    reason: recommendation_reason(snapshot, today).to_string(),
                    consequence_if_skipped: consequence_if_skipped(tier).to_string(),
                    fitness_status: tier,
                }
            })
            .collect();
        // Critical first, Healthy last; stable within a tier.
        recommendations.sort_by_key(|rec| rec.fitness_status.urgency());
        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_fleet_log_parses() {
        let provider = EmbeddedFleetProvider::load_from_static();
        assert!(!provider.log().rows.is_empty());
        let status = provider.fetch_status().unwrap();
        assert_eq!(status.len(), 10);
    }

    #[test]
    fn status_records_cover_each_train_once() {
        let provider = EmbeddedFleetProvider::shared();
        let status = provider.fetch_status().unwrap();
        let mut ids: Vec<&str> = status.iter().map(|r| r.train_id.as_str()).collect();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn recommendations_are_urgency_ordered() {
        let provider = EmbeddedFleetProvider::shared();
        let recommendations = provider.fetch_recommendations().unwrap();
        let urgencies: Vec<u8> = recommendations
            .iter()
            .map(|rec| rec.fitness_status.urgency())
            .collect();
        let mut sorted = urgencies.clone();
        sorted.sort_unstable();
        assert_eq!(urgencies, sorted);
        assert!(
            recommendations
                .first()
                .is_some_and(|rec| rec.fitness_status == HealthTier::Critical)
        );
    }

    #[test]
    fn days_remaining_matches_reported_tier() {
        let provider = EmbeddedFleetProvider::shared();
        for record in provider.fetch_status().unwrap() {
            let days = record.days_remaining();
            match record.fitness_status {
                HealthTier::Critical => assert!(days <= 0.0),
                HealthTier::Minor => assert!(days > 0.0 && days <= MINOR_THRESHOLD_DAYS),
                HealthTier::Healthy => assert!(days >= 0.0),
            }
        }
    }
}
