//! Train records and the per-train fitness countdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::clock::SimNow;
use crate::constants::{MINOR_THRESHOLD_DAYS, POST_REPAIR_NOTE};

/// Unique train identifier as reported by the fleet backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainId(pub String);

impl TrainId {
    /// Construct an id from a string slice, trimming whitespace.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrainId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Coarse health classification derived from remaining service days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HealthTier {
    #[default]
    Healthy,
    Minor,
    Critical,
}

impl HealthTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Minor => "Minor",
            Self::Critical => "Critical",
        }
    }

    /// Derive a tier from remaining days using the fixed thresholds.
    #[must_use]
    pub fn from_days(days: f32) -> Self {
        if days <= 0.0 {
            Self::Critical
        } else if days <= MINOR_THRESHOLD_DAYS {
            Self::Minor
        } else {
            Self::Healthy
        }
    }

    /// Ordering key for urgency sorts: Critical first, Healthy last.
    #[must_use]
    pub const fn urgency(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Minor => 1,
            Self::Healthy => 2,
        }
    }
}

impl fmt::Display for HealthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthTier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Healthy" => Ok(Self::Healthy),
            "Minor" => Ok(Self::Minor),
            "Critical" => Ok(Self::Critical),
            _ => Err(()),
        }
    }
}

/// Mutable per-train record owned by the simulation.
///
/// Refreshed from the backend on each poll, but tier/days/note are locally
/// overridden while the train is healing or pending exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRecord {
    pub id: TrainId,
    pub tier: HealthTier,
    /// Remaining days until the next service is due. Never negative.
    pub days_to_service: f32,
    /// Opaque advisory note from the backend (reason / consequence text).
    #[serde(default)]
    pub note: String,
    /// Set once healing completes; the train keeps its repair slot until
    /// this timestamp passes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_exit: Option<SimNow>,
    /// Completed maintenance cycles in this session.
    #[serde(default)]
    pub cycles: u32,
    /// Passthrough fields for the presentation layer.
    #[serde(default)]
    pub yard_position: String,
    #[serde(default)]
    pub job_card_status: String,
}

impl TrainRecord {
    /// Construct a record with the tier derived from the provided days.
    #[must_use]
    pub fn new(id: TrainId, days_to_service: f32) -> Self {
        let days = days_to_service.max(0.0);
        Self {
            id,
            tier: HealthTier::from_days(days),
            days_to_service: days,
            note: String::new(),
            scheduled_exit: None,
            cycles: 0,
            yard_position: String::new(),
            job_card_status: String::new(),
        }
    }

    /// Advance the fitness countdown by `elapsed_ms` of real time at the
    /// given compression ratio. Clamps at zero and recomputes the tier,
    /// returning the previous tier when it changed.
    pub fn advance_days(&mut self, elapsed_ms: u64, days_per_second: f32) -> Option<HealthTier> {
        if elapsed_ms == 0 {
            return None;
        }
        let elapsed_days = (elapsed_ms as f32 / 1_000.0) * days_per_second;
        self.days_to_service = (self.days_to_service - elapsed_days).max(0.0);
        self.retier()
    }

    /// Recompute the tier from the current days, returning the previous
    /// tier when it changed.
    pub fn retier(&mut self) -> Option<HealthTier> {
        let next = HealthTier::from_days(self.days_to_service);
        if next == self.tier {
            return None;
        }
        let previous = self.tier;
        self.tier = next;
        Some(previous)
    }

    /// Reset the record after completed maintenance: Healthy tier, fresh
    /// countdown, post-repair note. The caller stamps the scheduled exit.
    pub fn reset_after_service(&mut self, days: f32) {
        self.tier = HealthTier::Healthy;
        self.days_to_service = days.max(0.0);
        self.note = POST_REPAIR_NOTE.to_string();
    }

    /// Whether the fitness countdown has fully expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.days_to_service <= 0.0
    }

    /// Whether the train has completed healing and awaits its exit slot.
    #[must_use]
    pub const fn is_exiting(&self) -> bool {
        self.scheduled_exit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds_match_contract() {
        assert_eq!(HealthTier::from_days(0.0), HealthTier::Critical);
        assert_eq!(HealthTier::from_days(5.0), HealthTier::Minor);
        assert_eq!(HealthTier::from_days(5.1), HealthTier::Healthy);
    }

    #[test]
    fn advance_clamps_at_zero_and_reports_flip() {
        let mut train = TrainRecord::new(TrainId::new("TS-01"), 1.0);
        assert_eq!(train.tier, HealthTier::Minor);

        // 1 day at 0.25 days/sec is 4 seconds of real time.
        let previous = train.advance_days(8_000, 0.25);
        assert_eq!(previous, Some(HealthTier::Minor));
        assert_eq!(train.tier, HealthTier::Critical);
        assert!(train.days_to_service.abs() <= f32::EPSILON);
        assert!(train.is_expired());
    }

    #[test]
    fn advance_without_elapsed_time_is_a_no_op() {
        let mut train = TrainRecord::new(TrainId::new("TS-02"), 12.0);
        assert!(train.advance_days(0, 0.25).is_none());
        assert!((train.days_to_service - 12.0).abs() <= f32::EPSILON);
    }

    #[test]
    fn reset_after_service_restores_healthy_state() {
        let mut train = TrainRecord::new(TrainId::new("TS-03"), 0.0);
        assert_eq!(train.tier, HealthTier::Critical);
        train.reset_after_service(40.0);
        assert_eq!(train.tier, HealthTier::Healthy);
        assert!((train.days_to_service - 40.0).abs() <= f32::EPSILON);
        assert_eq!(train.note, POST_REPAIR_NOTE);
    }

    #[test]
    fn tier_round_trips_through_strings() {
        for tier in [HealthTier::Healthy, HealthTier::Minor, HealthTier::Critical] {
            assert_eq!(tier.as_str().parse::<HealthTier>(), Ok(tier));
        }
        assert!("Unknown".parse::<HealthTier>().is_err());
    }
}
