//! Rule-based fleet advisor: status, scoring, and induction ranking.
//!
//! Works over a tabular fleet log (one row per train per day). The newest
//! log date stands in for "today" so the whole pipeline is deterministic;
//! the simulation never reads a wall clock.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::constants::{
    CLEANING_OVERDUE_DAYS, FITNESS_SCORE_WEIGHT, MILEAGE_SCORE_WEIGHT, MISSING_CLEAN_SENTINEL_DAYS,
    NEEDS_CLEANING_PENALTY, NEXT_SERVICE_INTERVAL_DAYS, NEXT_SERVICE_MILEAGE_KM,
    OPEN_JOB_CARD_PENALTY, UNIFORM_MILEAGE_SCORE, VALIDITY_MINOR_WINDOW_DAYS,
    VALIDITY_REASON_WINDOW_DAYS,
};
use crate::train::{HealthTier, TrainId};

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("fleet log parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fleet log is empty")]
    EmptyLog,
}

/// One fleet-log row: a single train observed on a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetLogRow {
    pub date: NaiveDate,
    pub train_id: TrainId,
    pub mileage_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_validity: Option<NaiveDate>,
    pub job_card_status: String,
    #[serde(default)]
    pub branding_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_cleaned: Option<NaiveDate>,
    #[serde(default)]
    pub yard_position: String,
    #[serde(default)]
    pub train_status: String,
}

/// The parsed multi-day fleet log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetLog {
    pub rows: Vec<FleetLogRow>,
}

impl FleetLog {
    /// Parse a fleet log from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or contains no rows.
    pub fn from_json(json_str: &str) -> Result<Self, AdvisorError> {
        let log: Self = serde_json::from_str(json_str)?;
        if log.rows.is_empty() {
            return Err(AdvisorError::EmptyLog);
        }
        Ok(log)
    }

    /// Newest observation date across the whole log.
    #[must_use]
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|row| row.date).max()
    }

    /// Collapse the log to one row per train: the newest observation plus
    /// windowed aggregates (30-day mileage delta, cleanliness age).
    #[must_use]
    pub fn latest_snapshot(&self) -> Vec<FleetSnapshot> {
        let Some(latest_date) = self.latest_date() else {
            return Vec::new();
        };
        let mut by_train: HashMap<&TrainId, Vec<&FleetLogRow>> = HashMap::new();
        for row in &self.rows {
            by_train.entry(&row.train_id).or_default().push(row);
        }

        let mut train_ids: Vec<&TrainId> = by_train.keys().copied().collect();
        train_ids.sort();

        let mut snapshots = Vec::with_capacity(train_ids.len());
        for train_id in train_ids {
            let rows = &by_train[train_id];
            let Some(last) = rows.iter().max_by_key(|row| row.date) else {
                continue;
            };
            let mileage_max = rows.iter().map(|r| r.mileage_km).fold(f64::MIN, f64::max);
            let mileage_min = rows.iter().map(|r| r.mileage_km).fold(f64::MAX, f64::min);
            let fitness_days_left = last
                .fitness_validity
                .map_or(0, |validity| (validity - latest_date).num_days());
            let days_since_clean = last.last_cleaned.map_or(MISSING_CLEAN_SENTINEL_DAYS, |cleaned| {
                (latest_date - cleaned).num_days()
            });
            snapshots.push(FleetSnapshot {
                train_id: last.train_id.clone(),
                date: last.date,
                mileage_km: last.mileage_km,
                mileage_30: mileage_max - mileage_min,
                fitness_validity: last.fitness_validity,
                fitness_days_left,
                last_cleaned: last.last_cleaned,
                job_card_status: last.job_card_status.clone(),
                job_card_open: job_card_is_open(&last.job_card_status),
                branding_boost: last.branding_active,
                days_since_clean,
                needs_cleaning: days_since_clean > CLEANING_OVERDUE_DAYS,
                yard_position: last.yard_position.clone(),
                train_status: last.train_status.clone(),
            });
        }
        snapshots
    }
}

/// Per-train state reduced from the log, ready for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub train_id: TrainId,
    pub date: NaiveDate,
    pub mileage_km: f64,
    /// Mileage accumulated over the log window.
    pub mileage_30: f64,
    pub fitness_validity: Option<NaiveDate>,
    pub fitness_days_left: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_cleaned: Option<NaiveDate>,
    pub job_card_status: String,
    pub job_card_open: bool,
    pub branding_boost: bool,
    pub days_since_clean: i64,
    pub needs_cleaning: bool,
    pub yard_position: String,
    pub train_status: String,
}

/// Recommended disposition for the next induction window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendedAction {
    Service,
    Maintenance,
    Standby,
}

impl RecommendedAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Service => "Service",
            Self::Maintenance => "Maintenance",
            Self::Standby => "Standby",
        }
    }
}

/// A scored snapshot, ordered best-first by `score_and_rank`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTrain {
    pub snapshot: FleetSnapshot,
    pub fitness_score: f64,
    pub mileage_score: f64,
    pub composite_score: f64,
    pub action: RecommendedAction,
}

/// Targeted manual corrections applied to a snapshot before scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_card_status: Option<String>,
    #[serde(default)]
    pub mark_cleaned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_validity: Option<NaiveDate>,
}

fn job_card_is_open(status: &str) -> bool {
    status.to_ascii_lowercase().contains("open")
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.to_ascii_lowercase().starts_with(prefix)
}

/// Coarse fitness classification for a train.
///
/// A missing validity date is treated as lapsing today, which lands the
/// train in Critical.
#[must_use]
pub fn fitness_status(
    fitness_validity: Option<NaiveDate>,
    job_card_status: &str,
    today: NaiveDate,
) -> HealthTier {
    let validity = fitness_validity.unwrap_or(today);
    if starts_with_ignore_case(job_card_status, "open-critical") || validity <= today {
        HealthTier::Critical
    } else if starts_with_ignore_case(job_card_status, "open-minor")
        || validity <= plus_days(today, VALIDITY_MINOR_WINDOW_DAYS)
    {
        HealthTier::Minor
    } else {
        HealthTier::Healthy
    }
}

/// Operator-facing consequence text for skipping the recommended action.
#[must_use]
pub const fn consequence_if_skipped(tier: HealthTier) -> &'static str {
    match tier {
        HealthTier::Critical => "Safety risk, possible downtime",
        HealthTier::Minor => "May cause minor delays or service issues",
        HealthTier::Healthy => "No immediate risk",
    }
}

fn plus_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_days(Days::new(days.max(0) as u64))
        .unwrap_or(date)
}

/// Apply manual overrides in place. Unknown train ids are ignored.
pub fn apply_overrides(
    snapshots: &mut [FleetSnapshot],
    overrides: &HashMap<TrainId, TrainOverride>,
) {
    for snapshot in snapshots.iter_mut() {
        let Some(changes) = overrides.get(&snapshot.train_id) else {
            continue;
        };
        if let Some(status) = &changes.job_card_status {
            snapshot.job_card_status = status.clone();
            snapshot.job_card_open = job_card_is_open(status);
        }
        if changes.mark_cleaned {
            snapshot.needs_cleaning = false;
            snapshot.days_since_clean = 0;
        }
        if let Some(branding) = changes.branding_active {
            snapshot.branding_boost = branding;
        }
        if let Some(validity) = changes.fitness_validity {
            snapshot.fitness_validity = Some(validity);
        }
    }
}

/// Composite scoring and best-first ranking.
///
/// Weights follow the demo's induction heuristic: fitness headroom counts
/// triple, balanced mileage double, branding adds one, overdue cleaning
/// costs half a point, and an open job card is close to disqualifying.
#[must_use]
pub fn score_and_rank(snapshots: &[FleetSnapshot]) -> Vec<RankedTrain> {
    if snapshots.is_empty() {
        return Vec::new();
    }
    let max_days = snapshots
        .iter()
        .map(|s| s.fitness_days_left)
        .max()
        .unwrap_or(0)
        .max(1);
    let mileage_max = snapshots.iter().map(|s| s.mileage_30).fold(f64::MIN, f64::max);
    let mileage_min = snapshots.iter().map(|s| s.mileage_30).fold(f64::MAX, f64::min);
    let mileage_spread = mileage_max - mileage_min;

    let mut ranked: Vec<RankedTrain> = snapshots
        .iter()
        .map(|snapshot| {
            let fitness_score = snapshot.fitness_days_left as f64 / (max_days as f64 + 1.0);
            let mileage_score = if mileage_spread == 0.0 {
                UNIFORM_MILEAGE_SCORE
            } else {
                1.0 - ((snapshot.mileage_30 - mileage_min) / mileage_spread)
            };
            let composite_score = fitness_score * FITNESS_SCORE_WEIGHT
                + mileage_score * MILEAGE_SCORE_WEIGHT
                + f64::from(u8::from(snapshot.branding_boost))
                + if snapshot.needs_cleaning {
                    NEEDS_CLEANING_PENALTY
                } else {
                    0.0
                }
                + if snapshot.job_card_open {
                    OPEN_JOB_CARD_PENALTY
                } else {
                    0.0
                };
            let action = if composite_score > 0.0 && !snapshot.job_card_open {
                RecommendedAction::Service
            } else if snapshot.job_card_open {
                RecommendedAction::Maintenance
            } else {
                RecommendedAction::Standby
            };
            RankedTrain {
                snapshot: snapshot.clone(),
                fitness_score,
                mileage_score,
                composite_score,
                action,
            }
        })
        .collect();

    // Stable sort keeps the train-id ordering for equal scores.
    ranked.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Reason text for a recommendation row, mirroring the induction rules.
#[must_use]
pub fn recommendation_reason(snapshot: &FleetSnapshot, today: NaiveDate) -> &'static str {
    if starts_with_ignore_case(&snapshot.job_card_status, "open-critical") {
        "Open-Critical Job Card"
    } else if starts_with_ignore_case(&snapshot.job_card_status, "open-minor") {
        "Open-Minor Job Card"
    } else if snapshot
        .fitness_validity
        .is_some_and(|validity| validity <= plus_days(today, VALIDITY_REASON_WINDOW_DAYS))
    {
        "Fitness Validity expiring soon"
    } else {
        "Scheduled Service"
    }
}

/// Next service due date and mileage from the cleaning schedule.
#[must_use]
pub fn next_service_due(
    last_cleaned: Option<NaiveDate>,
    mileage_km: f64,
    today: NaiveDate,
) -> (NaiveDate, i64) {
    let anchor = last_cleaned.unwrap_or(today);
    let due_date = plus_days(anchor, NEXT_SERVICE_INTERVAL_DAYS);
    let due_mileage = mileage_km as i64 + NEXT_SERVICE_MILEAGE_KM;
    (due_date, due_mileage)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn row(train: &str, day: u32, mileage: f64) -> FleetLogRow {
        FleetLogRow {
            date: date(2025, 7, day),
            train_id: TrainId::new(train),
            mileage_km: mileage,
            fitness_validity: Some(date(2025, 8, 20)),
            job_card_status: "Closed".to_string(),
            branding_active: false,
            last_cleaned: Some(date(2025, 7, day)),
            yard_position: format!("Bay {train}"),
            train_status: "In Service".to_string(),
        }
    }

    fn two_train_log() -> FleetLog {
        FleetLog {
            rows: vec![
                row("TS-01", 1, 1_000.0),
                row("TS-01", 10, 2_200.0),
                row("TS-02", 1, 1_000.0),
                row("TS-02", 10, 1_400.0),
            ],
        }
    }

    #[test]
    fn snapshot_takes_newest_row_and_mileage_window() {
        let snapshots = two_train_log().latest_snapshot();
        assert_eq!(snapshots.len(), 2);
        let first = &snapshots[0];
        assert_eq!(first.train_id.as_str(), "TS-01");
        assert_eq!(first.date, date(2025, 7, 10));
        assert!((first.mileage_30 - 1_200.0).abs() <= f64::EPSILON);
        assert!(!first.needs_cleaning);
    }

    #[test]
    fn missing_clean_date_uses_sentinel() {
        let mut log = two_train_log();
        for row in &mut log.rows {
            row.last_cleaned = None;
        }
        let snapshots = log.latest_snapshot();
        assert_eq!(snapshots[0].days_since_clean, 999);
        assert!(snapshots[0].needs_cleaning);
    }

    #[test]
    fn fitness_status_prefers_job_card_severity() {
        let today = date(2025, 7, 10);
        let far = Some(date(2025, 12, 1));
        assert_eq!(
            fitness_status(far, "Open-Critical - bogie inspection", today),
            HealthTier::Critical
        );
        assert_eq!(
            fitness_status(far, "Open-Minor - brake pads", today),
            HealthTier::Minor
        );
        assert_eq!(fitness_status(far, "Closed", today), HealthTier::Healthy);
        // Lapsed or missing validity dominates a closed card.
        assert_eq!(
            fitness_status(Some(today), "Closed", today),
            HealthTier::Critical
        );
        assert_eq!(fitness_status(None, "Closed", today), HealthTier::Critical);
        // Validity inside the minor window.
        assert_eq!(
            fitness_status(Some(date(2025, 7, 14)), "Closed", today),
            HealthTier::Minor
        );
    }

    #[test]
    fn open_job_card_sinks_the_composite_score() {
        let mut snapshots = two_train_log().latest_snapshot();
        snapshots[0].job_card_status = "Open-Minor - HVAC filter".to_string();
        snapshots[0].job_card_open = true;

        let ranked = score_and_rank(&snapshots);
        assert_eq!(ranked[0].snapshot.train_id.as_str(), "TS-02");
        assert_eq!(ranked[0].action, RecommendedAction::Service);
        assert_eq!(ranked[1].action, RecommendedAction::Maintenance);
        assert!(ranked[0].composite_score > ranked[1].composite_score);
    }

    #[test]
    fn uniform_mileage_scores_half() {
        let log = FleetLog {
            rows: vec![row("TS-01", 10, 1_000.0), row("TS-02", 10, 2_000.0)],
        };
        let ranked = score_and_rank(&log.latest_snapshot());
        for train in &ranked {
            assert!((train.mileage_score - 0.5).abs() <= f64::EPSILON);
        }
    }

    #[test]
    fn overrides_touch_only_named_trains() {
        let mut snapshots = two_train_log().latest_snapshot();
        let mut overrides = HashMap::new();
        overrides.insert(
            TrainId::new("TS-02"),
            TrainOverride {
                job_card_status: Some("Open-Critical - axle".to_string()),
                mark_cleaned: true,
                ..TrainOverride::default()
            },
        );
        overrides.insert(TrainId::new("TS-99"), TrainOverride::default());

        apply_overrides(&mut snapshots, &overrides);
        assert!(!snapshots[0].job_card_open);
        assert!(snapshots[1].job_card_open);
        assert_eq!(snapshots[1].days_since_clean, 0);
    }

    #[test]
    fn reasons_follow_severity_order() {
        let today = date(2025, 7, 10);
        let mut snapshot = two_train_log().latest_snapshot().remove(0);
        assert_eq!(recommendation_reason(&snapshot, today), "Scheduled Service");

        snapshot.fitness_validity = Some(date(2025, 7, 12));
        assert_eq!(
            recommendation_reason(&snapshot, today),
            "Fitness Validity expiring soon"
        );

        snapshot.job_card_status = "Open-Minor - wiper".to_string();
        assert_eq!(recommendation_reason(&snapshot, today), "Open-Minor Job Card");

        snapshot.job_card_status = "Open-Critical - traction".to_string();
        assert_eq!(
            recommendation_reason(&snapshot, today),
            "Open-Critical Job Card"
        );
    }

    #[test]
    fn next_service_due_anchors_on_cleaning() {
        let today = date(2025, 7, 10);
        let (due, mileage) = next_service_due(Some(date(2025, 7, 1)), 1_500.0, today);
        assert_eq!(due, date(2025, 7, 16));
        assert_eq!(mileage, 3_500);
        let (due_missing, _) = next_service_due(None, 0.0, today);
        assert_eq!(due_missing, date(2025, 7, 25));
    }

    #[test]
    fn empty_log_is_rejected() {
        assert!(matches!(
            FleetLog::from_json(r#"{"rows": []}"#),
            Err(AdvisorError::EmptyLog)
        ));
    }
}
