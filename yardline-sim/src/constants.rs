//! Centralized tuning constants for the Yardline depot simulation.
//!
//! These values define the deterministic math for the demo simulation.
//! Keeping them together ensures the yard choreography can only be adjusted
//! via code changes reviewed in version control, rather than through
//! external configuration.

// Timer cadence ------------------------------------------------------------
pub const CLOCK_TICK_MS: u64 = 1_000;
pub const CYCLE_TRIGGER_MS: u64 = 8_000;
pub const MOVEMENT_POLL_MS: u64 = 1_000;
pub const PROGRESS_POLL_MS: u64 = 500;
pub const STATUS_POLL_MS: u64 = 30_000;

// Fitness clock ------------------------------------------------------------
pub const DAYS_PER_REAL_SECOND: f32 = 0.25;
pub const MINOR_THRESHOLD_DAYS: f32 = 5.0;
pub const POST_REPAIR_RESET_DAYS: f32 = 40.0;

// Depot geometry -----------------------------------------------------------
pub const TRACK_COUNT: usize = 4;
/// Stagger between track visits within one healing cycle. Deliberately
/// non-uniform so repairs never start simultaneously across tracks.
pub const TRACK_VISIT_DELAYS_MS: [u64; TRACK_COUNT] = [1_500, 2_500, 2_000, 3_000];

// Healing progression ------------------------------------------------------
pub const HEAL_DURATION_CRITICAL_MS: u64 = 20_000;
pub const HEAL_DURATION_MINOR_MS: u64 = 12_000;
pub const EXIT_DELAY_MS: u64 = 10_000;
pub const POST_REPAIR_NOTE: &str = "Serviced - fitness certificate renewed";

// Advisor scoring ----------------------------------------------------------
pub(crate) const NEXT_SERVICE_INTERVAL_DAYS: i64 = 15;
pub(crate) const NEXT_SERVICE_MILEAGE_KM: i64 = 2_000;
pub(crate) const CLEANING_OVERDUE_DAYS: i64 = 2;
pub(crate) const MISSING_CLEAN_SENTINEL_DAYS: i64 = 999;
pub(crate) const VALIDITY_MINOR_WINDOW_DAYS: i64 = 5;
pub(crate) const VALIDITY_REASON_WINDOW_DAYS: i64 = 3;
pub(crate) const FITNESS_SCORE_WEIGHT: f64 = 3.0;
pub(crate) const MILEAGE_SCORE_WEIGHT: f64 = 2.0;
pub(crate) const UNIFORM_MILEAGE_SCORE: f64 = 0.5;
pub(crate) const NEEDS_CLEANING_PENALTY: f64 = -0.5;
pub(crate) const OPEN_JOB_CARD_PENALTY: f64 = -5.0;

// Event keys ---------------------------------------------------------------
pub(crate) const LOG_TIER_CHANGED: &str = "log.yard.tier-changed";
pub(crate) const LOG_QUEUED: &str = "log.yard.queued";
pub(crate) const LOG_REENTRY: &str = "log.yard.re-entry";
pub(crate) const LOG_STAGED: &str = "log.yard.staged";
pub(crate) const LOG_PROMOTED: &str = "log.yard.promoted";
pub(crate) const LOG_HEALING_STARTED: &str = "log.yard.healing-started";
pub(crate) const LOG_HEALING_COMPLETED: &str = "log.yard.healing-completed";
pub(crate) const LOG_EXITED: &str = "log.yard.exited";
