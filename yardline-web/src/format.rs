//! Pure presentation helpers shared by the yard and plan views.

use yardline_sim::{HealthTier, SimEvent};

/// CSS class for a tier chip.
#[must_use]
pub const fn tier_class(tier: HealthTier) -> &'static str {
    match tier {
        HealthTier::Healthy => "tier-healthy",
        HealthTier::Minor => "tier-minor",
        HealthTier::Critical => "tier-critical",
    }
}

/// Human-readable countdown, e.g. "12.4 d".
#[must_use]
pub fn format_days(days: f32) -> String {
    format!("{days:.1} d")
}

/// Whole-percent healing progress, e.g. "45%".
#[must_use]
pub fn format_progress(progress: f32) -> String {
    format!("{:.0}%", (progress * 100.0).clamp(0.0, 100.0))
}

/// One-line notification text for a drained simulation event.
#[must_use]
pub fn notice_text(event: &SimEvent) -> String {
    match event {
        SimEvent::TierChanged { id, from, to } => format!("{id}: {from} -> {to}"),
        SimEvent::Queued { id } => format!("{id} joined the waiting queue"),
        SimEvent::ReEntryQueued { id } => format!("{id} is due for service again"),
        SimEvent::Staged { id, track } => format!("{id} staged on {track}"),
        SimEvent::Promoted { id, track } => format!("{id} moved into repair on {track}"),
        SimEvent::HealingStarted { id, track, .. } => {
            format!("Maintenance started for {id} on {track}")
        }
        SimEvent::HealingCompleted { id, track } => {
            format!("Maintenance completed for {id} on {track}")
        }
        SimEvent::Exited { id, track } => format!("{id} left {track} for service"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yardline_sim::{TrackId, TrainId};

    #[test]
    fn tier_classes_are_stable() {
        assert_eq!(tier_class(HealthTier::Healthy), "tier-healthy");
        assert_eq!(tier_class(HealthTier::Minor), "tier-minor");
        assert_eq!(tier_class(HealthTier::Critical), "tier-critical");
    }

    #[test]
    fn progress_clamps_and_rounds() {
        assert_eq!(format_progress(0.456), "46%");
        assert_eq!(format_progress(1.7), "100%");
        assert_eq!(format_progress(-0.2), "0%");
    }

    #[test]
    fn notices_name_the_train_and_track() {
        let text = notice_text(&SimEvent::Promoted {
            id: TrainId::new("TS-03"),
            track: TrackId::ALL[1],
        });
        assert_eq!(text, "TS-03 moved into repair on Track 2");
    }

    #[test]
    fn countdown_keeps_one_decimal() {
        assert_eq!(format_days(12.44), "12.4 d");
        assert_eq!(format_days(0.0), "0.0 d");
    }
}
