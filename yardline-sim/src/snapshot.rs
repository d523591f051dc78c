//! Presentation-facing views of yard state.
//!
//! The rendering layer consumes immutable snapshots plus a drained event
//! stream; it never reaches into the live state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{
    LOG_EXITED, LOG_HEALING_COMPLETED, LOG_HEALING_STARTED, LOG_PROMOTED, LOG_QUEUED, LOG_REENTRY,
    LOG_STAGED, LOG_TIER_CHANGED,
};
use crate::tracks::TrackId;
use crate::train::{HealthTier, TrainId};

/// Where a train currently sits in the yard model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "track")]
pub enum Location {
    Waiting,
    Staged(TrackId),
    Repair(TrackId),
    ReEntry,
    /// Out running revenue service: released from repair and counting down
    /// toward its next visit.
    InService,
}

impl Location {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "queue",
            Self::Staged(_) => "staged",
            Self::Repair(_) => "repair",
            Self::ReEntry => "re-entry",
            Self::InService => "in-service",
        }
    }
}

/// Observable state transition, drained by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum SimEvent {
    TierChanged {
        id: TrainId,
        from: HealthTier,
        to: HealthTier,
    },
    Queued {
        id: TrainId,
    },
    ReEntryQueued {
        id: TrainId,
    },
    Staged {
        id: TrainId,
        track: TrackId,
    },
    Promoted {
        id: TrainId,
        track: TrackId,
    },
    HealingStarted {
        id: TrainId,
        track: TrackId,
        duration_ms: u64,
    },
    HealingCompleted {
        id: TrainId,
        track: TrackId,
    },
    Exited {
        id: TrainId,
        track: TrackId,
    },
}

impl SimEvent {
    /// Stable notification key for the presentation layer.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::TierChanged { .. } => LOG_TIER_CHANGED,
            Self::Queued { .. } => LOG_QUEUED,
            Self::ReEntryQueued { .. } => LOG_REENTRY,
            Self::Staged { .. } => LOG_STAGED,
            Self::Promoted { .. } => LOG_PROMOTED,
            Self::HealingStarted { .. } => LOG_HEALING_STARTED,
            Self::HealingCompleted { .. } => LOG_HEALING_COMPLETED,
            Self::Exited { .. } => LOG_EXITED,
        }
    }

    /// The train this event concerns.
    #[must_use]
    pub const fn train(&self) -> &TrainId {
        match self {
            Self::TierChanged { id, .. }
            | Self::Queued { id }
            | Self::ReEntryQueued { id }
            | Self::Staged { id, .. }
            | Self::Promoted { id, .. }
            | Self::HealingStarted { id, .. }
            | Self::HealingCompleted { id, .. }
            | Self::Exited { id, .. } => id,
        }
    }
}

/// Event buffer sized for a typical timer callback.
pub type EventLog = SmallVec<[SimEvent; 8]>;

/// Per-train row in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainView {
    pub id: TrainId,
    pub tier: HealthTier,
    pub days_to_service: f32,
    pub location: Location,
    pub cycles: u32,
    /// Healing completion percentage, present only while an entry is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healing_progress: Option<f32>,
    pub exiting: bool,
    #[serde(default)]
    pub note: String,
}

/// Per-track row in a snapshot, for yard rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackView {
    pub id: TrackId,
    pub repair: Option<TrainId>,
    pub staged: Option<TrainId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healing_progress: Option<f32>,
    pub exiting: bool,
}

/// Immutable view of the whole yard at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct YardSnapshot {
    pub trains: Vec<TrainView>,
    pub tracks: Vec<TrackView>,
    pub waiting: Vec<TrainId>,
}

impl YardSnapshot {
    /// Look up a train row by id.
    #[must_use]
    pub fn train(&self, id: &TrainId) -> Option<&TrainView> {
        self.trains.iter().find(|view| &view.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_keys_are_distinct() {
        let id = TrainId::new("TS-01");
        let track = TrackId::ALL[0];
        let events = [
            SimEvent::Queued { id: id.clone() },
            SimEvent::ReEntryQueued { id: id.clone() },
            SimEvent::Staged {
                id: id.clone(),
                track,
            },
            SimEvent::Promoted { id, track },
        ];
        let mut keys: Vec<&str> = events.iter().map(SimEvent::key).collect();
        keys.dedup();
        assert_eq!(keys.len(), events.len());
    }

    #[test]
    fn location_tags_match_presentation_contract() {
        assert_eq!(Location::Waiting.as_str(), "queue");
        assert_eq!(Location::Staged(TrackId::ALL[1]).as_str(), "staged");
        assert_eq!(Location::Repair(TrackId::ALL[2]).as_str(), "repair");
        assert_eq!(Location::ReEntry.as_str(), "re-entry");
        assert_eq!(Location::InService.as_str(), "in-service");
    }
}
