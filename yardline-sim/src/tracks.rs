//! Repair tracks and their slot pair.
//!
//! Each track holds at most one repair occupant and one staged ("next")
//! occupant. Writes are guarded: filling an occupied slot is a silent no-op
//! with a diagnostic, never a panic.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::TRACK_COUNT;
use crate::train::TrainId;

/// One-based track identifier (1..=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u8);

impl TrackId {
    /// All tracks in ascending visit order.
    pub const ALL: [Self; TRACK_COUNT] = [Self(1), Self(2), Self(3), Self(4)];

    /// Construct from a one-based number, rejecting out-of-range values.
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number <= TRACK_COUNT as u8 {
            Some(Self(number))
        } else {
            None
        }
    }

    /// One-based track number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index for array storage.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The next track in visit order, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        if (self.0 as usize) < TRACK_COUNT {
            Some(Self(self.0 + 1))
        } else {
            None
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Track {}", self.0)
    }
}

/// A single repair track: one repair slot, one staged slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    repair: Option<TrainId>,
    staged: Option<TrainId>,
}

impl Track {
    #[must_use]
    const fn new(id: TrackId) -> Self {
        Self {
            id,
            repair: None,
            staged: None,
        }
    }

    #[must_use]
    pub const fn repair_occupant(&self) -> Option<&TrainId> {
        self.repair.as_ref()
    }

    #[must_use]
    pub const fn staged_occupant(&self) -> Option<&TrainId> {
        self.staged.as_ref()
    }

    #[must_use]
    pub const fn repair_is_empty(&self) -> bool {
        self.repair.is_none()
    }

    #[must_use]
    pub const fn staged_is_empty(&self) -> bool {
        self.staged.is_none()
    }

    /// Place a train in the repair slot. Refuses (and reports false) when
    /// the slot is already occupied.
    pub fn occupy_repair(&mut self, train: TrainId) -> bool {
        if let Some(current) = &self.repair {
            log::debug!("{}: repair slot already held by {current}, ignoring {train}", self.id);
            return false;
        }
        self.repair = Some(train);
        true
    }

    /// Place a train in the staged slot. Refuses when occupied.
    pub fn occupy_staged(&mut self, train: TrainId) -> bool {
        if let Some(current) = &self.staged {
            log::debug!("{}: staged slot already held by {current}, ignoring {train}", self.id);
            return false;
        }
        self.staged = Some(train);
        true
    }

    /// Remove and return the repair occupant.
    pub fn clear_repair(&mut self) -> Option<TrainId> {
        self.repair.take()
    }

    /// Remove and return the staged occupant.
    pub fn clear_staged(&mut self) -> Option<TrainId> {
        self.staged.take()
    }

    /// Whether the given train occupies either slot.
    #[must_use]
    pub fn holds(&self, train: &TrainId) -> bool {
        self.repair.as_ref() == Some(train) || self.staged.as_ref() == Some(train)
    }
}

/// The fixed set of four tracks, always iterated ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSet([Track; TRACK_COUNT]);

impl Default for TrackSet {
    fn default() -> Self {
        Self(TrackId::ALL.map(Track::new))
    }
}

impl TrackSet {
    #[must_use]
    pub const fn get(&self, id: TrackId) -> &Track {
        &self.0[id.index()]
    }

    pub const fn get_mut(&mut self, id: TrackId) -> &mut Track {
        &mut self.0[id.index()]
    }

    /// Tracks in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.0.iter()
    }

    /// Locate the track holding the given train, if any.
    #[must_use]
    pub fn find(&self, train: &TrainId) -> Option<&Track> {
        self.0.iter().find(|track| track.holds(train))
    }
}
