//! The three discrete lanes and their screen mapping

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three lanes. Serialized as its index (0, 1, 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

/// Player move direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("lane index {0} is out of range (expected 0, 1 or 2)")]
pub struct InvalidLane(pub u8);

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Center => 1,
            Lane::Right => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Horizontal position of the lane center as a percentage of the play field
    pub fn position_percent(self) -> f32 {
        match self {
            Lane::Left => 25.0,
            Lane::Center => 50.0,
            Lane::Right => 75.0,
        }
    }

    /// Neighbouring lane in `direction`, clamped at the edges
    pub fn shifted(self, direction: Direction) -> Self {
        let index = match direction {
            Direction::Left => self.index().saturating_sub(1),
            Direction::Right => (self.index() + 1).min(Self::ALL.len() - 1),
        };
        Self::ALL[index]
    }

    /// Number of lane steps between two lanes (0, 1 or 2)
    pub fn distance(self, other: Lane) -> usize {
        self.index().abs_diff(other.index())
    }
}

impl From<Lane> for u8 {
    fn from(lane: Lane) -> Self {
        lane.index() as u8
    }
}

impl TryFrom<u8> for Lane {
    type Error = InvalidLane;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Lane::from_index(value as usize).ok_or(InvalidLane(value))
    }
}

/// Lane to percentage mapping used by presentation ({0,1,2} -> {25,50,75})
#[inline]
pub fn lane_position(lane: Lane) -> f32 {
    lane.position_percent()
}
