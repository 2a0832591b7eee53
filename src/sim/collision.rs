//! Player vs couple collision detection

use serde::{Deserialize, Serialize};

use super::lane::Lane;
use super::state::{GameEvent, RunState, RunStatus};
use crate::config::GameConfig;

/// Forward-position range (inclusive) where a couple overlaps the player sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactBand {
    pub start: f32,
    pub end: f32,
}

impl ImpactBand {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, forward: f32) -> bool {
        forward >= self.start && forward <= self.end
    }
}

/// Check a couple against the player's current lane, applying anger on a hit
pub fn collide(state: &mut RunState, config: &GameConfig, lane: Lane, forward: f32) -> bool {
    let player_lane = state.player_lane;
    collide_at(state, config, player_lane, lane, forward)
}

/// Check a couple against the player standing in `player_lane`.
///
/// Used by lane changes, where the hit is evaluated against the lane the player
/// is moving into before it is committed. Every hit counts; there is no
/// per-couple cooldown.
pub fn collide_at(
    state: &mut RunState,
    config: &GameConfig,
    player_lane: Lane,
    lane: Lane,
    forward: f32,
) -> bool {
    if state.status != RunStatus::Playing {
        return false;
    }
    if lane != player_lane || !config.impact_band.contains(forward) {
        return false;
    }

    state.add_anger(config.anger_per_hit);
    log::debug!(
        "Collision in lane {} at {:.1}, anger now {:.0}",
        lane.index(),
        forward,
        state.anger
    );
    state.push_event(GameEvent::Collision {
        lane,
        forward,
        anger: state.anger,
    });
    true
}
