//! Fixed timestep simulation tick
//!
//! Core game step that advances the road deterministically, plus the
//! synchronous lane-change handler.

use serde::{Deserialize, Serialize};

use super::collision::{collide, collide_at};
use super::lane::{Direction, Lane};
use super::stage::{Progress, check_progress};
use super::state::{GameEvent, RunState};
use crate::config::GameConfig;

/// What happened during one call to [`tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    /// False when the run was blocked or already finished and nothing changed
    pub executed: bool,
    /// Collisions registered this tick
    pub hits: u32,
    /// Couples that walked off the road this tick
    pub passed: u32,
    pub progress: Progress,
}

/// Advance the run by one fixed timestep.
///
/// Order matters: every couple moves and is collision-checked at its new
/// position before passes are counted and the stage target is evaluated.
pub fn tick(state: &mut RunState, config: &GameConfig) -> TickOutcome {
    if !state.is_active() {
        return TickOutcome::default();
    }
    let Some(speed) = config.stage(state.stage_index).map(|s| s.obstacle_speed) else {
        return TickOutcome::default();
    };

    for obstacle in &mut state.obstacles {
        obstacle.advance(speed);
    }

    let positions: Vec<(Lane, f32)> = state
        .obstacles
        .iter()
        .map(|o| (o.lane, o.forward))
        .collect();
    let mut hits = 0;
    for (lane, forward) in positions {
        if collide(state, config, lane, forward) {
            hits += 1;
        }
    }

    let before = state.obstacles.len();
    let exit = config.exit_threshold;
    state.obstacles.retain(|o| !o.has_exited(exit));
    let passed = (before - state.obstacles.len()) as u32;

    state.score += 1;

    if passed > 0 {
        state.passed_count += passed;
        log::debug!(
            "{} couple(s) passed, {} in stage {}",
            passed,
            state.passed_count,
            state.stage_index
        );
        state.push_event(GameEvent::Passed {
            count: passed,
            total: state.passed_count,
        });
    }

    let progress = check_progress(state, config);

    TickOutcome {
        executed: true,
        hits,
        passed,
        progress,
    }
}

/// Shift the player one lane, clamped at the edges. Couples already inside the
/// impact band of the destination lane hit immediately, even when the move is
/// pushed back by the wall. Returns true if the lane changed.
pub fn move_player(state: &mut RunState, config: &GameConfig, direction: Direction) -> bool {
    if !state.is_active() {
        return false;
    }

    let new_lane = state.player_lane.shifted(direction);

    let in_lane: Vec<f32> = state
        .obstacles
        .iter()
        .filter(|o| o.lane == new_lane)
        .map(|o| o.forward)
        .collect();
    for forward in in_lane {
        collide_at(state, config, new_lane, new_lane, forward);
    }

    let changed = new_lane != state.player_lane;
    state.player_lane = new_lane;
    changed
}
