//! Demo/attract mode: picks lane changes that dodge the incoming couples

use super::lane::{Direction, Lane};
use super::state::RunState;
use crate::config::GameConfig;

/// How far ahead of the impact band a couple starts to count as a threat
pub const LOOKAHEAD: f32 = 25.0;

fn threatened(state: &RunState, config: &GameConfig, lane: Lane) -> bool {
    let band = config.impact_band;
    state
        .obstacles
        .iter()
        .filter(|o| o.lane == lane)
        .any(|o| o.forward >= band.start - LOOKAHEAD && o.forward <= band.end)
}

fn occupied_now(state: &RunState, config: &GameConfig, lane: Lane) -> bool {
    state
        .obstacles
        .iter()
        .any(|o| o.lane == lane && config.impact_band.contains(o.forward))
}

/// Suggest a move for the player, or `None` to stay put
pub fn suggest_move(state: &RunState, config: &GameConfig) -> Option<Direction> {
    if !state.is_active() {
        return None;
    }

    let current = state.player_lane;
    if !threatened(state, config, current) {
        return None;
    }

    // Nearest safe lane, preferring the center on ties
    let target = Lane::ALL
        .iter()
        .copied()
        .filter(|&lane| lane != current && !threatened(state, config, lane))
        .min_by_key(|&lane| (lane.distance(current), lane != Lane::Center))?;

    let direction = if target.index() < current.index() {
        Direction::Left
    } else {
        Direction::Right
    };

    // Never step into a couple on the way there
    let step = current.shifted(direction);
    if occupied_now(state, config, step) {
        return None;
    }
    Some(direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::sim::state::{CoupleStyle, Overlay};

    #[test]
    fn test_stays_when_lane_is_clear() {
        let config = Variant::Staged.config();
        let mut state = RunState::new(1, false);
        state.spawn_obstacle(Lane::Left, 60.0, CoupleStyle::Red);
        assert_eq!(suggest_move(&state, &config), None);
    }

    #[test]
    fn test_dodges_incoming_couple() {
        let config = Variant::Staged.config();
        let mut state = RunState::new(1, false);
        state.spawn_obstacle(Lane::Center, 60.0, CoupleStyle::Red);
        state.spawn_obstacle(Lane::Left, 55.0, CoupleStyle::Red);

        assert_eq!(suggest_move(&state, &config), Some(Direction::Right));
    }

    #[test]
    fn test_crosses_to_far_lane_when_path_is_open() {
        let config = Variant::Staged.config();
        let mut state = RunState::new(1, false);
        state.player_lane = Lane::Left;
        state.spawn_obstacle(Lane::Left, 60.0, CoupleStyle::Red);
        // Center is coming but not in the band yet
        state.spawn_obstacle(Lane::Center, 50.0, CoupleStyle::Red);

        assert_eq!(suggest_move(&state, &config), Some(Direction::Right));

        // Center couple inside the band blocks the crossing
        state.obstacles[1].forward = 75.0;
        assert_eq!(suggest_move(&state, &config), None);
    }

    #[test]
    fn test_idle_while_blocked() {
        let config = Variant::Staged.config();
        let mut state = RunState::new(1, false);
        state.spawn_obstacle(Lane::Center, 60.0, CoupleStyle::Red);
        state.overlay = Some(Overlay::StageMessage);
        assert_eq!(suggest_move(&state, &config), None);
    }
}
