//! Stage progression
//!
//! A stage completes once enough couples have walked past. The next stage
//! starts behind a short message overlay; finishing the last stage clears the run.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, Overlay, RunState, RunStatus};
use crate::config::GameConfig;

/// Result of a progression check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Progress {
    /// Stage target not reached (or run not playing)
    #[default]
    Continue,
    /// Moved on to the stage at `index`
    Advanced { index: usize },
    /// Final stage completed
    Cleared,
}

/// Advance the stage if the pass target is met. Fires at most once per call,
/// however far `passed_count` overshoots the target.
pub fn check_progress(state: &mut RunState, config: &GameConfig) -> Progress {
    if state.status != RunStatus::Playing {
        return Progress::Continue;
    }
    let Some(stage) = config.stage(state.stage_index) else {
        return Progress::Continue;
    };
    if state.passed_count < stage.target_pass_count {
        return Progress::Continue;
    }

    if config.is_last_stage(state.stage_index) {
        state.status = RunStatus::Cleared;
        log::info!(
            "All {} stages cleared at score {}",
            config.stages.len(),
            state.score
        );
        state.push_event(GameEvent::Cleared { score: state.score });
        return Progress::Cleared;
    }

    state.obstacles.clear();
    state.passed_count = 0;
    state.stage_index += 1;
    state.overlay = Some(Overlay::StageMessage);

    let index = state.stage_index;
    if let Some(next) = config.stage(index) {
        log::info!("Stage {} started: {}", index + 1, next.title);
    }
    state.push_event(GameEvent::StageStarted { index });
    Progress::Advanced { index }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::sim::{CoupleStyle, Lane};

    fn ten_target_config() -> GameConfig {
        let mut config = Variant::Staged.config();
        config.stages[0].target_pass_count = 10;
        config
    }

    #[test]
    fn test_below_target_continues() {
        let config = ten_target_config();
        let mut state = RunState::new(1, false);
        state.passed_count = 9;
        assert_eq!(check_progress(&mut state, &config), Progress::Continue);
        assert_eq!(state.stage_index, 0);
    }

    #[test]
    fn test_overshoot_advances_once() {
        let config = ten_target_config();
        let mut state = RunState::new(1, false);
        state.spawn_obstacle(Lane::Left, 30.0, CoupleStyle::Red);
        state.passed_count = 11;

        assert_eq!(
            check_progress(&mut state, &config),
            Progress::Advanced { index: 1 }
        );
        assert_eq!(state.stage_index, 1);
        assert_eq!(state.passed_count, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.overlay, Some(Overlay::StageMessage));

        // A second check without new passes does nothing
        assert_eq!(check_progress(&mut state, &config), Progress::Continue);
        assert_eq!(state.stage_index, 1);
    }

    #[test]
    fn test_last_stage_clears() {
        let config = Variant::Staged.config();
        let mut state = RunState::new(1, false);
        state.stage_index = config.stages.len() - 1;
        state.passed_count = config.stages[state.stage_index].target_pass_count;

        assert_eq!(check_progress(&mut state, &config), Progress::Cleared);
        assert_eq!(state.status, RunStatus::Cleared);
        assert_eq!(state.stage_index, config.stages.len() - 1);

        // Terminal: nothing else happens
        state.passed_count += 50;
        assert_eq!(check_progress(&mut state, &config), Progress::Continue);
    }

    #[test]
    fn test_no_progress_after_game_over() {
        let config = ten_target_config();
        let mut state = RunState::new(1, false);
        state.status = RunStatus::Over;
        state.passed_count = 10;
        assert_eq!(check_progress(&mut state, &config), Progress::Continue);
        assert_eq!(state.stage_index, 0);
    }
}
