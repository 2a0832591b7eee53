//! Couple spawning and lane selection
//!
//! Lanes are drawn from a weighted distribution biased by the last lane used,
//! so the road never settles into a long repeat or an obvious safe lane.
//! Full three-lane batches use fixed patterns instead.

use rand::Rng;

use super::lane::Lane;
use super::state::{CoupleStyle, GameEvent, RunState};
use crate::config::GameConfig;

/// Base weights for [left, center, right] with no history
pub const BASE_WEIGHTS: [f64; 3] = [0.3, 0.4, 0.3];
/// Weight multiplier for repeating the previous lane
pub const REPEAT_FACTOR: f64 = 0.3;
/// Weight multiplier for the lane next to the previous one
pub const ADJACENT_FACTOR: f64 = 1.2;
/// Weight multiplier for the lane on the far side of the previous one
pub const OPPOSITE_FACTOR: f64 = 0.7;

/// Lane orders used when all three lanes fill at once
pub const TRIPLE_PATTERNS: [[Lane; 3]; 4] = [
    [Lane::Left, Lane::Center, Lane::Right],
    [Lane::Right, Lane::Center, Lane::Left],
    [Lane::Center, Lane::Left, Lane::Right],
    [Lane::Center, Lane::Right, Lane::Left],
];

/// Maximum number of remembered lanes
pub const HISTORY_LEN: usize = 2;

/// Recently chosen lanes, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneHistory {
    lanes: Vec<Lane>,
}

impl LaneHistory {
    pub fn new() -> Self {
        Self {
            lanes: Vec::with_capacity(HISTORY_LEN),
        }
    }

    pub fn last(&self) -> Option<Lane> {
        self.lanes.last().copied()
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[Lane] {
        &self.lanes
    }

    /// Keep only the newest entries, then append
    pub fn push(&mut self, lane: Lane) {
        let keep = HISTORY_LEN - 1;
        if self.lanes.len() > keep {
            let excess = self.lanes.len() - keep;
            self.lanes.drain(..excess);
        }
        self.lanes.push(lane);
    }

    pub fn clear(&mut self) {
        self.lanes.clear();
    }
}

/// Normalized lane probabilities given the previously chosen lane
pub fn lane_weights(previous: Option<Lane>) -> [f64; 3] {
    let mut weights = BASE_WEIGHTS;

    if let Some(prev) = previous {
        for (lane, weight) in Lane::ALL.iter().zip(weights.iter_mut()) {
            *weight *= match lane.distance(prev) {
                0 => REPEAT_FACTOR,
                1 => ADJACENT_FACTOR,
                _ => OPPOSITE_FACTOR,
            };
        }
    }

    let total: f64 = weights.iter().sum();
    weights.map(|w| w / total)
}

/// Draw one lane from the weighted distribution
pub fn weighted_lane<R: Rng + ?Sized>(previous: Option<Lane>, rng: &mut R) -> Lane {
    let weights = lane_weights(previous);
    let roll: f64 = rng.random();

    let mut cumulative = 0.0;
    for (lane, weight) in Lane::ALL.iter().zip(weights) {
        cumulative += weight;
        if roll < cumulative {
            return *lane;
        }
    }
    // Rounding left the roll just past the last bucket
    Lane::Right
}

/// Decides where new couples enter the road
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    history: LaneHistory,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn history(&self) -> &LaneHistory {
        &self.history
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Choose lanes for a batch of `count` couples and record them in the history.
    ///
    /// Batches of two always use distinct lanes; batches of three are a
    /// permutation of all lanes that does not start where the previous batch ended.
    pub fn choose_lanes<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<Lane> {
        let previous = self.history.last();

        let lanes = match count {
            0 => Vec::new(),
            1 => vec![weighted_lane(previous, rng)],
            2 => {
                let first = weighted_lane(previous, rng);
                let mut second = weighted_lane(Some(first), rng);
                while second == first {
                    second = weighted_lane(Some(first), rng);
                }
                vec![first, second]
            }
            // Stage caps are validated to at most three
            _ => loop {
                let pattern = TRIPLE_PATTERNS[rng.random_range(0..TRIPLE_PATTERNS.len())];
                if Some(pattern[0]) != previous {
                    break pattern.to_vec();
                }
            },
        };

        for &lane in &lanes {
            self.history.push(lane);
        }
        lanes
    }

    /// Top the road up to the current stage's cap. Returns the new couple IDs.
    pub fn spawn_batch<R: Rng + ?Sized>(
        &mut self,
        state: &mut RunState,
        config: &GameConfig,
        rng: &mut R,
    ) -> Vec<u32> {
        if !state.is_active() {
            return Vec::new();
        }
        let Some(stage) = config.stage(state.stage_index) else {
            return Vec::new();
        };

        let active = state.obstacles.len();
        if active >= stage.max_concurrent {
            return Vec::new();
        }
        let need = stage.max_concurrent - active;

        let lanes = self.choose_lanes(need, rng);
        let mut ids = Vec::with_capacity(lanes.len());
        for (i, lane) in lanes.into_iter().enumerate() {
            let style = CoupleStyle::ALL[rng.random_range(0..CoupleStyle::ALL.len())];
            let forward = -(i as f32) * config.spawn_stagger;
            ids.push(state.spawn_obstacle(lane, forward, style));
        }

        log::debug!(
            "Spawned {} couple(s) in stage {} ({} active)",
            ids.len(),
            state.stage_index,
            state.obstacles.len()
        );
        state.push_event(GameEvent::Spawned { ids: ids.clone() });
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::sim::state::Overlay;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_weights_without_history() {
        let weights = lane_weights(None);
        assert!((weights[0] - 0.3).abs() < 1e-9);
        assert!((weights[1] - 0.4).abs() < 1e-9);
        assert!((weights[2] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_weights_after_left() {
        // 0.09, 0.48, 0.21 before normalization
        let weights = lane_weights(Some(Lane::Left));
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!((weights[0] - 0.09 / 0.78).abs() < 1e-9);
        assert!((weights[1] - 0.48 / 0.78).abs() < 1e-9);
        assert!((weights[2] - 0.21 / 0.78).abs() < 1e-9);
    }

    #[test]
    fn test_weights_after_center() {
        // Both outer lanes are adjacent to the center
        let weights = lane_weights(Some(Lane::Center));
        assert!((weights[0] - weights[2]).abs() < 1e-9);
        assert!(weights[1] < weights[0]);
    }

    #[test]
    fn test_draw_frequencies_match_base_weights() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let draws = 20_000;
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            counts[weighted_lane(None, &mut rng).index()] += 1;
        }
        for (count, expected) in counts.iter().zip(BASE_WEIGHTS) {
            let freq = *count as f64 / draws as f64;
            assert!(
                (freq - expected).abs() < 0.02,
                "frequency {freq} too far from {expected}"
            );
        }
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = LaneHistory::new();
        history.push(Lane::Left);
        history.push(Lane::Center);
        history.push(Lane::Right);
        assert_eq!(history.as_slice(), &[Lane::Center, Lane::Right]);
        assert_eq!(history.last(), Some(Lane::Right));
    }

    #[test]
    fn test_triple_avoids_seam_repeat() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut spawner = Spawner::new();
        for _ in 0..200 {
            let previous = spawner.history().last();
            let lanes = spawner.choose_lanes(3, &mut rng);
            assert_ne!(Some(lanes[0]), previous);
        }
    }

    #[test]
    fn test_spawn_batch_fills_to_cap_with_stagger() {
        let mut config = Variant::Staged.config();
        config.spawn_stagger = 25.0;
        let mut state = RunState::new(1, false);
        state.stage_index = 2; // cap 3
        let mut rng = Pcg32::seed_from_u64(9);
        let mut spawner = Spawner::new();

        let ids = spawner.spawn_batch(&mut state, &config, &mut rng);
        assert_eq!(ids.len(), 3);
        let forwards: Vec<f32> = state.obstacles.iter().map(|o| o.forward).collect();
        assert_eq!(forwards, vec![0.0, -25.0, -50.0]);

        // Already at cap
        assert!(spawner.spawn_batch(&mut state, &config, &mut rng).is_empty());

        // One slot frees up
        state.obstacles.remove(0);
        assert_eq!(spawner.spawn_batch(&mut state, &config, &mut rng).len(), 1);
    }

    #[test]
    fn test_no_spawn_while_blocked() {
        let config = Variant::Staged.config();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut spawner = Spawner::new();

        let mut state = RunState::new(1, false);
        state.overlay = Some(Overlay::StageMessage);
        assert!(spawner.spawn_batch(&mut state, &config, &mut rng).is_empty());

        let mut state = RunState::new(1, false);
        state.status = crate::sim::RunStatus::Over;
        assert!(spawner.spawn_batch(&mut state, &config, &mut rng).is_empty());
        assert!(state.obstacles.is_empty());
    }

    proptest! {
        #[test]
        fn pairs_use_distinct_lanes(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut spawner = Spawner::new();
            for _ in 0..8 {
                let lanes = spawner.choose_lanes(2, &mut rng);
                prop_assert_eq!(lanes.len(), 2);
                prop_assert_ne!(lanes[0], lanes[1]);
            }
        }

        #[test]
        fn triples_are_permutations(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut spawner = Spawner::new();
            for _ in 0..8 {
                let mut lanes: Vec<usize> = spawner
                    .choose_lanes(3, &mut rng)
                    .into_iter()
                    .map(Lane::index)
                    .collect();
                lanes.sort_unstable();
                prop_assert_eq!(lanes, vec![0, 1, 2]);
            }
        }

        #[test]
        fn history_never_exceeds_two(seed in any::<u64>(), sizes in prop::collection::vec(1usize..=3, 1..16)) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut spawner = Spawner::new();
            for size in sizes {
                let lanes = spawner.choose_lanes(size, &mut rng);
                prop_assert!(spawner.history().as_slice().len() <= HISTORY_LEN);
                prop_assert_eq!(spawner.history().last(), lanes.last().copied());
            }
        }
    }
}
