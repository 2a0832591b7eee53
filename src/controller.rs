//! Run controller
//!
//! Owns one run: the state, the seeded RNG, the spawner and the three timers
//! (frame clock, spawn interval, stage message timeout). The presentation
//! layer drives it with timestamps and input events, and reads a [`Snapshot`]
//! back each frame. Timers are plain handles stored in `Option`s; stopping the
//! run drops them, so nothing can fire after a run has ended.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::{ConfigError, GameConfig, Variant};
use crate::consts::TICK_INTERVAL_MS;
use crate::sim::{
    self, CoupleStyle, Direction, GameEvent, Lane, Overlay, Progress, RunState, RunStatus, Spawner,
};

/// Gates simulation ticks to the fixed rate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct FrameClock {
    last_tick_ms: Option<f64>,
}

impl FrameClock {
    /// True if a tick should run at `now`. At most one tick per call; late
    /// frames skip ticks rather than catching up.
    fn poll(&mut self, now: f64) -> bool {
        match self.last_tick_ms {
            Some(last) if now - last < TICK_INTERVAL_MS => false,
            _ => {
                self.last_tick_ms = Some(now);
                true
            }
        }
    }
}

/// Repeating timer, anchored at the first poll after it is armed
#[derive(Debug, Clone, Copy, PartialEq)]
struct IntervalTimer {
    period_ms: f64,
    anchor_ms: Option<f64>,
}

impl IntervalTimer {
    fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            anchor_ms: None,
        }
    }

    fn poll(&mut self, now: f64) -> bool {
        match self.anchor_ms {
            None => {
                self.anchor_ms = Some(now);
                false
            }
            Some(anchor) if now - anchor >= self.period_ms => {
                self.anchor_ms = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}

/// A couple as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub lane: Lane,
    pub forward: f32,
    pub style: CoupleStyle,
    /// (lane %, forward %)
    pub position: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageView {
    pub index: usize,
    pub count: usize,
    pub title: String,
    pub message: String,
    pub target_pass_count: u32,
}

/// Read-only view of the run for one rendered frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub player_lane: Lane,
    pub player_position: Vec2,
    pub obstacles: Vec<ObstacleView>,
    pub anger: f32,
    pub score: u64,
    pub display_score: u64,
    pub status: RunStatus,
    pub overlay: Option<Overlay>,
    pub stage: StageView,
    pub passed_count: u32,
}

pub struct RunController {
    config: GameConfig,
    state: RunState,
    rng: Pcg32,
    spawner: Spawner,
    clock: Option<FrameClock>,
    spawn_timer: Option<IntervalTimer>,
    stage_message_due: Option<f64>,
}

impl RunController {
    /// Start a run with a custom config
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::start(config, seed))
    }

    /// Start a run with one of the built-in rule sets
    pub fn with_variant(variant: Variant, seed: u64) -> Self {
        Self::start(variant.config(), seed)
    }

    fn start(config: GameConfig, seed: u64) -> Self {
        log::info!(
            "Run started: {} stage(s), seed {}",
            config.stages.len(),
            seed
        );
        let state = RunState::new(seed, config.show_intro);
        let mut controller = Self {
            config,
            state,
            rng: Pcg32::seed_from_u64(seed),
            spawner: Spawner::new(),
            clock: None,
            spawn_timer: None,
            stage_message_due: None,
        };
        controller.arm_play_timers();
        controller
    }

    fn arm_play_timers(&mut self) {
        self.clock = Some(FrameClock::default());
        self.spawn_timer = self
            .config
            .stage(self.state.stage_index)
            .map(|stage| IntervalTimer::new(stage.spawn_interval_ms));
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Number of live timer handles (0 once the run has stopped)
    pub fn pending_timers(&self) -> usize {
        usize::from(self.clock.is_some())
            + usize::from(self.spawn_timer.is_some())
            + usize::from(self.stage_message_due.is_some())
    }

    /// True once the run has been stopped; only `restart` revives it
    pub fn is_stopped(&self) -> bool {
        self.clock.is_none()
    }

    /// Cancel every timer and stop accepting input. Called automatically when
    /// the run ends, and by the page on teardown.
    pub fn stop(&mut self) {
        if self.pending_timers() > 0 {
            log::debug!("Stopping run timers ({:?})", self.state.status);
        }
        self.clock = None;
        self.spawn_timer = None;
        self.stage_message_due = None;
    }

    /// Drive the run from the presentation's frame callback (`now` in ms).
    /// Returns true if a simulation tick executed.
    pub fn tick(&mut self, now: f64) -> bool {
        if self.state.status.is_terminal() {
            self.stop();
            return false;
        }
        if self.is_stopped() {
            return false;
        }

        if self.stage_message_due.is_some_and(|due| now >= due) {
            self.stage_message_due = None;
            self.resume_after_stage_message();
        }

        if !self.state.is_active() {
            return false;
        }

        if let Some(timer) = self.spawn_timer.as_mut() {
            if timer.poll(now) {
                self.spawner
                    .spawn_batch(&mut self.state, &self.config, &mut self.rng);
            }
        }

        let Some(clock) = self.clock.as_mut() else {
            return false;
        };
        if !clock.poll(now) {
            return false;
        }

        let outcome = sim::tick(&mut self.state, &self.config);
        if let Progress::Advanced { .. } = outcome.progress {
            self.spawn_timer = None;
            self.stage_message_due = Some(now + self.config.stage_message_ms);
        }
        if self.state.status.is_terminal() {
            self.stop();
        }
        outcome.executed
    }

    fn resume_after_stage_message(&mut self) {
        if self.state.overlay != Some(Overlay::StageMessage) {
            return;
        }
        self.state.overlay = None;
        self.arm_play_timers();
        let index = self.state.stage_index;
        log::info!("Stage {} underway", index + 1);
        self.state.push_event(GameEvent::StageResumed { index });
    }

    /// Player input: shift one lane. Ignored while blocked or finished.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        if self.is_stopped() {
            return false;
        }
        let moved = sim::move_player(&mut self.state, &self.config, direction);
        if self.state.status.is_terminal() {
            self.stop();
        }
        moved
    }

    /// Close the intro overlay and let play begin
    pub fn dismiss_intro(&mut self) -> bool {
        if self.is_stopped() || self.state.overlay != Some(Overlay::Intro) {
            return false;
        }
        self.state.overlay = None;
        log::info!("Intro dismissed");
        self.state.push_event(GameEvent::IntroDismissed);
        true
    }

    /// Throw the current run away and start over from stage 0.
    /// The intro is not shown again.
    pub fn restart(&mut self, seed: u64) {
        self.stop();
        self.state = RunState::new(seed, false);
        self.rng = Pcg32::seed_from_u64(seed);
        self.spawner.reset();
        self.arm_play_timers();
        log::info!("Run restarted with seed {}", seed);
        self.state.push_event(GameEvent::Restarted { seed });
    }

    /// Take every notification queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.take_events()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        let stage = self
            .config
            .stage(state.stage_index)
            .map(|stage| StageView {
                index: state.stage_index,
                count: self.config.stages.len(),
                title: stage.title.clone(),
                message: stage.message.clone(),
                target_pass_count: stage.target_pass_count,
            })
            .unwrap_or_default();

        Snapshot {
            player_lane: state.player_lane,
            player_position: state.player_position(),
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    lane: o.lane,
                    forward: o.forward,
                    style: o.style,
                    position: o.screen_position(),
                })
                .collect(),
            anger: state.anger,
            score: state.score,
            display_score: state.display_score(),
            status: state.status,
            overlay: state.overlay,
            stage,
            passed_count: state.passed_count,
        }
    }
}
