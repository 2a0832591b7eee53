//! Run state and core simulation types
//!
//! Everything the presentation layer needs to draw a frame lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::lane::Lane;
use crate::consts::*;
use crate::screen_point;

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunStatus {
    #[default]
    Playing,
    /// Anger maxed out
    Over,
    /// Every stage completed
    Cleared,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunStatus::Playing)
    }
}

/// Non-interactive window that suspends ticking and spawning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    /// Title screen before the first stage
    Intro,
    /// Stage title/message shown between stages
    StageMessage,
}

/// Cosmetic look of a couple (no gameplay effect)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoupleStyle {
    #[default]
    Red,
    Pink,
    Purple,
    Sky,
}

impl CoupleStyle {
    pub const ALL: [CoupleStyle; 4] = [
        CoupleStyle::Red,
        CoupleStyle::Pink,
        CoupleStyle::Purple,
        CoupleStyle::Sky,
    ];
}

/// A couple walking down a lane toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: Lane,
    /// Progress toward the player (0-100 scale, starts at or below 0)
    pub forward: f32,
    pub style: CoupleStyle,
}

impl Obstacle {
    pub fn advance(&mut self, speed: f32) {
        self.forward += speed;
    }

    pub fn has_exited(&self, exit_threshold: f32) -> bool {
        self.forward > exit_threshold
    }

    /// Screen position as (lane %, forward %)
    pub fn screen_position(&self) -> Vec2 {
        screen_point(self.lane.position_percent(), self.forward)
    }
}

/// State change notifications, drained by the presentation layer each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A batch of couples entered the road
    Spawned { ids: Vec<u32> },
    /// Player bumped into a couple
    Collision { lane: Lane, forward: f32, anger: f32 },
    /// Couples walked off the far edge this tick
    Passed { count: u32, total: u32 },
    /// A new stage begins (stage message window opens)
    StageStarted { index: usize },
    /// Stage message window closed, play resumes
    StageResumed { index: usize },
    IntroDismissed,
    GameOver { score: u64 },
    Cleared { score: u64 },
    Restarted { seed: u64 },
}

/// Complete mutable state of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Seed the run was started with
    pub seed: u64,
    pub player_lane: Lane,
    /// Anger meter (0-100)
    pub anger: f32,
    /// Executed tick count
    pub score: u64,
    /// Couples passed in the current stage
    pub passed_count: u32,
    pub stage_index: usize,
    pub status: RunStatus,
    /// Blocking overlay, if any
    pub overlay: Option<Overlay>,
    /// Active couples in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Pending notifications
    #[serde(skip)]
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl RunState {
    /// Fresh run at stage 0, optionally behind the intro overlay
    pub fn new(seed: u64, show_intro: bool) -> Self {
        Self {
            seed,
            player_lane: Lane::Center,
            anger: 0.0,
            score: 0,
            passed_count: 0,
            stage_index: 0,
            status: RunStatus::Playing,
            overlay: show_intro.then_some(Overlay::Intro),
            obstacles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Playing with nothing blocking input or the clock
    pub fn is_active(&self) -> bool {
        self.status == RunStatus::Playing && self.overlay.is_none()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a couple to the road and return its ID
    pub fn spawn_obstacle(&mut self, lane: Lane, forward: f32, style: CoupleStyle) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            lane,
            forward,
            style,
        });
        id
    }

    /// Raise the anger meter, saturating at the ceiling. Reaching it ends the run.
    pub fn add_anger(&mut self, amount: f32) {
        self.anger = (self.anger + amount).min(MAX_ANGER);
        if self.anger >= MAX_ANGER && self.status == RunStatus::Playing {
            self.status = RunStatus::Over;
            log::info!("Game over: anger maxed at score {}", self.score);
            self.push_event(GameEvent::GameOver { score: self.score });
        }
    }

    /// Player position on screen as (lane %, forward %)
    pub fn player_position(&self) -> Vec2 {
        screen_point(self.player_lane.position_percent(), PLAYER_FORWARD_POSITION)
    }

    /// Score as shown on the HUD
    pub fn display_score(&self) -> u64 {
        self.score / SCORE_DISPLAY_DIVISOR
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all queued notifications
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
