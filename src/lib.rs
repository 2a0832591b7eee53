//! Couple Dodge - a three-lane arcade dodger
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, spawning, collisions, stage progression)
//! - `config`: Data-driven game rules and the built-in variants
//! - `controller`: Run driver that owns the timers and produces render snapshots
//! - `web`: Browser bindings for the presentation layer (wasm32 only)

pub mod config;
pub mod controller;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ConfigError, GameConfig, Stage, Variant};
pub use controller::{RunController, Snapshot};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: f64 = 60.0;
    /// Minimum wall time between two executed ticks (ms)
    pub const TICK_INTERVAL_MS: f64 = 1000.0 / TICK_RATE;

    /// Number of lanes (left, center, right)
    pub const LANE_COUNT: usize = 3;

    /// Anger meter ceiling; reaching it ends the run
    pub const MAX_ANGER: f32 = 100.0;

    /// Forward position the player is drawn at (0-100 scale)
    pub const PLAYER_FORWARD_POSITION: f32 = 80.0;

    /// Score counts ticks; presentation divides by this for display
    pub const SCORE_DISPLAY_DIVISOR: u64 = 20;
}

/// Convert a lane percentage and forward position into a screen-space point (both 0-100)
#[inline]
pub fn screen_point(lane_percent: f32, forward: f32) -> Vec2 {
    Vec2::new(lane_percent, forward)
}
