//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (the controller decides when a tick runs)
//! - Seeded RNG only, passed in by the caller
//! - Stable iteration order (obstacles kept in spawn order)
//! - No rendering, timer or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod lane;
pub mod spawn;
pub mod stage;
pub mod state;
pub mod tick;

pub use autopilot::suggest_move;
pub use collision::{ImpactBand, collide, collide_at};
pub use lane::{Direction, InvalidLane, Lane, lane_position};
pub use spawn::{LaneHistory, Spawner, lane_weights, weighted_lane};
pub use stage::{Progress, check_progress};
pub use state::{CoupleStyle, GameEvent, Obstacle, Overlay, RunState, RunStatus};
pub use tick::{TickOutcome, move_player, tick};
