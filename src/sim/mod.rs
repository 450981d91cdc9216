//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Terrain is an explicit per-level value, never global
//! - The live ball is only mutated by the frame loop while a shot executes
//! - Prediction works on private copies
//! - No rendering, input or platform dependencies

pub mod aim;
pub mod collision;
pub mod physics;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod trajectory;

pub use aim::{AimData, compute_aim};
pub use collision::{CollisionResult, ball_obstacle_collision, reflect_velocity};
pub use physics::{StepEvent, StepResult, step};
pub use state::{Ball, GameEvent, GamePhase, GameState};
pub use terrain::{Level, TerrainIndex, TerrainKind, TerrainTile};
pub use tick::{AimInput, FrameClock, ShotEvent, TickInput, simulate_frame, tick};
pub use trajectory::{TrajectorySample, predict};
