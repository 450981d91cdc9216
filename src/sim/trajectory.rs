//! Trajectory prediction for aim-assist and the ghost of the last shot
//!
//! Runs the same stepper as the live ball on a private copy of the state, so
//! it can be called as often as the input handler likes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::physics::{StepEvent, step};
use super::terrain::TerrainIndex;
use crate::consts::{GHOST_MAX_STEPS, PREDICT_DT, PREDICT_SETTLE_SPEED};
use crate::tuning::PhysicsConfig;
use crate::{elevation_degrees, horizontal_distance};

/// Predict the path of a ball launched from `start_pos` with `start_vel`
///
/// The path begins with `start_pos`. Prediction stops at the first
/// touchdown (arriving at or below the floor under the pre-step position
/// while moving down), when the ball has settled on the floor, on water, or
/// after `max_steps` steps.
pub fn predict(
    start_pos: Vec3,
    start_vel: Vec3,
    config: &PhysicsConfig,
    terrain: &TerrainIndex,
    max_steps: usize,
    dt: f32,
) -> Vec<Vec3> {
    // Most paths end at first touchdown, long before the budget
    let mut points = Vec::with_capacity(max_steps.min(GHOST_MAX_STEPS) + 1);
    points.push(start_pos);

    let mut pos = start_pos;
    let mut vel = start_vel;

    for _ in 0..max_steps {
        let pre_floor = terrain.floor_at(pos.x, pos.z);
        // Vertical velocity on arrival, before any bounce
        let descending = vel.y - (config.gravity + config.air_drag * vel.y) * dt < 0.0;

        let result = step(pos, vel, dt, config, terrain);
        pos = result.position;
        vel = result.velocity;

        // First touchdown
        if descending && pos.y <= pre_floor {
            points.push(Vec3::new(pos.x, pos.y.max(terrain.floor_at(pos.x, pos.z)), pos.z));
            break;
        }

        points.push(pos);

        if result.event == Some(StepEvent::Water) {
            break;
        }
        // Settled on the floor
        if pos.y <= terrain.floor_at(pos.x, pos.z) && vel.y.abs() < PREDICT_SETTLE_SPEED {
            break;
        }
    }

    points
}

/// A predicted (or recorded) flight path with summary metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub points: Vec<Vec3>,
    /// Highest y on the path (at least the start height)
    pub max_height: f32,
    /// Horizontal distance from first to last point
    pub range: f32,
    /// Launch elevation in degrees
    pub launch_angle: f32,
    /// Simulated time covered by the path (s)
    pub duration: f32,
}

impl TrajectorySample {
    /// Summarize a path produced with timestep `dt`
    pub fn from_path(points: Vec<Vec3>, start_vel: Vec3, dt: f32) -> Self {
        let start = points.first().copied().unwrap_or(Vec3::ZERO);
        let last = points.last().copied().unwrap_or(start);
        let max_height = points.iter().fold(start.y, |h, p| h.max(p.y));
        let duration = points.len().saturating_sub(1) as f32 * dt;

        Self {
            max_height,
            range: horizontal_distance(last, start),
            launch_angle: elevation_degrees(start_vel),
            duration,
            points,
        }
    }

    /// Predict and summarize in one go
    pub fn predict(
        start_pos: Vec3,
        start_vel: Vec3,
        config: &PhysicsConfig,
        terrain: &TerrainIndex,
        max_steps: usize,
    ) -> Self {
        let points = predict(start_pos, start_vel, config, terrain, max_steps, PREDICT_DT);
        Self::from_path(points, start_vel, PREDICT_DT)
    }

    /// Final point of the path
    pub fn landing(&self) -> Option<Vec3> {
        self.points.last().copied()
    }
}
