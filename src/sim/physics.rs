//! Single deterministic integration step
//!
//! `step` is a pure function of its inputs. Both the live shot loop and the
//! trajectory predictor drive the ball exclusively through it.

use glam::Vec3;

use super::collision::resolve_obstacles;
use super::terrain::{TerrainIndex, TerrainKind};
use crate::consts::*;
use crate::tuning::PhysicsConfig;

/// Terminal event raised inside a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// Ball touched a water tile; velocity already zeroed
    Water,
}

/// Output of one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub position: Vec3,
    pub velocity: Vec3,
    pub event: Option<StepEvent>,
}

/// Advance a ball by `dt` seconds
pub fn step(
    position: Vec3,
    velocity: Vec3,
    dt: f32,
    config: &PhysicsConfig,
    terrain: &TerrainIndex,
) -> StepResult {
    // Gravity plus linear air drag, semi-implicit Euler
    let accel = Vec3::new(0.0, -config.gravity, 0.0) - velocity * config.air_drag;
    let mut vel = (velocity + accel * dt).clamp_length_max(config.max_velocity);
    let mut pos = position + vel * dt;

    (pos, vel) = resolve_obstacles(pos, vel, config, terrain);

    let tile = terrain.lookup(pos.x, pos.z);
    let floor = tile.map_or(VOID_FLOOR, |t| t.height);
    if pos.y > floor {
        return StepResult {
            position: pos,
            velocity: vel,
            event: None,
        };
    }

    pos.y = floor;
    let kind = tile.map(|t| t.kind);
    if kind == Some(TerrainKind::Water) {
        return StepResult {
            position: pos,
            velocity: Vec3::ZERO,
            event: Some(StepEvent::Water),
        };
    }

    if vel.y.abs() > BOUNCE_THRESHOLD {
        vel.y = -vel.y * config.restitution;
    } else {
        vel.y = 0.0;
    }

    if vel.y == 0.0 {
        vel = apply_friction(vel, config.friction_for(kind) * config.gravity * dt);
    } else {
        // Skidding between bounces; scaled by dt so damping is frame-rate independent
        let keep = (1.0 - dt).max(0.0);
        vel.x *= keep;
        vel.z *= keep;
    }

    StepResult {
        position: pos,
        velocity: vel,
        event: None,
    }
}

/// Remove `decel` from the horizontal speed, stopping at zero
#[inline]
pub fn apply_friction(vel: Vec3, decel: f32) -> Vec3 {
    let speed = crate::horizontal_speed(vel);
    if speed <= decel {
        Vec3::new(0.0, vel.y, 0.0)
    } else {
        let scale = (speed - decel) / speed;
        Vec3::new(vel.x * scale, vel.y, vel.z * scale)
    }
}
