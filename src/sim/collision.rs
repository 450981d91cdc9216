//! Collision detection and response against trees and rocks
//!
//! Obstacles are vertical cylinders centered on their tile. Only the
//! horizontal plane matters: a ball high enough simply flies over.

use glam::Vec3;

use super::terrain::{TerrainIndex, TerrainTile, cell_of};
use crate::consts::*;
use crate::{horizontal, normalize_or_zero};
use crate::tuning::PhysicsConfig;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Horizontal surface normal (pointing from obstacle toward ball)
    pub normal: Vec3,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec3::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball against one obstacle tile
pub fn ball_obstacle_collision(ball_pos: Vec3, ball_vel: Vec3, tile: &TerrainTile) -> CollisionResult {
    let Some(collider) = tile.kind.collider_radius() else {
        return CollisionResult::miss();
    };
    // Flying over
    if ball_pos.y > tile.height + OBSTACLE_CLEARANCE {
        return CollisionResult::miss();
    }

    let reach = collider + BALL_RADIUS;
    let offset = horizontal(ball_pos - tile.surface());
    let dist = offset.length();
    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = if dist > 1e-6 {
        offset / dist
    } else {
        // Dead center: push back the way the ball came
        let back = normalize_or_zero(-horizontal(ball_vel));
        if back == Vec3::ZERO { Vec3::X } else { back }
    };

    CollisionResult {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// Resolve obstacle contacts near the ball, returning corrected position and velocity
pub fn resolve_obstacles(
    mut pos: Vec3,
    mut vel: Vec3,
    config: &PhysicsConfig,
    terrain: &TerrainIndex,
) -> (Vec3, Vec3) {
    let (cx, cz) = cell_of(pos.x, pos.z);
    for dx in -OBSTACLE_SCAN_RADIUS..=OBSTACLE_SCAN_RADIUS {
        for dz in -OBSTACLE_SCAN_RADIUS..=OBSTACLE_SCAN_RADIUS {
            let Some(tile) = terrain.get(cx + dx, cz + dz) else {
                continue;
            };
            let result = ball_obstacle_collision(pos, vel, tile);
            if !result.hit {
                continue;
            }

            pos += result.normal * (result.penetration + COLLISION_EPSILON);

            let planar = horizontal(vel);
            if planar.dot(result.normal) < 0.0 {
                let bounced = reflect_velocity(planar, result.normal)
                    * config.obstacle_restitution
                    * config.obstacle_damping;
                vel = Vec3::new(bounced.x, vel.y, bounced.z);
            }
        }
    }
    (pos, vel)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
