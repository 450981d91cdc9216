//! Pull-back aiming: drag vector + club → launch parameters
//!
//! Pure function of its inputs, called straight from the input handler on
//! every drag change.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{BALL_MASS, CONTACT_TIME};
use crate::tuning::{Club, GameRules, PhysicsConfig};

/// Shot readout shown while aiming
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimData {
    /// Applied force (N)
    pub force: f32,
    /// Club force at full power (N)
    pub max_force: f32,
    /// Launch speed (units/s)
    pub velocity: f32,
    /// Launch elevation (degrees)
    pub launch_angle: f32,
    /// Drag length relative to full power, 0..=1
    pub power_ratio: f32,
    pub mass: f32,
    pub contact_time: f32,
    /// Drag-free flight time estimate (s)
    pub predicted_total_time: f32,
    /// Drag-free apex height above launch (units)
    pub max_height: f32,
    /// Drag-free carry on flat ground (units)
    pub range: f32,
    /// Launch velocity vector
    pub launch_velocity: Vec3,
}

/// Convert a screen drag into launch parameters
///
/// The ball heads opposite the drag (drag x → world x, drag y → world z).
pub fn compute_aim(drag: Vec2, club: &Club, config: &PhysicsConfig, rules: &GameRules) -> AimData {
    let power_ratio = (drag.length() / rules.max_drag_length).clamp(0.0, 1.0);
    let force = power_ratio * club.max_force;
    let speed = force * CONTACT_TIME / BALL_MASS;

    let angle = club.launch_angle_deg.to_radians();
    let direction = (-drag).normalize_or_zero();
    let launch_velocity = Vec3::new(
        direction.x * speed * angle.cos(),
        speed * angle.sin(),
        direction.y * speed * angle.cos(),
    );

    let g = config.gravity;
    let vy = speed * angle.sin();

    AimData {
        force,
        max_force: club.max_force,
        velocity: speed,
        launch_angle: club.launch_angle_deg,
        power_ratio,
        mass: BALL_MASS,
        contact_time: CONTACT_TIME,
        predicted_total_time: 2.0 * vy / g,
        max_height: vy * vy / (2.0 * g),
        range: speed * speed * (2.0 * angle).sin() / g,
        launch_velocity,
    }
}
