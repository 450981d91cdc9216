//! Iso Golf - ball physics core for an isometric arcade golf game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain lookup, physics, prediction, game phases)
//! - `tuning`: Data-driven physics constants, club table and game rules
//! - `error`: Error type for level and tuning loading

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::GolfError;
pub use tuning::{Club, GameRules, PhysicsConfig, Tuning};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed substeps per rendered frame
    pub const SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the physics (bounds worst-case travel per step)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ball collision radius
    pub const BALL_RADIUS: f32 = 0.15;
    /// Ball mass used for aim impulse (kg)
    pub const BALL_MASS: f32 = 0.0459;
    /// Club/ball contact time used for aim impulse (s)
    pub const CONTACT_TIME: f32 = 0.0005;

    /// Collider radius of a tree trunk
    pub const TREE_RADIUS: f32 = 0.35;
    /// Collider radius of a rock/obstacle
    pub const OBSTACLE_RADIUS: f32 = 0.45;
    /// Ball clears an obstacle when higher than its tile height plus this
    pub const OBSTACLE_CLEARANCE: f32 = 3.0;
    /// Cells scanned around the ball for obstacles
    pub const OBSTACLE_SCAN_RADIUS: i32 = 2;
    /// Extra push-out distance after an obstacle hit
    pub const COLLISION_EPSILON: f32 = 0.001;

    /// Floor height reported for cells with no tile
    pub const VOID_FLOOR: f32 = -1000.0;
    /// Vertical speed below which a ground contact stops bouncing
    pub const BOUNCE_THRESHOLD: f32 = 0.5;
    /// Friction coefficient of water (the water event fires first)
    pub const WATER_FRICTION: f32 = 0.5;

    /// Horizontal capture radius of the hole
    pub const HOLE_CAPTURE_RADIUS: f32 = 0.3;
    /// Ball must be slower than this to drop into the hole
    pub const HOLE_CAPTURE_SPEED: f32 = 5.0;
    /// Maximum gap between ball and floor for the ball to count as resting
    pub const REST_HEIGHT_TOLERANCE: f32 = 0.1;
    /// Pre-step height below which the live ball is forcibly stopped
    pub const VOID_GUARD_HEIGHT: f32 = -10.0;
    /// A stopped ball below this height is out of bounds
    pub const OUT_OF_BOUNDS_HEIGHT: f32 = -5.0;

    /// Default predictor timestep
    pub const PREDICT_DT: f32 = 0.05;
    /// Vertical speed under which a predicted ball counts as settled
    pub const PREDICT_SETTLE_SPEED: f32 = 0.1;
    /// Step budget for the full-arc ghost of an executed shot
    pub const GHOST_MAX_STEPS: usize = 600;
}

/// Horizontal (x, z) part of a vector, y zeroed
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Length of the horizontal part of a vector
#[inline]
pub fn horizontal_speed(v: Vec3) -> f32 {
    Vec2::new(v.x, v.z).length()
}

/// Horizontal distance between two points
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    horizontal_speed(a - b)
}

/// Unit vector, or zero for zero-length/non-finite input
#[inline]
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    if !v.is_finite() {
        return Vec3::ZERO;
    }
    v.try_normalize().unwrap_or(Vec3::ZERO)
}

/// Heading of the horizontal velocity in radians (0 when not moving horizontally)
#[inline]
pub fn heading(v: Vec3) -> f32 {
    if horizontal_speed(v) <= f32::EPSILON {
        0.0
    } else {
        v.z.atan2(v.x)
    }
}

/// Elevation of a velocity above the horizontal plane, in degrees
#[inline]
pub fn elevation_degrees(v: Vec3) -> f32 {
    v.y.atan2(horizontal_speed(v)).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize_or_zero(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(normalize_or_zero(Vec3::new(f32::NAN, 1.0, 0.0)), Vec3::ZERO);
        let n = normalize_or_zero(Vec3::new(3.0, 0.0, 4.0));
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.z - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_heading_zero_horizontal_speed() {
        assert_eq!(heading(Vec3::new(0.0, 12.0, 0.0)), 0.0);
        let h = heading(Vec3::new(0.0, 0.0, 2.0));
        assert!((h - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_helpers() {
        let v = Vec3::new(3.0, 9.0, 4.0);
        assert_eq!(horizontal(v), Vec3::new(3.0, 0.0, 4.0));
        assert!((horizontal_speed(v) - 5.0).abs() < 1e-6);
        assert!((horizontal_distance(v, Vec3::new(0.0, -2.0, 0.0)) - 5.0).abs() < 1e-6);
        assert!((elevation_degrees(Vec3::new(1.0, 1.0, 0.0)) - 45.0).abs() < 1e-4);
    }
}
