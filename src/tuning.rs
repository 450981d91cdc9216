//! Data-driven physics constants, club table and game rules
//!
//! Supplied by the host at level load and immutable for the level's lifetime.
//! Everything is validated before a `GameState` accepts it.

use serde::{Deserialize, Serialize};

use crate::consts::GHOST_MAX_STEPS;
use crate::error::GolfError;
use crate::sim::terrain::TerrainKind;

/// Physical constants used by the stepper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Linear air drag coefficient (1/s)
    pub air_drag: f32,
    /// Ground bounce restitution
    pub restitution: f32,
    /// Speed cap applied after forces
    pub max_velocity: f32,
    /// Live ball stops when slower than this near the floor
    pub min_velocity_to_stop: f32,

    // === Rolling friction per terrain ===
    pub friction_ground: f32,
    pub friction_rough: f32,
    pub friction_sand: f32,
    pub friction_gravel: f32,
    pub friction_green: f32,

    // === Obstacle response (tuning, not physical) ===
    /// Fraction of horizontal speed kept after reflecting off a tree/rock
    pub obstacle_restitution: f32,
    /// Extra damping applied on top of obstacle restitution
    pub obstacle_damping: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 35.0,
            air_drag: 0.05,
            restitution: 0.45,
            max_velocity: 60.0,
            min_velocity_to_stop: 0.15,

            friction_ground: 0.35,
            friction_rough: 0.8,
            friction_sand: 1.6,
            friction_gravel: 0.6,
            friction_green: 0.2,

            obstacle_restitution: 0.7,
            obstacle_damping: 0.9,
        }
    }
}

impl PhysicsConfig {
    /// Rolling friction coefficient for a terrain kind (`None` = no tile)
    pub fn friction_for(&self, kind: Option<TerrainKind>) -> f32 {
        match kind {
            Some(TerrainKind::Fairway) => self.friction_ground,
            Some(TerrainKind::Rough) => self.friction_rough,
            Some(TerrainKind::Sand) => self.friction_sand,
            Some(TerrainKind::Gravel) => self.friction_gravel,
            Some(TerrainKind::Green) => self.friction_green,
            Some(TerrainKind::Water) => crate::consts::WATER_FRICTION,
            _ => self.friction_ground,
        }
    }

    /// Reject non-finite or out-of-range constants
    pub fn validate(&self) -> Result<(), GolfError> {
        require_positive("gravity", self.gravity)?;
        require_non_negative("air_drag", self.air_drag)?;
        require_unit("restitution", self.restitution)?;
        require_positive("max_velocity", self.max_velocity)?;
        require_positive("min_velocity_to_stop", self.min_velocity_to_stop)?;
        require_positive("friction_ground", self.friction_ground)?;
        require_positive("friction_rough", self.friction_rough)?;
        require_positive("friction_sand", self.friction_sand)?;
        require_positive("friction_gravel", self.friction_gravel)?;
        require_positive("friction_green", self.friction_green)?;
        require_unit("obstacle_restitution", self.obstacle_restitution)?;
        require_unit("obstacle_damping", self.obstacle_damping)?;
        Ok(())
    }
}

/// One entry of the club table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub name: String,
    /// Force at full power (N)
    pub max_force: f32,
    /// Launch elevation (degrees)
    pub launch_angle_deg: f32,
    /// Predictor steps shown in the live aim preview
    pub preview_steps: usize,
}

impl Club {
    pub fn new(name: &str, max_force: f32, launch_angle_deg: f32, preview_steps: usize) -> Self {
        Self {
            name: name.to_string(),
            max_force,
            launch_angle_deg,
            preview_steps,
        }
    }

    fn validate(&self) -> Result<(), GolfError> {
        require_positive("club.max_force", self.max_force)?;
        require_non_negative("club.launch_angle_deg", self.launch_angle_deg)?;
        if self.launch_angle_deg >= 90.0 {
            return Err(GolfError::InvalidConfig {
                field: "club.launch_angle_deg",
                value: self.launch_angle_deg,
            });
        }
        if self.preview_steps > GHOST_MAX_STEPS {
            return Err(GolfError::InvalidConfig {
                field: "club.preview_steps",
                value: self.preview_steps as f32,
            });
        }
        Ok(())
    }
}

/// Shot/turn rules for the phase machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Shots available per level
    pub lives_per_level: u32,
    /// Power ratio below which a release is ignored
    pub min_shot_power: f32,
    /// Drag length that maps to full power
    pub max_drag_length: f32,
    /// Seconds spent in OutOfBounds before the ball is restored
    pub out_of_bounds_delay: f32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            lives_per_level: 6,
            min_shot_power: 0.05,
            max_drag_length: 3.0,
            out_of_bounds_delay: 1.5,
        }
    }
}

impl GameRules {
    fn validate(&self) -> Result<(), GolfError> {
        if self.lives_per_level == 0 {
            return Err(GolfError::InvalidConfig {
                field: "lives_per_level",
                value: 0.0,
            });
        }
        require_unit("min_shot_power", self.min_shot_power)?;
        require_positive("max_drag_length", self.max_drag_length)?;
        require_non_negative("out_of_bounds_delay", self.out_of_bounds_delay)?;
        Ok(())
    }
}

/// Complete tuning bundle handed to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default = "default_clubs")]
    pub clubs: Vec<Club>,
    #[serde(default)]
    pub rules: GameRules,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            clubs: default_clubs(),
            rules: GameRules::default(),
        }
    }
}

fn default_clubs() -> Vec<Club> {
    vec![
        Club::new("Driver", 2300.0, 14.0, 12),
        Club::new("Iron", 1650.0, 28.0, 14),
        Club::new("Wedge", 1200.0, 48.0, 18),
        Club::new("Putter", 650.0, 0.0, 30),
    ]
}

impl Tuning {
    /// Parse and validate a tuning bundle from JSON (missing sections use defaults)
    pub fn from_json(json: &str) -> Result<Self, GolfError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning with {} clubs", tuning.clubs.len());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, GolfError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), GolfError> {
        let result = self.check();
        if let Err(e) = &result {
            log::warn!("Rejected tuning: {}", e);
        }
        result
    }

    fn check(&self) -> Result<(), GolfError> {
        self.physics.validate()?;
        self.rules.validate()?;
        if self.clubs.is_empty() {
            return Err(GolfError::NoClubs);
        }
        for club in &self.clubs {
            club.validate()?;
        }
        Ok(())
    }

    pub fn club(&self, index: usize) -> Result<&Club, GolfError> {
        self.clubs.get(index).ok_or(GolfError::UnknownClub(index))
    }

    /// Case-insensitive club lookup by name
    pub fn club_index(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.clubs.iter().position(|c| c.name.to_lowercase() == name)
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), GolfError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GolfError::InvalidConfig { field, value })
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), GolfError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GolfError::InvalidConfig { field, value })
    }
}

fn require_unit(field: &'static str, value: f32) -> Result<(), GolfError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GolfError::InvalidConfig { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_and_partial_sections() {
        let json = Tuning::default().to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), Tuning::default());

        let partial = r#"{ "physics": { "gravity": 20.0 } }"#;
        let tuning = Tuning::from_json(partial).unwrap();
        assert_eq!(tuning.physics.gravity, 20.0);
        assert_eq!(tuning.physics.air_drag, PhysicsConfig::default().air_drag);
        assert_eq!(tuning.clubs.len(), 4);
    }

    #[test]
    fn test_rejects_bad_constants() {
        let mut tuning = Tuning::default();
        tuning.physics.gravity = -1.0;
        assert!(matches!(
            tuning.validate(),
            Err(GolfError::InvalidConfig { field: "gravity", .. })
        ));

        let mut tuning = Tuning::default();
        tuning.physics.friction_sand = f32::INFINITY;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.clubs.clear();
        assert!(matches!(tuning.validate(), Err(GolfError::NoClubs)));

        let mut tuning = Tuning::default();
        tuning.clubs[0].preview_steps = 1 << 40;
        assert!(matches!(
            tuning.validate(),
            Err(GolfError::InvalidConfig { field: "club.preview_steps", .. })
        ));

        assert!(matches!(Tuning::from_json("{ nope"), Err(GolfError::Json(_))));
    }

    #[test]
    fn test_friction_table() {
        let cfg = PhysicsConfig::default();
        assert_eq!(cfg.friction_for(Some(TerrainKind::Sand)), cfg.friction_sand);
        assert_eq!(cfg.friction_for(Some(TerrainKind::Green)), cfg.friction_green);
        assert_eq!(cfg.friction_for(Some(TerrainKind::Water)), 0.5);
        assert_eq!(cfg.friction_for(None), cfg.friction_ground);
        assert_eq!(cfg.friction_for(Some(TerrainKind::Tree)), cfg.friction_ground);
    }

    #[test]
    fn test_club_lookup() {
        let tuning = Tuning::default();
        assert_eq!(tuning.club_index("putter"), Some(3));
        assert!(tuning.club(3).is_ok());
        assert!(matches!(tuning.club(9), Err(GolfError::UnknownClub(9))));
    }
}
