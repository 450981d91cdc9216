//! Game state and core simulation types
//!
//! Everything the render/UI layer reads each frame lives here.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::aim::{AimData, compute_aim};
use super::terrain::{Level, TerrainKind};
use super::tick::FrameClock;
use super::trajectory::TrajectorySample;
use crate::consts::*;
use crate::error::GolfError;
use crate::tuning::Tuning;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Reserved, never entered
    Idle,
    /// Ball at rest, player setting up a shot
    Aiming,
    /// Shot in flight or rolling
    Executing,
    /// Ball holed; waiting for the next level
    LevelComplete,
    /// Ball lost; restored to its checkpoint after a delay
    OutOfBounds,
    /// No shots left
    GameOver,
}

/// Phase-level outcome reported by `advance`/`tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotReleased,
    /// Ball came to rest in play, back to aiming
    ShotSettled,
    LevelComplete,
    OutOfBounds,
    /// Ball restored to its checkpoint after going out of bounds
    Recovered,
    GameOver,
}

/// The live ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vec3,
    /// Always zero while not moving
    pub velocity: Vec3,
    pub is_moving: bool,
    pub in_hole: bool,
    /// Position at the moment the current/last shot began
    pub last_stable_position: Vec3,
}

impl Ball {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            is_moving: false,
            in_hole: false,
            last_stable_position: position,
        }
    }

    /// Checkpoint the current position and start moving
    pub fn launch(&mut self, velocity: Vec3) {
        self.last_stable_position = self.position;
        self.velocity = velocity;
        self.is_moving = true;
    }

    pub fn stop(&mut self) {
        self.velocity = Vec3::ZERO;
        self.is_moving = false;
    }

    /// Drop into the hole at `hole`
    pub fn sink(&mut self, hole: Vec3) {
        self.position = hole;
        self.in_hole = true;
        self.stop();
    }

    /// Return to the last checkpoint
    pub fn restore(&mut self) {
        self.position = self.last_stable_position;
        self.stop();
    }
}

/// Complete session state for one player
#[derive(Debug, Clone)]
pub struct GameState {
    pub level: Level,
    pub tuning: Tuning,
    pub ball: Ball,
    pub phase: GamePhase,
    /// Shots left on this level
    pub lives: u32,
    pub levels_completed: u32,
    /// Current aim readout (None when not aiming)
    pub aim: Option<AimData>,
    /// Live preview for the current aim
    pub preview: Option<TrajectorySample>,
    /// Full-arc prediction of the last executed shot
    pub ghost: Option<TrajectorySample>,
    pub paused: bool,
    /// Seconds left before an out-of-bounds ball is restored
    pub recovery_timer: f32,
    pub clock: FrameClock,
}

impl GameState {
    /// Start a session on `level`; rejects invalid tuning up front
    pub fn new(level: Level, tuning: Tuning) -> Result<Self, GolfError> {
        tuning.validate()?;
        let lives = tuning.rules.lives_per_level;
        let state = Self {
            ball: Ball::new(level.tee),
            level,
            tuning,
            phase: GamePhase::Aiming,
            lives,
            levels_completed: 0,
            aim: None,
            preview: None,
            ghost: None,
            paused: false,
            recovery_timer: 0.0,
            clock: FrameClock::default(),
        };
        log::info!("Session started with {} lives", lives);
        Ok(state)
    }

    /// Recompute aim and preview from the current drag; only while aiming
    pub fn update_aim(&mut self, drag: Vec2, club_index: usize) -> Result<(), GolfError> {
        if self.phase != GamePhase::Aiming || self.paused {
            return Ok(());
        }
        let club = self.tuning.club(club_index)?;
        let aim = compute_aim(drag, club, &self.tuning.physics, &self.tuning.rules);
        self.preview = Some(TrajectorySample::predict(
            self.ball.position,
            aim.launch_velocity,
            &self.tuning.physics,
            &self.level.terrain,
            club.preview_steps,
        ));
        self.aim = Some(aim);
        Ok(())
    }

    /// Abandon the current aim; nothing else changes
    pub fn cancel_aim(&mut self) {
        self.aim = None;
        self.preview = None;
    }

    /// Fire the current aim. Ignored unless aiming with enough power.
    pub fn release_shot(&mut self) -> Option<GameEvent> {
        if self.phase != GamePhase::Aiming || self.paused {
            return None;
        }
        let aim = self.aim?;
        if aim.power_ratio < self.tuning.rules.min_shot_power {
            log::debug!("Shot ignored, power {:.2} below threshold", aim.power_ratio);
            return None;
        }

        self.ghost = Some(TrajectorySample::predict(
            self.ball.position,
            aim.launch_velocity,
            &self.tuning.physics,
            &self.level.terrain,
            GHOST_MAX_STEPS,
        ));
        self.ball.launch(aim.launch_velocity);
        self.lives = self.lives.saturating_sub(1);
        self.cancel_aim();
        self.phase = GamePhase::Executing;
        log::info!(
            "Shot released at {:.1} u/s, {} lives left",
            aim.velocity,
            self.lives
        );
        Some(GameEvent::ShotReleased)
    }

    /// Freeze or unfreeze the simulation; the phase is left alone
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        // Next delta is measured from the first unpaused frame
        self.clock.reset();
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
    }

    /// Install the next level after a hole is completed
    pub fn next_level(&mut self, level: Level) -> bool {
        if self.phase != GamePhase::LevelComplete {
            return false;
        }
        self.install(level);
        log::info!("Level {} started", self.levels_completed + 1);
        true
    }

    /// Start over on a fresh level; not allowed mid-shot
    pub fn restart(&mut self, level: Level) -> bool {
        if self.phase == GamePhase::Executing {
            return false;
        }
        self.levels_completed = 0;
        self.install(level);
        log::info!("Game restarted");
        true
    }

    fn install(&mut self, level: Level) {
        self.ball = Ball::new(level.tee);
        self.level = level;
        self.lives = self.tuning.rules.lives_per_level;
        self.aim = None;
        self.preview = None;
        self.recovery_timer = 0.0;
        self.clock.reset();
        self.phase = GamePhase::Aiming;
    }

    /// Stopped ball is off the course: no tile, water, or fallen too far
    pub fn ball_out_of_bounds(&self) -> bool {
        let pos = self.ball.position;
        match self.level.terrain.lookup(pos.x, pos.z) {
            None => true,
            Some(tile) => tile.kind == TerrainKind::Water || pos.y < OUT_OF_BOUNDS_HEIGHT,
        }
    }
}
