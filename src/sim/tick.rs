//! Frame-driven simulation tick
//!
//! Host loop → `tick` → `GameState::advance` → `simulate_frame` → `step`.
//! Phase transitions are evaluated once per frame, after all substeps.

use glam::Vec2;

use super::physics::{StepEvent, step};
use super::state::{Ball, GameEvent, GamePhase, GameState};
use super::terrain::Level;
use crate::consts::*;
use crate::horizontal_distance;
use crate::tuning::PhysicsConfig;

/// Terminal outcome of a substep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotEvent {
    /// Fell below the void guard
    Void,
    Water,
    Holed,
    /// Came to rest on the floor
    Rested,
}

/// Advance the live ball by one rendered frame
///
/// The frame delta is clamped to `MAX_FRAME_DT` and split into `SUBSTEPS`
/// equal steps. Any terminal event ends the frame early.
pub fn simulate_frame(
    ball: &mut Ball,
    frame_dt: f32,
    level: &Level,
    config: &PhysicsConfig,
) -> Option<ShotEvent> {
    if !ball.is_moving || !frame_dt.is_finite() {
        return None;
    }
    let dt = frame_dt.clamp(0.0, MAX_FRAME_DT) / SUBSTEPS as f32;
    if dt <= 0.0 {
        return None;
    }

    for _ in 0..SUBSTEPS {
        let pre_y = ball.position.y;
        let result = step(ball.position, ball.velocity, dt, config, &level.terrain);
        ball.position = result.position;
        ball.velocity = result.velocity;

        if pre_y < VOID_GUARD_HEIGHT {
            ball.stop();
            return Some(ShotEvent::Void);
        }

        if result.event == Some(StepEvent::Water) {
            ball.stop();
            return Some(ShotEvent::Water);
        }

        let speed = ball.velocity.length();
        if horizontal_distance(ball.position, level.hole) < HOLE_CAPTURE_RADIUS
            && speed < HOLE_CAPTURE_SPEED
        {
            ball.sink(level.hole);
            return Some(ShotEvent::Holed);
        }

        let floor = level.terrain.floor_at(ball.position.x, ball.position.z);
        if speed < config.min_velocity_to_stop
            && (ball.position.y - floor).abs() < REST_HEIGHT_TOLERANCE
        {
            ball.stop();
            return Some(ShotEvent::Rested);
        }
    }

    None
}

/// Wall-clock frame timer that never spans a pause
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    /// Seconds since the previous frame (0 on the first frame after a reset)
    pub fn delta(&mut self, now: f64) -> f32 {
        let dt = self.last.map_or(0.0, |last| (now - last).max(0.0) as f32);
        self.last = Some(now);
        dt
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl GameState {
    /// Advance ball and phase by one frame of `frame_dt` seconds
    pub fn advance(&mut self, frame_dt: f32) -> Option<GameEvent> {
        if self.paused {
            return None;
        }

        match self.phase {
            GamePhase::Executing => {
                let outcome = simulate_frame(
                    &mut self.ball,
                    frame_dt,
                    &self.level,
                    &self.tuning.physics,
                );
                if let Some(outcome) = outcome {
                    log::debug!("Shot ended: {:?} at {:?}", outcome, self.ball.position);
                }
                if self.ball.is_moving {
                    return None;
                }
                Some(self.settle_shot())
            }

            GamePhase::OutOfBounds => {
                self.recovery_timer -= frame_dt.max(0.0);
                if self.recovery_timer > 0.0 {
                    return None;
                }
                self.recovery_timer = 0.0;
                self.ball.restore();
                if self.lives == 0 {
                    self.phase = GamePhase::GameOver;
                    log::info!("Game over after out of bounds");
                    Some(GameEvent::GameOver)
                } else {
                    self.phase = GamePhase::Aiming;
                    log::info!("Ball restored to {:?}", self.ball.position);
                    Some(GameEvent::Recovered)
                }
            }

            _ => None,
        }
    }

    /// Pick the follow-up phase once the ball has stopped
    fn settle_shot(&mut self) -> GameEvent {
        if self.ball.in_hole {
            self.levels_completed += 1;
            self.phase = GamePhase::LevelComplete;
            log::info!("Level complete ({} total)", self.levels_completed);
            GameEvent::LevelComplete
        } else if self.ball_out_of_bounds() {
            self.recovery_timer = self.tuning.rules.out_of_bounds_delay;
            self.phase = GamePhase::OutOfBounds;
            log::info!("Out of bounds at {:?}", self.ball.position);
            GameEvent::OutOfBounds
        } else if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("Game over, {} levels completed", self.levels_completed);
            GameEvent::GameOver
        } else {
            self.phase = GamePhase::Aiming;
            GameEvent::ShotSettled
        }
    }
}

/// Current drag and club from the input handler
#[derive(Debug, Clone, Copy)]
pub struct AimInput {
    pub drag: Vec2,
    pub club: usize,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Drag changed this frame
    pub aim: Option<AimInput>,
    /// Release the shot (pointer up)
    pub release: bool,
    /// Abandon the current aim
    pub cancel_aim: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Apply one frame of input and advance to wall-clock time `now` (seconds)
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) -> Option<GameEvent> {
    if input.pause {
        state.set_paused(!state.paused);
    }
    if state.paused {
        return None;
    }

    let dt = state.clock.delta(now);

    if input.cancel_aim {
        state.cancel_aim();
    }
    if let Some(aim) = input.aim {
        if let Err(e) = state.update_aim(aim.drag, aim.club) {
            log::warn!("Aim ignored: {}", e);
        }
    }
    let released = if input.release {
        state.release_shot()
    } else {
        None
    };

    state.advance(dt).or(released)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::terrain::{TerrainKind, TerrainTile, flat_tiles};
    use crate::tuning::Tuning;
    use glam::Vec3;

    const FRAME: f32 = 1.0 / 60.0;

    fn fairway_level() -> Level {
        Level::new(
            flat_tiles((-5, -5), (40, 5), 0.0, TerrainKind::Fairway),
            (0, 0),
            (30, 0),
        )
        .unwrap()
    }

    fn session_with(level: Level, tuning: Tuning) -> GameState {
        GameState::new(level, tuning).unwrap()
    }

    fn run_until_settled(state: &mut GameState, max_frames: usize) -> Option<GameEvent> {
        for _ in 0..max_frames {
            if let Some(event) = state.advance(FRAME) {
                return Some(event);
            }
        }
        None
    }

    #[test]
    fn test_putt_comes_to_rest() {
        let mut state = session_with(fairway_level(), Tuning::default());
        let putter = state.tuning.club_index("putter").unwrap();
        state.update_aim(Vec2::new(-3.0, 0.0), putter).unwrap();
        state.release_shot();

        let event = run_until_settled(&mut state, 1200);
        assert_eq!(event, Some(GameEvent::ShotSettled));
        assert_eq!(state.phase, GamePhase::Aiming);
        assert!(!state.ball.is_moving);
        assert_eq!(state.ball.velocity, Vec3::ZERO);
        assert!(state.ball.position.x > 1.0);
    }

    #[test]
    fn test_hole_capture() {
        let mut state = session_with(fairway_level(), Tuning::default());
        state.phase = GamePhase::Executing;
        state.ball.position = Vec3::new(29.8, 0.0, 0.0);
        state.ball.launch(Vec3::new(2.0, 0.0, 0.0));

        assert_eq!(state.advance(FRAME), Some(GameEvent::LevelComplete));
        assert!(state.ball.in_hole);
        assert_eq!(state.ball.velocity, Vec3::ZERO);
        assert_eq!(state.ball.position, state.level.hole);
        assert_eq!(state.levels_completed, 1);
        assert_eq!(state.phase, GamePhase::LevelComplete);
    }

    #[test]
    fn test_fast_ball_skips_hole() {
        let level = fairway_level();
        let mut ball = Ball::new(Vec3::new(29.8, 0.0, 0.0));
        ball.launch(Vec3::new(12.0, 0.0, 0.0));
        simulate_frame(&mut ball, FRAME, &level, &PhysicsConfig::default());
        assert!(!ball.in_hole);
    }

    #[test]
    fn test_water_goes_out_of_bounds_and_recovers() {
        let mut tiles = flat_tiles((-5, -5), (2, 5), 0.0, TerrainKind::Fairway);
        tiles.extend(flat_tiles((3, -5), (8, 5), 0.0, TerrainKind::Water));
        let level = Level::new(tiles, (0, 0), (-4, 0)).unwrap();
        let mut state = session_with(level, Tuning::default());

        let checkpoint = Vec3::new(0.25, 0.0, -0.5);
        state.ball.position = checkpoint;
        state.ball.launch(Vec3::ZERO);
        state.ball.position = Vec3::new(4.0, 0.3, 0.0);
        state.ball.velocity = Vec3::new(0.5, -1.0, 0.0);
        state.phase = GamePhase::Executing;

        assert_eq!(run_until_settled(&mut state, 60), Some(GameEvent::OutOfBounds));
        assert!(!state.ball.is_moving);
        assert_eq!(state.phase, GamePhase::OutOfBounds);

        // Still waiting
        assert_eq!(state.advance(0.5), None);
        assert_eq!(state.phase, GamePhase::OutOfBounds);

        assert_eq!(state.advance(1.5), Some(GameEvent::Recovered));
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.ball.position, checkpoint);
        assert_eq!(state.ball.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_water_step_stops_ball() {
        let mut tiles = flat_tiles((0, 0), (0, 0), 0.0, TerrainKind::Fairway);
        tiles.push(TerrainTile::new(1, 0, 0.0, TerrainKind::Water));
        let level = Level::new(tiles, (0, 0), (0, 0)).unwrap();
        let mut ball = Ball::new(Vec3::new(1.0, 0.05, 0.0));
        ball.launch(Vec3::new(0.0, -2.0, 0.0));

        let event = simulate_frame(&mut ball, FRAME, &level, &PhysicsConfig::default());
        assert_eq!(event, Some(ShotEvent::Water));
        assert!(!ball.is_moving);
        assert_eq!(ball.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_falling_off_the_course_is_out_of_bounds() {
        let level = Level::new(vec![TerrainTile::new(0, 0, 0.0, TerrainKind::Fairway)], (0, 0), (0, 0))
            .unwrap();
        let mut state = session_with(level, Tuning::default());
        state.ball.launch(Vec3::new(6.0, 2.0, 0.0));
        state.phase = GamePhase::Executing;

        assert_eq!(run_until_settled(&mut state, 600), Some(GameEvent::OutOfBounds));
        assert!(state.ball.position.y < VOID_GUARD_HEIGHT + 1.0);
    }

    #[test]
    fn test_out_of_bounds_on_last_life_ends_game() {
        let level = Level::new(vec![TerrainTile::new(0, 0, 0.0, TerrainKind::Fairway)], (0, 0), (0, 0))
            .unwrap();
        let mut state = session_with(level, Tuning::default());
        state.lives = 0;
        state.ball.launch(Vec3::new(6.0, 2.0, 0.0));
        state.phase = GamePhase::Executing;

        assert_eq!(run_until_settled(&mut state, 600), Some(GameEvent::OutOfBounds));
        assert_eq!(state.advance(5.0), Some(GameEvent::GameOver));
        assert_eq!(state.ball.position, Vec3::ZERO);
    }

    #[test]
    fn test_last_shot_game_over_and_restart() {
        let mut tuning = Tuning::default();
        tuning.rules.lives_per_level = 1;
        let mut state = session_with(fairway_level(), tuning);
        let putter = state.tuning.club_index("putter").unwrap();
        state.update_aim(Vec2::new(-1.0, 0.0), putter).unwrap();
        state.release_shot();
        assert_eq!(state.lives, 0);

        assert_eq!(run_until_settled(&mut state, 1200), Some(GameEvent::GameOver));
        assert_eq!(state.phase, GamePhase::GameOver);

        // Aiming is locked out
        state.update_aim(Vec2::new(-1.0, 0.0), putter).unwrap();
        assert!(state.aim.is_none());

        assert!(state.restart(fairway_level()));
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.lives, 1);
        assert_eq!(state.ball.position, Vec3::ZERO);
        // Ghost of the last shot survives until the next release
        assert!(state.ghost.is_some());
    }

    #[test]
    fn test_next_level_keeps_counter() {
        let mut state = session_with(fairway_level(), Tuning::default());
        state.phase = GamePhase::Executing;
        state.ball.position = Vec3::new(29.9, 0.0, 0.0);
        state.ball.launch(Vec3::new(1.0, 0.0, 0.0));
        state.advance(FRAME);
        assert_eq!(state.phase, GamePhase::LevelComplete);

        assert!(state.next_level(fairway_level()));
        assert_eq!(state.levels_completed, 1);
        assert_eq!(state.phase, GamePhase::Aiming);
        assert!(!state.ball.in_hole);
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let level = fairway_level();
        let config = PhysicsConfig::default();
        let mut a = Ball::new(Vec3::new(0.0, 5.0, 0.0));
        a.launch(Vec3::new(10.0, 0.0, 0.0));
        let mut b = a.clone();
        simulate_frame(&mut a, 0.1, &level, &config);
        simulate_frame(&mut b, 3.0, &level, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_pause_freezes_ball_without_catch_up() {
        let mut state = session_with(fairway_level(), Tuning::default());
        let driver = state.tuning.club_index("driver").unwrap();
        let release = TickInput {
            aim: Some(AimInput {
                drag: Vec2::new(-3.0, 0.0),
                club: driver,
            }),
            release: true,
            ..Default::default()
        };
        let idle = TickInput::default();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        assert_eq!(tick(&mut state, &release, 0.0), Some(GameEvent::ShotReleased));
        tick(&mut state, &idle, 1.0 / 60.0);
        assert_eq!(state.phase, GamePhase::Executing);

        tick(&mut state, &pause, 2.0 / 60.0);
        assert!(state.paused);
        let frozen = state.ball.clone();
        for i in 0..10 {
            tick(&mut state, &idle, 1.0 + i as f64);
        }
        assert_eq!(state.ball, frozen);
        assert_eq!(state.phase, GamePhase::Executing);

        // Resume frame measures no time at all
        tick(&mut state, &pause, 100.0);
        assert!(!state.paused);
        assert_eq!(state.ball, frozen);

        // Next frame moves by a normal frame only
        tick(&mut state, &idle, 100.0 + 1.0 / 60.0);
        let moved = state.ball.position - frozen.position;
        assert!(moved.length() > 0.0);
        assert!(moved.length() < frozen.velocity.length() * 2.0 / 60.0);
    }

    #[test]
    fn test_non_finite_frame_delta_is_skipped() {
        let mut state = session_with(fairway_level(), Tuning::default());
        state.ball.launch(Vec3::new(3.0, 0.0, 0.0));
        state.phase = GamePhase::Executing;
        let before = state.ball.clone();

        assert_eq!(state.advance(f32::NAN), None);
        assert_eq!(state.advance(f32::INFINITY), None);
        assert_eq!(state.ball, before);

        // Next real frame carries on and the shot still settles
        assert_eq!(run_until_settled(&mut state, 1200), Some(GameEvent::ShotSettled));
        assert!(state.ball.position.is_finite());
        assert_eq!(state.phase, GamePhase::Aiming);
    }

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.delta(5.0), 0.0);
        assert!((clock.delta(5.25) - 0.25).abs() < 1e-6);
        clock.reset();
        assert_eq!(clock.delta(50.0), 0.0);
    }
}
