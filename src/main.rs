//! Iso Golf headless demo
//!
//! Builds a seeded demo course, then lets a simple autoplayer take shots
//! through the regular `tick` entry point at a fixed 60 Hz wall clock.
//!
//! Usage: `iso-golf [seed] [tuning.json]`

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use iso_golf::sim::terrain::cell_of;
use iso_golf::consts::OUT_OF_BOUNDS_HEIGHT;
use iso_golf::sim::{
    AimInput, GameEvent, GamePhase, GameState, Level, ShotEvent, TerrainKind, TerrainTile,
    TickInput, compute_aim, simulate_frame, tick,
};
use iso_golf::{GolfError, Tuning, heading, horizontal_distance};

/// Demo course length along x
const COURSE_LENGTH: i32 = 36;
/// Demo course half width along z
const COURSE_HALF_WIDTH: i32 = 6;
/// Levels played before the demo ends
const DEMO_LEVELS: u32 = 3;
/// Safety cap on simulated frames per level
const MAX_FRAMES_PER_LEVEL: u32 = 60 * 120;

const FRAME_SECS: f64 = 1.0 / 60.0;

/// Power settings tried per club when planning
const POWER_STEPS: u32 = 20;
/// Frames a rehearsed shot may run before it counts as lost
const REHEARSAL_FRAMES: u32 = 60 * 12;
/// Closer than this to the current distance counts as progress
const MIN_PROGRESS: f32 = 0.5;
/// Heading offsets (degrees) tried first
const NARROW_FAN: [f32; 3] = [0.0, 12.0, -12.0];
/// Heading offsets tried when the hole line is blocked
const WIDE_FAN: [f32; 9] = [30.0, -30.0, 60.0, -60.0, 90.0, -90.0, 135.0, -135.0, 180.0];

/// Stand-in for the external course generator
fn build_demo_level(rng: &mut Pcg32) -> Result<Level, GolfError> {
    let tee = (1, 0);
    let hole = (COURSE_LENGTH - 3, rng.random_range(-2..=2));
    let water_x = rng.random_range(12..COURSE_LENGTH - 10);
    let sand_center = (rng.random_range(8..COURSE_LENGTH - 6), rng.random_range(-3..=3));

    let mut tiles = Vec::new();
    for x in 0..=COURSE_LENGTH {
        for z in -COURSE_HALF_WIDTH..=COURSE_HALF_WIDTH {
            let height = 0.4 * ((x as f32) * 0.2).sin() + 0.1 * (z as f32).abs() / 2.0;
            let near_hole = (x - hole.0).abs() <= 2 && (z - hole.1).abs() <= 2;
            let near_tee = (x - tee.0).abs() <= 2 && (z - tee.1).abs() <= 2;
            let kind = if (x, z) == tee || near_hole {
                TerrainKind::Green
            } else if z.abs() >= COURSE_HALF_WIDTH - 1 {
                if rng.random_bool(0.2) {
                    TerrainKind::Tree
                } else {
                    TerrainKind::Rough
                }
            } else if x == water_x && z.abs() <= 2 {
                TerrainKind::Water
            } else if (x - sand_center.0).abs() <= 1 && (z - sand_center.1).abs() <= 1 {
                TerrainKind::Sand
            } else if !near_tee && rng.random_bool(0.03) {
                TerrainKind::Obstacle
            } else if rng.random_bool(0.05) {
                TerrainKind::Gravel
            } else {
                TerrainKind::Fairway
            };
            tiles.push(TerrainTile::new(x, z, height, kind));
        }
    }

    Level::new(tiles, tee, hole)
}

/// Where a rehearsed shot ends up: distance to the hole at rest, 0 when holed
///
/// `None` for shots that end in water, the void or off the tiles.
fn rehearse(state: &GameState, launch: Vec3) -> Option<f32> {
    let mut ball = state.ball.clone();
    ball.launch(launch);
    let frame_dt = FRAME_SECS as f32;
    for _ in 0..REHEARSAL_FRAMES {
        match simulate_frame(&mut ball, frame_dt, &state.level, &state.tuning.physics) {
            Some(ShotEvent::Holed) => return Some(0.0),
            Some(ShotEvent::Water | ShotEvent::Void) => return None,
            Some(ShotEvent::Rested) => break,
            None => {}
        }
    }
    if ball.is_moving {
        return None;
    }

    let pos = ball.position;
    match state.level.terrain.lookup(pos.x, pos.z) {
        Some(tile) if tile.kind != TerrainKind::Water && pos.y >= OUT_OF_BOUNDS_HEIGHT => {
            Some(horizontal_distance(pos, state.level.hole))
        }
        _ => None,
    }
}

/// Best (distance, aim) over every club and power, fanned around the hole line
fn best_shot(state: &GameState, fan: &[f32]) -> Option<(f32, AimInput)> {
    let ball = state.ball.position;
    let hole = state.level.hole;
    let toward = Vec2::new(hole.x - ball.x, hole.z - ball.z).normalize_or_zero();
    let rules = &state.tuning.rules;

    let mut best: Option<(f32, AimInput)> = None;
    for &offset in fan {
        let direction = Vec2::from_angle(offset.to_radians()).rotate(toward);
        for (club, spec) in state.tuning.clubs.iter().enumerate() {
            for i in 1..=POWER_STEPS {
                let drag = -direction * rules.max_drag_length * i as f32 / POWER_STEPS as f32;
                let aim = compute_aim(drag, spec, &state.tuning.physics, rules);
                if aim.power_ratio < rules.min_shot_power {
                    continue;
                }
                let Some(distance) = rehearse(state, aim.launch_velocity) else {
                    continue;
                };
                if best.is_none_or(|(d, _)| distance < d) {
                    best = Some((distance, AimInput { drag, club }));
                }
                if distance == 0.0 {
                    return best;
                }
            }
        }
    }
    best
}

/// Pick the shot that rehearses closest to the hole
///
/// Shots are played out on a copy of the ball through `simulate_frame`, so
/// the roll after landing counts. When nothing along the hole line makes
/// progress, a wider fan looks for a way around trees and rocks.
fn plan_shot(state: &GameState) -> AimInput {
    let here = horizontal_distance(state.ball.position, state.level.hole);
    let narrow = best_shot(state, &NARROW_FAN);
    if let Some((distance, aim)) = narrow {
        if distance == 0.0 || distance < here - MIN_PROGRESS {
            return aim;
        }
    }

    let wide = best_shot(state, &WIDE_FAN);
    match (narrow, wide) {
        (Some(n), Some(w)) if w.0 < n.0 => w.1,
        (Some(n), _) => n.1,
        (None, Some(w)) => w.1,
        (None, None) => {
            log::debug!("No safe shot found, tapping toward the hole");
            let hole = state.level.hole - state.ball.position;
            AimInput {
                drag: -Vec2::new(hole.x, hole.z).normalize_or_zero() * state.tuning.rules.max_drag_length * 0.2,
                club: state.tuning.clubs.len().saturating_sub(1),
            }
        }
    }
}

fn load_tuning(path: Option<String>) -> Result<Tuning, GolfError> {
    match path {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json),
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path, e);
                Ok(Tuning::default())
            }
        },
        None => Ok(Tuning::default()),
    }
}

/// Autoplay the current level until it is holed, lost or the frame cap hits
fn play_level(state: &mut GameState, now: &mut f64) -> Option<GameEvent> {
    let mut shots = 0;
    for _ in 0..MAX_FRAMES_PER_LEVEL {
        *now += FRAME_SECS;

        let input = if state.phase == GamePhase::Aiming {
            TickInput {
                aim: Some(plan_shot(state)),
                release: true,
                ..Default::default()
            }
        } else {
            TickInput::default()
        };

        match tick(state, &input, *now) {
            Some(GameEvent::ShotReleased) => {
                shots += 1;
                if let Some(ghost) = &state.ghost {
                    log::info!(
                        "Shot {}: heading {:.0}°, predicted carry {:.1}, apex {:.1}, landing {:?}",
                        shots,
                        heading(state.ball.velocity).to_degrees(),
                        ghost.range,
                        ghost.max_height,
                        ghost.landing().map(|p| cell_of(p.x, p.z))
                    );
                }
            }
            Some(GameEvent::LevelComplete) => {
                log::info!("Holed out in {} shots", shots);
                return Some(GameEvent::LevelComplete);
            }
            Some(GameEvent::GameOver) => {
                log::info!("Out of shots after {} levels", state.levels_completed);
                return Some(GameEvent::GameOver);
            }
            Some(event) => log::debug!("{:?} at {:?}", event, state.ball.position),
            None => {}
        }
    }

    log::warn!("Level did not finish within {} frames", MAX_FRAMES_PER_LEVEL);
    None
}

fn run_demo(seed: u64, tuning: Tuning) -> Result<(), GolfError> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut state = GameState::new(build_demo_level(&mut rng)?, tuning)?;
    let mut now = 0.0;

    while play_level(&mut state, &mut now) == Some(GameEvent::LevelComplete)
        && state.levels_completed < DEMO_LEVELS
    {
        state.next_level(build_demo_level(&mut rng)?);
    }

    log::info!("Demo finished: {} levels completed", state.levels_completed);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x601F);
    log::info!("Iso Golf demo starting with seed: {}", seed);

    let result = load_tuning(args.next()).and_then(|tuning| run_demo(seed, tuning));
    if let Err(e) = result {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; hosts drive `tick` themselves
}
