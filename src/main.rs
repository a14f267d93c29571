//! Hive Rampage entry point
//!
//! Headless demo runner: simulates a seeded run at the fixed tick rate with a
//! simple autopilot on the controls, printing a HUD snapshot once per
//! simulated second. A frontend would drive the same [`tick`] API with real
//! input and draw from the session state.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use hive_rampage::consts::*;
use hive_rampage::dist_sq;
use hive_rampage::sim::{GameSession, TickInput, pick_target, tick};

/// Simulated seconds per demo run
const DEFAULT_RUN_SECONDS: u32 = 120;
/// Autopilot picks a fresh wander target this often
const WAYPOINT_INTERVAL: f32 = 4.0;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_millis() as u64,
            Err(_) => 0,
        });
    let run_seconds: u32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RUN_SECONDS);

    log::info!("Hive Rampage demo, seed {seed}, {run_seconds}s");

    let mut session = GameSession::new(seed);
    let mut pilot_rng = Pcg32::seed_from_u64(seed ^ 0x5eed);
    let mut waypoint = session.player.pos;
    let mut waypoint_timer = 0.0f32;

    for t in 0..run_seconds as u64 * TICK_RATE as u64 {
        if session.game_over {
            log::info!(
                "game over on wave {} with {} points, restarting",
                session.director.wave,
                session.score
            );
            session = session.restart();
            waypoint = session.player.pos;
        }

        // Wander between far-off floor tiles
        waypoint_timer -= FIXED_DT;
        if waypoint_timer <= 0.0 || dist_sq(session.player.pos, waypoint) < TILE * TILE {
            waypoint = session
                .arena
                .random_floor_far(&mut pilot_rng, session.player.pos, 6.0 * TILE);
            waypoint_timer = WAYPOINT_INTERVAL;
        }

        let to_wp = waypoint - session.player.pos;
        // Fire whenever the assist finds something down the movement vector
        let aim_dir = to_wp.try_normalize().unwrap_or(Vec2::X);
        let target = pick_target(&session.enemies, session.player.pos, aim_dir);
        let input = TickInput {
            move_x: to_wp.x.signum() * (to_wp.x.abs() > TILE) as i32 as f32,
            move_y: to_wp.y.signum() * (to_wp.y.abs() > TILE) as i32 as f32,
            aim: target.map_or(session.player.pos + aim_dir, |e| e.pos),
            fire: target.is_some(),
        };
        tick(&mut session, &input);

        if t % TICK_RATE as u64 == 0 {
            match serde_json::to_string(&session.hud()) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("hud serialization failed: {e}"),
            }
        }
    }

    log::info!(
        "demo finished: wave {}, {} points, {} stims used",
        session.director.wave,
        session.score,
        session.player.stims_used
    );
}
