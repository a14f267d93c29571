//! Session aggregate
//!
//! [`GameSession`] owns every piece of mutable run state: the arena, the
//! camera, the director, all entities, scoring, and the RNG stream. One seed
//! reproduces one run exactly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::TILE;
use crate::sim::arena::Arena;
use crate::sim::camera::Camera;
use crate::sim::director::{Director, DirectorState};
use crate::sim::entity::{Bullet, Enemy, Pickup, Player};

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Single RNG stream; every random decision in the run draws from it
    pub rng: Pcg32,
    pub arena: Arena,
    pub camera: Camera,
    pub director: Director,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub pickups: Vec<Pickup>,
    pub score: u64,
    pub combo: u32,
    /// Seconds left before the combo resets
    pub combo_timer: f32,
    /// Simulation tick counter
    pub ticks: u64,
    pub game_over: bool,
}

impl GameSession {
    /// Build a fresh run: generate the arena and drop the player into the
    /// central command room.
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let arena = Arena::generate(&mut rng);
        let spawn = Vec2::new(
            (arena.w / 2) as f32 * TILE + TILE / 2.0,
            (arena.h / 2) as f32 * TILE + TILE / 2.0,
        );
        log::info!("session start, seed {seed}");
        Self {
            seed,
            rng,
            arena,
            camera: Camera::new(spawn),
            director: Director::new(),
            player: Player::new(spawn),
            enemies: Vec::new(),
            bullets: Vec::new(),
            pickups: Vec::new(),
            score: 0,
            combo: 0,
            combo_timer: 0.0,
            ticks: 0,
            game_over: false,
        }
    }

    /// Start over with a new layout under the successor seed, so a chain of
    /// restarts is as reproducible as the first run.
    pub fn restart(&self) -> GameSession {
        GameSession::new(self.seed.wrapping_add(1))
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            ticks: self.ticks,
            score: self.score,
            combo: self.combo,
            wave: self.director.wave,
            phase: self.director.state,
            hp: self.player.hp,
            shield: self.player.shield,
            grenades: self.player.grenades,
            stims_used: self.player.stims_used,
            enemies: self.enemies.len(),
            bullets: self.bullets.len(),
            game_over: self.game_over,
        }
    }
}

/// Read-only HUD projection, cheap to serialize for logging or a frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub ticks: u64,
    pub score: u64,
    pub combo: u32,
    pub wave: u32,
    pub phase: DirectorState,
    pub hp: i32,
    pub shield: f32,
    pub grenades: u32,
    pub stims_used: u32,
    pub enemies: usize,
    pub bullets: usize,
    pub game_over: bool,
}
