//! Hive Rampage - A top-down arcade survival shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (arena generation, wave director,
//!   entities, combat resolution, camera)
//!
//! The simulation is rendering-agnostic: it exposes tile/decoration lookups
//! and entity positions for whatever draws them, and consumes only abstract
//! per-tick input (move axes, pointer position, fire).

pub mod sim;

use glam::Vec2;

/// Game configuration constants
///
/// Timers are in seconds. Several were tuned as frame counts at the fixed
/// 60 Hz tick; those are converted via [`consts::frames`] so the counts stay
/// legible. Per-tick decay coefficients (friction, camera smoothing, shake
/// decay) assume the fixed tick rate.
pub mod consts {
    /// Fixed simulation tick rate (Hz)
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep
    pub const FIXED_DT: f32 = 1.0 / TICK_RATE;

    /// Convert a 60 fps frame count to seconds
    pub const fn frames(n: u32) -> f32 {
        n as f32 / TICK_RATE
    }

    /// Tile size in pixels
    pub const TILE: f32 = 32.0;
    /// World dimensions in tiles
    pub const WORLD_W: i32 = 120;
    pub const WORLD_H: i32 = 90;

    /// Viewport dimensions (camera centers the player in this window)
    pub const SCREEN_W: f32 = 960.0;
    pub const SCREEN_H: f32 = 540.0;

    /// Collision half-extent for player and enemies
    pub const ENTITY_RADIUS: f32 = 14.0;

    /// Player movement
    pub const PLAYER_ACC: f32 = 25.0;
    pub const PLAYER_MAX_SPEED: f32 = 450.0;
    /// Per-tick velocity friction
    pub const PLAYER_FRICTION: f32 = 0.82;
    /// Per-tick drag while turning against existing velocity
    pub const PLAYER_TURN_DRAG: f32 = 0.88;
    /// Diagonal input raises the speed cap for smooth radial movement
    pub const DIAGONAL_SPEED_BOOST: f32 = 1.55;
    /// Footstep camera-shake cadence while moving
    pub const FOOTSTEP_INTERVAL: f32 = frames(14);

    /// Player weapon
    pub const SHOT_COOLDOWN: f32 = frames(6);
    pub const PLAYER_BULLET_SPEED: f32 = 520.0;
    pub const PLAYER_BULLET_LIFE: f32 = 0.75;

    /// Aim assist: range, and cone threshold expressed as 1 - AIM_CONE on
    /// the facing·direction dot product
    pub const AIM_RANGE: f32 = 10.0 * TILE;
    pub const AIM_CONE: f32 = 0.45;

    /// Spawning & fairness
    pub const SAFE_SPAWN_DIST: f32 = 8.0 * TILE;
    pub const PRESSURE_RADIUS: f32 = 3.0 * TILE;
    pub const PRESSURE_CAP: usize = 4;
    pub const GLOBAL_DMG_COOLDOWN: f32 = frames(12);
    pub const IFRAMES: f32 = frames(18);

    /// Player health & shield
    pub const PLAYER_MAX_HP: i32 = 12;
    pub const PLAYER_MAX_SHIELD: f32 = 15.0;
    /// Seconds after firing before shield regen starts
    pub const SHIELD_REGEN_DELAY: f32 = 1.2;
    /// Shield points per second
    pub const SHIELD_REGEN_RATE: f32 = 2.0;

    /// Enemy combat
    pub const ENEMY_BULLET_SPEED: f32 = 250.0;
    pub const ENEMY_BULLET_LIFE: f32 = 1.2;
    pub const ENEMY_SHOOT_RANGE: f32 = 9.0 * TILE;
    /// Pursuit speed multiplier (stat speed → pixels/sec)
    pub const ENEMY_SPEED_SCALE: f32 = 120.0;
    /// Bullet-entity hit radius
    pub const BULLET_HIT_RADIUS: f32 = 18.0;
    /// Melee contact range and per-enemy re-hit cooldown
    pub const MELEE_RANGE: f32 = 22.0;
    pub const MELEE_COOLDOWN: f32 = frames(24);
    /// Player is bounced this many pixels away from a melee hit
    pub const MELEE_BOUNCE: f32 = 28.0;
    /// Knockback velocity applied to a melee attacker, decaying per tick
    pub const KNOCKBACK_SPEED: f32 = 450.0;
    pub const KNOCKBACK_DECAY: f32 = 0.85;

    /// Pickups
    pub const PICKUP_RADIUS: f32 = 24.0;
    /// Chance per enemy kill to drop a pickup
    pub const PICKUP_DROP_CHANCE: f64 = 0.25;
    pub const HEALTH_PICKUP_AMOUNT: i32 = 3;
    pub const SHIELD_PICKUP_AMOUNT: f32 = 5.0;
    pub const PICKUP_LIFETIME: f32 = 15.0;

    /// Grenades - configured but not yet wired into the tick
    pub const GRENADE_COOLDOWN: f32 = 3.0;
    pub const GRENADE_RADIUS: f32 = 240.0;
    pub const GRENADE_DAMAGE: i32 = 4;
    pub const GRENADE_KNOCKBACK: f32 = 800.0;
    pub const MAX_GRENADES: u32 = 5;
    pub const GRENADE_PICKUP_CHANCE: f64 = 0.08;

    /// Scoring
    pub const COMBO_WINDOW: f32 = 1.5;
    /// Bonus multiplier per combo level (1.0, 1.5, 2.0, ...)
    pub const COMBO_MULTIPLIER: f32 = 0.5;
    pub const WAVE_BONUS_BASE: u64 = 100;

    /// Stim packs (auto-revive)
    pub const MAX_STIMS: u32 = 3;
    pub const STIM_IFRAMES: f32 = 1.0;

    /// Camera: fraction of the gap closed per tick, shake power cap, and
    /// per-tick shake power decay
    pub const CAMERA_FOLLOW: f32 = 0.13;
    pub const SHAKE_MAX_POWER: f32 = 18.0;
    pub const SHAKE_DECAY: f32 = 0.90;
}

/// Squared distance between two points (avoids sqrt in hot loops)
#[inline]
pub fn dist_sq(a: Vec2, b: Vec2) -> f32 {
    (a - b).length_squared()
}

/// Normalize a vector, returning (unit, magnitude).
///
/// A near-zero input yields `(Vec2::X, 1.0)` so callers always get a usable
/// direction.
#[inline]
pub fn norm_or_east(v: Vec2) -> (Vec2, f32) {
    let d = v.length();
    if d < 1e-6 { (Vec2::X, 1.0) } else { (v / d, d) }
}

/// Linear interpolation between a and b by factor t
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
