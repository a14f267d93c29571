//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (session-owned Pcg32)
//! - No rendering or platform dependencies
//!
//! The renderer's view of the world is read-only: tile solidity and
//! decoration maps from [`Arena`], entity positions and kind tags, and the
//! camera's screen-space transform.

pub mod arena;
pub mod camera;
pub mod director;
pub mod entity;
pub mod state;
pub mod targeting;
pub mod tick;

pub use arena::{Arena, DecalKind, HazardKind, PropKind, Room, TileAnimKind};
pub use camera::Camera;
pub use director::{Director, DirectorState};
pub use entity::{Bullet, BulletOwner, Enemy, EnemyKind, Pickup, PickupKind, Player, try_move};
pub use state::{GameSession, HudSnapshot};
pub use targeting::pick_target;
pub use tick::{TickInput, tick};
