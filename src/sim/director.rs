//! Wave-spawning director
//!
//! A cyclic state machine (build, push, breather, spike) paces enemy spawns.
//! A budget accrues every tick and is debited per spawn, an intensity ramp
//! slowly inflates accrual over the whole session, and a pressure gate stops
//! spawning outright while too many enemies crowd the player.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{FIXED_DT, PRESSURE_CAP, PRESSURE_RADIUS, frames};
use crate::dist_sq;
use crate::sim::arena::Arena;
use crate::sim::camera::Camera;
use crate::sim::entity::{Enemy, EnemyKind, Player};

/// Hard ceiling on the intensity ramp
const MAX_INTENSITY: f32 = 3.0;
/// Intensity gain per second
const INTENSITY_RAMP: f32 = 0.006;

/// Phases of the spawn cycle, in order. Each `spike -> build` wrap advances
/// the wave counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectorState {
    /// Long steady trickle of basic enemies
    Build,
    /// Short burst of fast spawns
    Push,
    /// Near-silence so the player can reposition
    Breather,
    /// Expensive elites
    Spike,
}

impl DirectorState {
    /// Phase length in seconds
    fn duration(self) -> f32 {
        match self {
            DirectorState::Build => 5.2,
            DirectorState::Push => 2.0,
            DirectorState::Breather => 1.6,
            DirectorState::Spike => 1.5,
        }
    }

    fn next(self) -> Self {
        match self {
            DirectorState::Build => DirectorState::Push,
            DirectorState::Push => DirectorState::Breather,
            DirectorState::Breather => DirectorState::Spike,
            DirectorState::Spike => DirectorState::Build,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Director {
    pub wave: u32,
    pub state: DirectorState,
    /// Seconds elapsed in the current phase
    pub phase_timer: f32,
    budget: f32,
    spawn_cooldown: f32,
    intensity: f32,
}

impl Default for Director {
    fn default() -> Self {
        Self::new()
    }
}

impl Director {
    pub fn new() -> Self {
        Self {
            wave: 1,
            state: DirectorState::Build,
            phase_timer: 0.0,
            budget: 0.0,
            spawn_cooldown: 0.0,
            intensity: 1.0,
        }
    }

    /// Advance one tick: accrue budget, run phase transitions, and maybe
    /// spawn a single enemy.
    pub fn tick(
        &mut self,
        arena: &Arena,
        player: &Player,
        enemies: &mut Vec<Enemy>,
        camera: &mut Camera,
        rng: &mut Pcg32,
    ) {
        self.phase_timer += FIXED_DT;
        self.intensity = (self.intensity + FIXED_DT * INTENSITY_RAMP).min(MAX_INTENSITY);
        self.budget += FIXED_DT * (0.8 + self.wave as f32 * 0.18) * self.intensity;

        if self.phase_timer >= self.state.duration() {
            if self.state == DirectorState::Spike {
                self.wave += 1;
                log::info!("wave {} begins (intensity {:.2})", self.wave, self.intensity);
            }
            self.state = self.state.next();
            self.phase_timer = 0.0;
        }

        // Pressure gate: checked before the cooldown ticks down, so a
        // crowded player also stalls the spawn timer.
        let pressure = enemies
            .iter()
            .filter(|e| dist_sq(e.pos, player.pos) < PRESSURE_RADIUS * PRESSURE_RADIUS)
            .count();
        if pressure >= PRESSURE_CAP {
            return;
        }

        self.spawn_cooldown -= FIXED_DT;
        if self.spawn_cooldown > 0.0 {
            return;
        }

        let spawn_pos = arena.random_spawn_point(rng, player.pos);

        let (kind, cost) = match self.state {
            DirectorState::Build => {
                self.spawn_cooldown = 0.24;
                let kind = if rng.random::<f32>() < 0.22 {
                    EnemyKind::Runner
                } else {
                    EnemyKind::Grunt
                };
                (kind, kind.cost())
            }
            DirectorState::Push => {
                self.spawn_cooldown = 0.17;
                camera.add_shake(0.8, frames(6));
                let kind = if rng.random::<f32>() < 0.40 {
                    EnemyKind::Runner
                } else {
                    EnemyKind::Grunt
                };
                (kind, kind.cost())
            }
            DirectorState::Breather => {
                // Mostly idle; occasionally leak a lone grunt
                if rng.random::<f32>() < 0.18 {
                    self.spawn_cooldown = 0.35;
                    (EnemyKind::Grunt, EnemyKind::Grunt.cost())
                } else {
                    self.spawn_cooldown = 0.20;
                    return;
                }
            }
            DirectorState::Spike => {
                self.spawn_cooldown = 0.32;
                camera.add_shake(1.6, frames(10));
                let kind = if rng.random::<f32>() < 0.55 {
                    EnemyKind::Shooter
                } else {
                    EnemyKind::Brute
                };
                (kind, kind.cost())
            }
        };

        // Cooldown was reset above either way; only the spawn itself is
        // gated on budget.
        if self.budget >= cost {
            self.budget -= cost;
            enemies.push(Enemy::spawn(kind, spawn_pos, self.wave, rng));
        }
    }

    #[cfg(test)]
    fn budget(&self) -> f32 {
        self.budget
    }
}
