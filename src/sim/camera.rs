//! Smoothed follow camera with procedural shake
//!
//! The camera eases toward its target a fixed fraction per tick and layers a
//! decaying noise-plus-sine shake offset on top. The shake offset is
//! recomputed every tick and never accumulates into the camera position, so
//! the view recenters exactly when the timer runs out.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_FOLLOW, FIXED_DT, SHAKE_DECAY, SHAKE_MAX_POWER};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
    shake_power: f32,
    shake_timer: f32,
    /// Bumped on every shake request to decorrelate the sine phase
    shake_seed: u32,
    offset: Vec2,
}

impl Camera {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            shake_power: 0.0,
            shake_timer: 0.0,
            shake_seed: 0,
            offset: Vec2::ZERO,
        }
    }

    /// Stack a shake impulse onto whatever is already in flight.
    ///
    /// Power accumulates up to a hard cap; the timer keeps whichever deadline
    /// is later so a small late shake never cuts a big one short.
    pub fn add_shake(&mut self, power: f32, duration: f32) {
        self.shake_power = (self.shake_power + power).min(SHAKE_MAX_POWER);
        self.shake_timer = self.shake_timer.max(duration);
        self.shake_seed = self.shake_seed.wrapping_add(1);
    }

    /// Ease toward `target` and advance the shake envelope one tick
    pub fn update(&mut self, target: Vec2, rng: &mut Pcg32) {
        self.pos += (target - self.pos) * CAMERA_FOLLOW;

        if self.shake_timer > 0.0 {
            self.shake_timer -= FIXED_DT;
            self.shake_power *= SHAKE_DECAY;
            let ts = self.shake_seed as f32 * 0.1;
            self.offset = Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0 * self.shake_power
                    + (ts * 12.0).sin() * self.shake_power * 0.35,
                (rng.random::<f32>() - 0.5) * 2.0 * self.shake_power
                    + (ts * 10.0).cos() * self.shake_power * 0.35,
            );
        } else {
            self.shake_power = 0.0;
            self.offset = Vec2::ZERO;
        }
    }

    /// World point to view-space point under the current shake offset
    #[inline]
    pub fn apply(&self, world: Vec2) -> Vec2 {
        world - self.pos + self.offset
    }

    #[cfg(test)]
    fn shake_active(&self) -> bool {
        self.shake_timer > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::frames;
    use rand::SeedableRng;

    #[test]
    fn test_follow_converges_on_static_target() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut cam = Camera::new(Vec2::ZERO);
        let target = Vec2::new(400.0, 300.0);
        for _ in 0..600 {
            cam.update(target, &mut rng);
        }
        assert!((cam.pos - target).length() < 1.0);
    }

    #[test]
    fn test_shake_power_caps() {
        let mut cam = Camera::new(Vec2::ZERO);
        for _ in 0..10 {
            cam.add_shake(8.0, frames(10));
        }
        assert!(cam.shake_power <= SHAKE_MAX_POWER);
    }

    #[test]
    fn test_shake_timer_keeps_longer_deadline() {
        let mut cam = Camera::new(Vec2::ZERO);
        cam.add_shake(4.0, frames(20));
        cam.add_shake(1.0, frames(5));
        assert_eq!(cam.shake_timer, frames(20));
    }

    #[test]
    fn test_offset_clears_when_timer_expires() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut cam = Camera::new(Vec2::ZERO);
        cam.add_shake(6.0, frames(4));
        for _ in 0..3 {
            cam.update(Vec2::ZERO, &mut rng);
            assert!(cam.shake_active());
        }
        for _ in 0..4 {
            cam.update(Vec2::ZERO, &mut rng);
        }
        assert!(!cam.shake_active());
        assert_eq!(cam.offset, Vec2::ZERO);
        assert_eq!(cam.shake_power, 0.0);
        assert_eq!(cam.apply(Vec2::new(10.0, 10.0)), Vec2::new(10.0, 10.0) - cam.pos);
    }
}
