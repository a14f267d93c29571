//! Aim-assist target selection
//!
//! Scores every enemy in range against the player's aim direction and picks
//! the best. Alignment with the aim ray dominates, distance discounts, and
//! dangerous archetypes get a stickiness bonus so the reticle prefers them.

use glam::Vec2;

use crate::consts::{AIM_CONE, AIM_RANGE};
use crate::norm_or_east;
use crate::sim::entity::Enemy;

/// Pick the enemy the reticle should snap to, if any.
///
/// An enemy qualifies when it is within [`AIM_RANGE`] and inside the aim
/// cone (dot with the aim direction at least `1.0 - AIM_CONE`). Among
/// qualifiers the highest score wins; on an exact tie the earliest in the
/// slice keeps the slot, so ordering is stable across ticks.
pub fn pick_target<'a>(enemies: &'a [Enemy], origin: Vec2, aim: Vec2) -> Option<&'a Enemy> {
    let (dir, _) = norm_or_east(aim);
    let mut best: Option<(&Enemy, f32)> = None;

    for enemy in enemies {
        let (to_enemy, dist) = norm_or_east(enemy.pos - origin);
        if dist > AIM_RANGE {
            continue;
        }
        let infront = dir.dot(to_enemy);
        if infront < 1.0 - AIM_CONE {
            continue;
        }
        let score = infront * 2.0 - dist / AIM_RANGE + enemy.kind.aim_weight();
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((enemy, score));
        }
    }

    best.map(|(e, _)| e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EnemyKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy_at(kind: EnemyKind, pos: Vec2) -> Enemy {
        let mut rng = Pcg32::seed_from_u64(0);
        Enemy::spawn(kind, pos, 1, &mut rng)
    }

    #[test]
    fn test_no_enemies_no_target() {
        assert!(pick_target(&[], Vec2::ZERO, Vec2::X).is_none());
    }

    #[test]
    fn test_out_of_range_ignored() {
        let enemies = [enemy_at(EnemyKind::Grunt, Vec2::new(AIM_RANGE + 50.0, 0.0))];
        assert!(pick_target(&enemies, Vec2::ZERO, Vec2::X).is_none());
    }

    #[test]
    fn test_behind_player_ignored() {
        let enemies = [enemy_at(EnemyKind::Grunt, Vec2::new(-100.0, 0.0))];
        assert!(pick_target(&enemies, Vec2::ZERO, Vec2::X).is_none());
    }

    #[test]
    fn test_prefers_aligned_over_near() {
        // Both in range and in cone; the dead-ahead one wins despite being
        // farther because alignment is weighted double.
        let aligned = enemy_at(EnemyKind::Grunt, Vec2::new(300.0, 0.0));
        let off_axis = enemy_at(EnemyKind::Grunt, Vec2::new(120.0, 70.0));
        let enemies = [off_axis, aligned];
        let picked = pick_target(&enemies, Vec2::ZERO, Vec2::X).unwrap();
        assert_eq!(picked.pos, Vec2::new(300.0, 0.0));
    }

    #[test]
    fn test_brute_stickiness_wins_ties() {
        // Same position and alignment; the brute's kind weight breaks it
        let grunt = enemy_at(EnemyKind::Grunt, Vec2::new(200.0, 0.0));
        let brute = enemy_at(EnemyKind::Brute, Vec2::new(200.0, 0.0));
        let enemies = [grunt, brute];
        let picked = pick_target(&enemies, Vec2::ZERO, Vec2::X).unwrap();
        assert_eq!(picked.kind, EnemyKind::Brute);
    }

    #[test]
    fn test_exact_tie_keeps_first() {
        let a = enemy_at(EnemyKind::Grunt, Vec2::new(200.0, 0.0));
        let b = enemy_at(EnemyKind::Grunt, Vec2::new(200.0, 0.0));
        let enemies = [a, b];
        let picked = pick_target(&enemies, Vec2::ZERO, Vec2::X).unwrap();
        assert!(std::ptr::eq(picked, &enemies[0]));
    }

    #[test]
    fn test_zero_aim_vector_defaults_east() {
        let enemies = [enemy_at(EnemyKind::Grunt, Vec2::new(150.0, 0.0))];
        assert!(pick_target(&enemies, Vec2::ZERO, Vec2::ZERO).is_some());
    }
}
