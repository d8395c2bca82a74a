use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The single pursuing enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    pub position: Vec3,
    /// Units advanced per frame.
    pub speed: f32,
}

impl EnemyState {
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self { position, speed }
    }

    /// Advance one frame straight at `target`, then report whether the enemy
    /// is within `contact_radius` of it.
    ///
    /// When the two positions coincide there is no direction to follow; the
    /// enemy holds still and the contact test still runs.
    pub fn chase(&mut self, target: Vec3, contact_radius: f32) -> bool {
        let direction = (target - self.position).normalize_or_zero();
        self.position += direction * self.speed;
        self.in_contact(target, contact_radius)
    }

    pub fn distance_to(&self, target: Vec3) -> f32 {
        self.position.distance(target)
    }

    pub fn in_contact(&self, target: Vec3, contact_radius: f32) -> bool {
        self.distance_to(target) < contact_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chase_closes_distance_every_frame() {
        let target = Vec3::new(0.0, 0.5, 0.0);
        let mut enemy = EnemyState::new(Vec3::new(5.0, 0.5, 5.0), 0.02);
        let mut last = enemy.distance_to(target);
        let mut frames = 0;
        while !enemy.chase(target, 1.5) {
            let d = enemy.distance_to(target);
            assert!(d < last, "distance grew from {last} to {d}");
            last = d;
            frames += 1;
            assert!(frames < 1_000, "never reached contact");
        }
        assert!(enemy.distance_to(target) < 1.5);
    }

    #[test]
    fn step_length_equals_speed() {
        let mut enemy = EnemyState::new(Vec3::new(10.0, 0.5, 0.0), 0.07);
        let start = enemy.position;
        enemy.chase(Vec3::new(0.0, 0.5, 0.0), 1.5);
        assert!((enemy.position.distance(start) - 0.07).abs() < 1e-6);
        assert!(enemy.position.x < start.x);
    }

    #[test]
    fn contact_threshold_is_strict() {
        let enemy = EnemyState::new(Vec3::new(1.5, 0.0, 0.0), 0.0);
        assert!(!enemy.in_contact(Vec3::ZERO, 1.5));
        let enemy = EnemyState::new(Vec3::new(1.49, 0.0, 0.0), 0.0);
        assert!(enemy.in_contact(Vec3::ZERO, 1.5));
    }

    #[test]
    fn coincident_positions_hold_still_and_touch() {
        let p = Vec3::new(2.0, 0.5, 2.0);
        let mut enemy = EnemyState::new(p, 0.07);
        assert!(enemy.chase(p, 1.5));
        assert_eq!(enemy.position, p);
        assert!(!enemy.position.is_nan());
    }
}
