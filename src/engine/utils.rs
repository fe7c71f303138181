//! Shared Utility Functions
//!
//! Planar geometry helpers used by the resolver, the agents and the powers.
//! The simulation is 2D on the ground plane (X/Z); height is carried along
//! for the rendering side but never takes part in a distance check.

use bevy::prelude::*;

/// Distance between two points projected onto the ground plane.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x, a.z).distance(Vec2::new(b.x, b.z))
}

/// Flatten a direction onto the ground plane and normalize it.
///
/// A zero (or purely vertical) direction falls back to +Z so that an attack
/// without aim still goes somewhere.
pub fn planar_direction(direction: Vec3) -> Vec3 {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    let normalized = flat.normalize_or_zero();
    if normalized == Vec3::ZERO {
        Vec3::Z
    } else {
        normalized
    }
}

/// Move `from` toward `to` by at most `max_step` on the ground plane.
///
/// Returns the new position; never overshoots the target.
pub fn step_toward(from: Vec3, to: Vec3, max_step: f32) -> Vec3 {
    let delta = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    let distance = delta.length();
    if distance <= max_step || distance == 0.0 {
        Vec3::new(to.x, from.y, to.z)
    } else {
        from + delta / distance * max_step
    }
}

/// Unit vectors spread evenly around the Y axis, starting at `direction`.
pub fn radial_directions(direction: Vec3, count: usize) -> Vec<Vec3> {
    let base = planar_direction(direction);
    let step = std::f32::consts::TAU / count.max(1) as f32;
    (0..count)
        .map(|i| Quat::from_rotation_y(step * i as f32) * base)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_distance_ignores_height() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 50.0, 4.0);
        assert!((planar_distance(a, b) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_direction_falls_back_to_forward() {
        assert_eq!(planar_direction(Vec3::ZERO), Vec3::Z);
        assert_eq!(planar_direction(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_step_toward_does_not_overshoot() {
        let next = step_toward(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 5.0);
        assert_eq!(next, Vec3::new(1.0, 0.0, 0.0));

        let partial = step_toward(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 2.0);
        assert!((partial.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_radial_directions_are_unit_length() {
        let dirs = radial_directions(Vec3::X, 8);
        assert_eq!(dirs.len(), 8);
        for dir in dirs {
            assert!((dir.length() - 1.0).abs() < 1e-4);
            assert!(dir.y.abs() < 1e-5);
        }
    }
}
