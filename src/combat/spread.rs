//! Bullet spread - stance-dependent cone selection and direction perturbation.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::character::Stance;

/// Random source for weapon inaccuracy.
#[derive(Resource)]
pub struct WeaponRng(pub StdRng);

impl Default for WeaponRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl WeaponRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// Spread half-angles in degrees, one per stance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadAngles {
    pub default: f32,
    pub aiming: f32,
    pub crouched: f32,
    pub moving: f32,
}

impl Default for SpreadAngles {
    fn default() -> Self {
        Self {
            default: 5.0,
            aiming: 0.0,
            crouched: 2.0,
            moving: 7.0,
        }
    }
}

impl SpreadAngles {
    /// Spread for the given stance, in degrees.
    ///
    /// Rules are checked in priority order and the first active one wins:
    /// aiming, then crouched, then moving. A character that is none of these
    /// uses the default spread.
    pub fn select(&self, stance: &Stance) -> f32 {
        let rules = [
            (stance.aiming, self.aiming),
            (stance.crouched, self.crouched),
            (stance.moving, self.moving),
        ];

        rules
            .iter()
            .find(|(active, _)| *active)
            .map_or(self.default, |(_, spread)| *spread)
    }
}

/// Random direction inside a cone around `direction`.
///
/// Directions are uniformly distributed over the cone's solid angle: the
/// cosine of the deviation is drawn uniformly, which keeps shots from
/// clustering around the axis.
pub fn random_cone_direction<R: Rng + ?Sized>(
    rng: &mut R,
    direction: Vec3,
    half_angle: f32,
) -> Vec3 {
    let axis = direction.normalize_or_zero();
    if axis == Vec3::ZERO || half_angle <= 0.0 {
        return axis;
    }

    let half_angle = half_angle.min(PI);
    let cos_theta = rng.gen_range(half_angle.cos()..=1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = rng.gen_range(0.0..TAU);

    let (tangent, bitangent) = axis.any_orthonormal_pair();
    let radial = tangent * phi.cos() + bitangent * phi.sin();

    (axis * cos_theta + radial * sin_theta).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stance(aiming: bool, crouched: bool, moving: bool) -> Stance {
        Stance {
            aiming,
            crouched,
            moving,
        }
    }

    #[test]
    fn aiming_wins_over_everything() {
        let spread = SpreadAngles {
            default: 5.0,
            aiming: 0.5,
            crouched: 2.0,
            moving: 7.0,
        };
        assert_eq!(spread.select(&stance(true, true, true)), 0.5);
        assert_eq!(spread.select(&stance(true, false, true)), 0.5);
    }

    #[test]
    fn crouched_wins_over_moving() {
        let spread = SpreadAngles::default();
        assert_eq!(spread.select(&stance(false, true, true)), 2.0);
    }

    #[test]
    fn moving_and_default() {
        let spread = SpreadAngles::default();
        assert_eq!(spread.select(&stance(false, false, true)), 7.0);
        assert_eq!(spread.select(&stance(false, false, false)), 5.0);
    }

    #[test]
    fn zero_spread_keeps_direction() {
        let mut rng = StdRng::seed_from_u64(1);
        let dir = Vec3::new(0.0, 0.0, -2.0);
        assert_eq!(random_cone_direction(&mut rng, dir, 0.0), Vec3::NEG_Z);
    }

    #[test]
    fn directions_stay_inside_the_cone() {
        let mut rng = StdRng::seed_from_u64(7);
        let axis = Vec3::new(1.0, 2.0, -0.5).normalize();
        let half_angle = 7.0_f32.to_radians();

        for _ in 0..2_000 {
            let dir = random_cone_direction(&mut rng, axis, half_angle);
            assert!((dir.length() - 1.0).abs() < 1e-4);
            assert!(dir.angle_between(axis) <= half_angle + 1e-3);
        }
    }

    #[test]
    fn distribution_is_uniform_over_solid_angle() {
        // For a uniform cone the mean cosine sits halfway between cos(h) and 1.
        // Sampling the angle uniformly instead would push the mean toward the axis.
        let mut rng = StdRng::seed_from_u64(42);
        let half_angle = 30.0_f32.to_radians();
        let samples = 20_000;

        let mean_cos: f32 = (0..samples)
            .map(|_| random_cone_direction(&mut rng, Vec3::Z, half_angle).z)
            .sum::<f32>()
            / samples as f32;

        let expected = (1.0 + half_angle.cos()) / 2.0;
        assert!((mean_cos - expected).abs() < 0.002, "mean cos {mean_cos}");
    }
}
