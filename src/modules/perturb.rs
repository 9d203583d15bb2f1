//! Horizontal gravity jitter
//!
//! Every tick with balls on the board the engine-wide horizontal gravity is
//! redrawn, so all live balls share the same sideways bias for that tick.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::modules::config::PerturbationConfig;

/// Maps a uniform draw to a strength multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PerturbationTable {
    /// Rare big swings: 20% x5, 30% x2, 50% x1
    #[default]
    ThreeTier,
    /// Mostly small swings: 80% x1, 20% x2.5
    TwoTier,
}

impl PerturbationTable {
    pub fn multiplier(&self, odds: f32) -> f32 {
        match self {
            PerturbationTable::ThreeTier => {
                if odds < 0.2 {
                    5.0
                } else if odds < 0.5 {
                    2.0
                } else {
                    1.0
                }
            }
            PerturbationTable::TwoTier => {
                if odds < 0.8 {
                    1.0
                } else {
                    2.5
                }
            }
        }
    }
}

/// Draw the next horizontal gravity value
pub fn horizontal_gravity<R: Rng + ?Sized>(config: &PerturbationConfig, rng: &mut R) -> f32 {
    let strength = config.base_strength * config.table.multiplier(rng.random::<f32>());
    let rightward = rng.random::<f32>() < 0.5;
    // Keep within the upper half of the tier's range
    let magnitude = strength * (0.5 + rng.random::<f32>() * 0.5);
    if rightward { magnitude } else { -magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_three_tier_boundaries() {
        let t = PerturbationTable::ThreeTier;
        assert_eq!(t.multiplier(0.0), 5.0);
        assert_eq!(t.multiplier(0.19), 5.0);
        assert_eq!(t.multiplier(0.2), 2.0);
        assert_eq!(t.multiplier(0.49), 2.0);
        assert_eq!(t.multiplier(0.5), 1.0);
        assert_eq!(t.multiplier(0.99), 1.0);
    }

    #[test]
    fn test_two_tier_boundaries() {
        let t = PerturbationTable::TwoTier;
        assert_eq!(t.multiplier(0.0), 1.0);
        assert_eq!(t.multiplier(0.79), 1.0);
        assert_eq!(t.multiplier(0.8), 2.5);
    }

    #[test]
    fn test_gravity_stays_in_tier_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let config = PerturbationConfig {
            table: PerturbationTable::ThreeTier,
            base_strength: 2.0,
        };
        let mut saw_left = false;
        let mut saw_right = false;
        for _ in 0..2000 {
            let g = horizontal_gravity(&config, &mut rng);
            assert!(g.abs() >= 2.0 * 0.5 && g.abs() <= 2.0 * 5.0, "out of range: {g}");
            saw_left |= g < 0.0;
            saw_right |= g > 0.0;
        }
        assert!(saw_left && saw_right);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let config = PerturbationConfig::default();
        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        for _ in 0..50 {
            assert_eq!(
                horizontal_gravity(&config, &mut a),
                horizontal_gravity(&config, &mut b)
            );
        }
    }
}
