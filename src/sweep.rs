//! Sweep plans: which `(top_p, top_k)` pairs a run visits, in which order

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::params::{round_to, SamplingParams};

/// `top_k` values of the default grid
pub const DEFAULT_TOP_K_GRID: [u32; 5] = [10, 25, 50, 75, 100];

/// Number of random pairs drawn when no count is given
pub const DEFAULT_RANDOM_COUNT: usize = 10;

/// `top_p` values of the default grid: `0.1, 0.2, ..., 1.0`.
#[must_use]
pub fn default_top_p_grid() -> Vec<f64> {
    (1..=10).map(|i| round_to(f64::from(i) * 0.1, 1)).collect()
}

/// An ordered list of parameter pairs to test.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepPlan {
    /// Every `top_p` crossed with every `top_k`, `top_p` outermost.
    Grid {
        /// `top_p` values in visiting order
        top_p: Vec<f64>,
        /// `top_k` values in visiting order
        top_k: Vec<u32>,
    },
    /// `count` independently drawn pairs.
    Random {
        /// Number of pairs
        count: usize,
        /// Seed for reproducible draws; `None` uses OS entropy
        seed: Option<u64>,
    },
}

impl SweepPlan {
    /// The 10 x 5 grid over `0.1..=1.0` and `{10, 25, 50, 75, 100}`.
    #[must_use]
    pub fn default_grid() -> Self {
        Self::Grid {
            top_p: default_top_p_grid(),
            top_k: DEFAULT_TOP_K_GRID.to_vec(),
        }
    }

    /// A random plan of `count` pairs.
    #[must_use]
    pub const fn random(count: usize, seed: Option<u64>) -> Self {
        Self::Random { count, seed }
    }

    /// Human-readable plan name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Grid { .. } => "grid",
            Self::Random { .. } => "random",
        }
    }

    /// Number of calls the plan will issue.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Grid { top_p, top_k } => top_p.len() * top_k.len(),
            Self::Random { count, .. } => *count,
        }
    }

    /// Check if the plan issues no calls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialize the pairs in visiting order.
    ///
    /// Random plans draw `top_p` uniformly from `[0.1, 1.0]` rounded to two
    /// decimals and `top_k` uniformly from `10..=100`.
    #[must_use]
    pub fn combinations(&self) -> Vec<SamplingParams> {
        match self {
            Self::Grid { top_p, top_k } => top_p
                .iter()
                .flat_map(|&p| top_k.iter().map(move |&k| SamplingParams::new(p, k)))
                .collect(),
            Self::Random { count, seed } => {
                let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
                (0..*count)
                    .map(|_| {
                        let top_p = round_to(rng.gen_range(0.1..=1.0), 2);
                        let top_k = rng.gen_range(10..=100);
                        SamplingParams::new(top_p, top_k)
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_top_p_grid_is_exact() {
        assert_eq!(
            default_top_p_grid(),
            vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
        );
    }

    #[test]
    fn test_default_grid_has_50_pairs_in_order() {
        let plan = SweepPlan::default_grid();
        let pairs = plan.combinations();
        assert_eq!(plan.len(), 50);
        assert_eq!(pairs.len(), 50);
        assert_eq!(pairs[0], SamplingParams::new(0.1, 10));
        assert_eq!(pairs[4], SamplingParams::new(0.1, 100));
        assert_eq!(pairs[5], SamplingParams::new(0.2, 10));
        assert_eq!(pairs[49], SamplingParams::new(1.0, 100));
        assert!(pairs
            .windows(2)
            .all(|w| w[0].total_cmp(&w[1]) == std::cmp::Ordering::Less));
    }

    #[test]
    fn test_random_pairs_in_range() {
        let pairs = SweepPlan::random(500, None).combinations();
        assert_eq!(pairs.len(), 500);
        for pair in pairs {
            assert!((0.1..=1.0).contains(&pair.top_p), "top_p {}", pair.top_p);
            assert!((10..=100).contains(&pair.top_k), "top_k {}", pair.top_k);
            assert!((pair.top_p - round_to(pair.top_p, 2)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_random_seed_is_reproducible() {
        let a = SweepPlan::random(20, Some(42)).combinations();
        let b = SweepPlan::random(20, Some(42)).combinations();
        let c = SweepPlan::random(20, Some(43)).combinations();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_plans() {
        assert!(SweepPlan::random(0, None).is_empty());
        let grid = SweepPlan::Grid {
            top_p: vec![0.5],
            top_k: vec![],
        };
        assert!(grid.is_empty());
        assert!(grid.combinations().is_empty());
    }
}
