//! Walker's Alias Method for O(1) sampling of a cost tier from a level's odds.

use crate::error::SamplerError;
use rand::Rng;

/// Alias table over a fixed discrete distribution.
///
/// One is built per shop level; sampling picks the zero-based tier index.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    prob: Vec<f64>,
    alias: Vec<usize>,
}

impl WeightedSampler {
    /// Construct an alias table from non-negative weights. O(n).
    pub fn new(weights: &[f64]) -> Result<Self, SamplerError> {
        let n = weights.len();
        if n == 0 {
            return Err(SamplerError::Empty);
        }

        let mut sum = 0.0f64;
        for (i, &w) in weights.iter().enumerate() {
            if w.is_sign_negative() && w != 0.0 {
                return Err(SamplerError::Negative { index: i, value: w });
            }
            sum += w;
        }
        if !sum.is_finite() || sum == 0.0 {
            return Err(SamplerError::ZeroSum);
        }

        // Scale so average is 1.
        let mut scaled: Vec<f64> = weights.iter().map(|&w| w * n as f64 / sum).collect();

        let mut prob = vec![0.0f64; n];
        let mut alias = (0..n).collect::<Vec<_>>();

        let mut small = Vec::with_capacity(n);
        let mut large = Vec::with_capacity(n);

        for (i, &p) in scaled.iter().enumerate() {
            if p < 1.0 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        while let (Some(s), Some(l)) = (small.pop(), large.pop()) {
            prob[s] = scaled[s];
            alias[s] = l;

            scaled[l] = (scaled[l] + scaled[s]) - 1.0;

            if scaled[l] < 1.0 - 1e-15 {
                small.push(l);
            } else {
                large.push(l);
            }
        }

        // Leftovers are within rounding of 1. A zero-weight tier must stay
        // unreachable even if rounding strands it here.
        for i in small.into_iter().chain(large) {
            if weights[i] == 0.0 {
                prob[i] = 0.0;
                alias[i] = heaviest(weights);
            } else {
                prob[i] = 1.0;
                alias[i] = i;
            }
        }

        Ok(Self { prob, alias })
    }

    /// Draw a single index in O(1).
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let n = self.prob.len();
        let i = rng.random_range(0..n);
        let u: f64 = rng.random();
        if u < self.prob[i] { i } else { self.alias[i] }
    }

    /// Draw `draws` samples, returning counts per index.
    #[cfg(test)]
    pub fn sample_counts<R: Rng + ?Sized>(&self, rng: &mut R, draws: usize) -> Vec<usize> {
        let mut counts = vec![0usize; self.prob.len()];
        for _ in 0..draws {
            counts[self.sample_index(rng)] += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.prob.len()
    }
    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }
}

fn heaviest(weights: &[f64]) -> usize {
    weights
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map_or(0, |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn rejects_bad_inputs() {
        assert!(matches!(WeightedSampler::new(&[]), Err(SamplerError::Empty)));
        assert!(matches!(
            WeightedSampler::new(&[0.0, 0.0]),
            Err(SamplerError::ZeroSum)
        ));
        assert!(matches!(
            WeightedSampler::new(&[-0.1, 0.2]),
            Err(SamplerError::Negative { index: 0, .. })
        ));
    }

    #[test]
    fn roughly_matches_level_odds() {
        let odds = [0.19, 0.30, 0.35, 0.15, 0.01];
        let sampler = WeightedSampler::new(&odds).unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        let draws = 50_000usize;
        let counts = sampler.sample_counts(&mut rng, draws);

        for (i, &c) in counts.iter().enumerate() {
            let emp = c as f64 / draws as f64;
            assert!((emp - odds[i]).abs() < 0.01, "i={i} emp={emp} p={}", odds[i]);
        }
    }

    #[test]
    fn zero_odds_tiers_never_drawn() {
        let sampler = WeightedSampler::new(&[0.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert_eq!(sampler.sample_index(&mut rng), 2);
        }

        let sampler = WeightedSampler::new(&[0.75, 0.25, 0.0, 0.0, 0.0]).unwrap();
        let counts = sampler.sample_counts(&mut rng, 10_000);
        assert_eq!(&counts[2..], &[0, 0, 0]);
    }

    #[test]
    fn degenerate_singleton() {
        let sampler = WeightedSampler::new(&[5.0]).unwrap();
        let mut rng = rand::rng();
        for _ in 0..1000 {
            assert_eq!(sampler.sample_index(&mut rng), 0);
        }
    }
}
