use crate::error::{DrillError, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::debug;

/// Draws distinct keys with probability proportional to their weight.
///
/// Draws are made with replacement from a fixed weighted index and repeats are
/// thrown away until enough distinct keys are collected. The weights do not
/// change between draws of one call. As `count` approaches the number of
/// eligible keys the expected number of draws grows quickly; the populations
/// this is used on are a few thousand characters, so that is accepted.
#[derive(Debug)]
pub struct WeightedSampler<R: Rng = StdRng> {
    rng: R,
}

impl WeightedSampler<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> WeightedSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns `count` distinct keys from `population`.
    ///
    /// Keys with weight 0 are never returned; asking for more keys than have a
    /// positive weight fails with [`DrillError::InsufficientPopulation`]. The
    /// order of the result carries no meaning.
    pub fn sample<K>(&mut self, population: &[(K, u64)], count: usize) -> Result<Vec<K>>
    where
        K: Clone + Eq + Hash,
    {
        let eligible: Vec<&(K, u64)> = population.iter().filter(|(_, w)| *w > 0).collect();
        if count > eligible.len() {
            return Err(DrillError::InsufficientPopulation {
                requested: count,
                available: eligible.len(),
            });
        }
        if count == 0 {
            return Ok(Vec::new());
        }

        let index = WeightedIndex::new(eligible.iter().map(|(_, w)| *w)).map_err(|_| {
            DrillError::InsufficientPopulation {
                requested: count,
                available: 0,
            }
        })?;

        let mut seen = HashSet::with_capacity(count);
        let mut picked = Vec::with_capacity(count);
        let mut draws = 0usize;
        while picked.len() < count {
            draws += 1;
            let (key, _) = eligible[index.sample(&mut self.rng)];
            if seen.insert(key) {
                picked.push(key.clone());
            }
        }

        debug!(
            requested = count,
            eligible = eligible.len(),
            draws,
            "weighted sample drawn"
        );
        Ok(picked)
    }
}
