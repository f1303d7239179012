use rand::Rng;

use crate::{IndexSampler, unit::Unit, walker::WeightedSampler};

#[derive(Debug, Clone)]
struct Stock {
    unit: Unit,
    count: u32,
}

/// The drawable copies of one cost tier, stored as per-name counts.
///
/// Sampling walks the cumulative counts, so every remaining copy is equally
/// likely and duplicates never need to be materialised.
#[derive(Debug, Clone, Default)]
pub(crate) struct TierBag {
    stock: Vec<Stock>,
    total: u32,
}

impl TierBag {
    pub(crate) fn seed(&mut self, unit: Unit, copies: u32) {
        self.total += copies;
        self.stock.push(Stock {
            unit,
            count: copies,
        });
    }

    pub(crate) fn total(&self) -> u32 {
        self.total
    }

    pub(crate) fn count_of(&self, unit: &Unit) -> u32 {
        self.stock
            .iter()
            .find(|s| s.unit == *unit)
            .map_or(0, |s| s.count)
    }

    pub(crate) fn contains_name(&self, name: &str) -> bool {
        self.stock.iter().any(|s| s.unit.name() == name)
    }

    /// Remove one copy of the entry at `idx`.
    pub(crate) fn take(&mut self, idx: usize) -> Option<Unit> {
        let stock = self.stock.get_mut(idx).filter(|s| s.count > 0)?;
        stock.count -= 1;
        self.total -= 1;
        Some(stock.unit.clone())
    }

    /// Put one copy back. Units the bag has never seen get a fresh entry.
    pub(crate) fn put(&mut self, unit: Unit) {
        self.total += 1;
        match self.stock.iter_mut().find(|s| s.unit == unit) {
            Some(stock) => stock.count += 1,
            None => self.stock.push(Stock { unit, count: 1 }),
        }
    }
}

/// Picks the entry holding copy number `r` for `r` uniform over all copies.
/// Callers must not sample an empty bag.
impl IndexSampler for TierBag {
    #[inline]
    fn len(&self) -> usize {
        self.stock.len()
    }

    fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let mut r = rng.random_range(0..self.total);
        for (i, stock) in self.stock.iter().enumerate() {
            if r < stock.count {
                return i;
            }
            r -= stock.count;
        }
        self.stock.len().saturating_sub(1)
    }
}

/// `WeightedSampler` is the per-level tier sampler; wire it into the trait.
impl IndexSampler for WeightedSampler {
    #[inline]
    fn len(&self) -> usize {
        // call the inherent method explicitly to avoid trait-recursion
        WeightedSampler::len(self)
    }
    #[inline]
    fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        WeightedSampler::sample_index(self, rng)
    }
}
