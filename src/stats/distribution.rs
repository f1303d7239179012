use super::{Engine, Outcome, RollQuery};
use crate::error::QueryError;
use crate::shop::SHOP_SLOTS;

/// Upper bound on the slots a distribution is tabulated over.
pub const DEFAULT_HORIZON_SLOTS: usize = 1_000_000;

/// Tabulation stops once at most this much probability is left unplaced.
pub const TAIL_TOLERANCE: f64 = 1e-9;

/// Distribution of the number of slots, and refreshes, until every needed
/// copy has been hit.
#[derive(Debug, Clone, PartialEq)]
pub struct RollDistribution {
    /// `slot_pmf[k]`: chance the last needed copy lands on slot `k`.
    slot_pmf: Vec<f64>,
    /// `cdf[r - 1]`: chance of being done within `r` refreshes.
    cdf: Vec<f64>,
}

impl RollDistribution {
    fn from_slot_pmf(slot_pmf: Vec<f64>) -> Self {
        let mut running = 0.0;
        let cumulative: Vec<f64> = slot_pmf
            .iter()
            .map(|p| {
                running += p;
                running.min(1.0)
            })
            .collect();
        let cdf = cumulative
            .iter()
            .skip(SHOP_SLOTS)
            .step_by(SHOP_SLOTS)
            .copied()
            .collect();
        Self { slot_pmf, cdf }
    }

    pub fn slot_pmf(&self) -> &[f64] {
        &self.slot_pmf
    }

    /// Cumulative probability by refresh count, starting at one refresh.
    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    /// Chance of being done within `rerolls` refreshes. Past the horizon this
    /// is the last tabulated value.
    pub fn probability_by(&self, rerolls: usize) -> f64 {
        match rerolls {
            0 => 0.0,
            r => self
                .cdf
                .get(r - 1)
                .or_else(|| self.cdf.last())
                .copied()
                .unwrap_or(0.0),
        }
    }

    /// Fewest refreshes that reach `confidence`, if within the horizon.
    pub fn rerolls_for(&self, confidence: f64) -> Option<usize> {
        self.cdf.iter().position(|&p| p >= confidence).map(|i| i + 1)
    }

    /// Mean refreshes implied by the tabulated PMF.
    pub fn mean_rerolls(&self) -> f64 {
        let slots: f64 = self
            .slot_pmf
            .iter()
            .enumerate()
            .map(|(k, p)| k as f64 * p)
            .sum();
        slots / SHOP_SLOTS as f64
    }

    /// Probability mass left past the last tabulated slot.
    pub fn tail_mass(&self) -> f64 {
        (1.0 - self.slot_pmf.iter().sum::<f64>()).max(0.0)
    }
}

/// PMF of the slot on which the last of a run of geometric waits ends.
///
/// `hits[j]` is the per-slot chance of the `j + 1`th copy once `j` are in
/// hand. Stepping the copies-in-hand chain one slot at a time gives the
/// convolution of the per-copy geometric PMFs without tabulating each one.
/// Index 0 is slot zero and always 0. Stops when the unplaced mass drops
/// below [`TAIL_TOLERANCE`] or after `max_slots` slots.
fn completion_pmf(hits: &[f64], max_slots: usize) -> Vec<f64> {
    let Some(last) = hits.len().checked_sub(1) else {
        return Vec::new();
    };
    // in_hand[j]: chance exactly j copies have been hit so far
    let mut in_hand = vec![0.0; hits.len()];
    in_hand[0] = 1.0;
    let mut pmf = vec![0.0];
    let mut placed = 0.0;

    while pmf.len() <= max_slots && placed < 1.0 - TAIL_TOLERANCE {
        let mut finished = 0.0;
        // high to low so a copy moves at most one step per slot
        for j in (0..=last).rev() {
            let moved = in_hand[j] * hits[j];
            in_hand[j] -= moved;
            if j == last {
                finished = moved;
            } else {
                in_hand[j + 1] += moved;
            }
        }
        placed += finished;
        pmf.push(finished);
    }
    pmf
}

impl Engine<'_> {
    /// Distribution of refreshes until the query's star level is reached.
    ///
    /// The slot PMF is exact and runs until all but [`TAIL_TOLERANCE`] of
    /// the probability is placed, or until `max_slots`, whichever comes
    /// first. [`RollDistribution::tail_mass`] reports what was cut.
    pub fn distribution(
        &self,
        query: &RollQuery,
        max_slots: usize,
    ) -> Result<Outcome<RollDistribution>, QueryError> {
        let state = self.process_state(query)?;
        if let Some(guard) = state.guard() {
            return Ok(Outcome::Guarded(guard));
        }

        let hits: Vec<f64> = state.hit_probabilities().collect();
        let pmf = completion_pmf(&hits, max_slots);
        Ok(Outcome::Value(RollDistribution::from_slot_pmf(pmf)))
    }
}
