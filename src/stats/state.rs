use tracing::debug;

use super::{Engine, Guard, RollQuery};
use crate::error::QueryError;

/// A query reduced to the numbers the geometric model needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollState {
    pub cost: u8,
    pub copies_needed: u32,
    /// Copies of the unit still in the pool (may be negative on bad input).
    pub copies_left: i64,
    pub pool_denominator: f64,
    /// Chance a single slot rolls the unit's cost tier at this level.
    pub cost_odds: f64,
}

impl RollState {
    /// The first guard that rules out a numeric answer, if any.
    ///
    /// Order matters: a met target wins over a low level, which wins over
    /// an empty pool.
    pub fn guard(&self) -> Option<Guard> {
        let needed = i64::from(self.copies_needed);
        if needed == 0 {
            return Some(Guard::AlreadyMet);
        }
        if self.cost_odds <= 0.0 {
            return Some(Guard::LevelTooLow { cost: self.cost });
        }
        if self.copies_left <= 0 || self.copies_left < needed {
            return Some(Guard::NotEnoughLeft);
        }
        // the denominator must stay positive through the last copy
        let last_denominator = self.pool_denominator - (needed - 1) as f64;
        if last_denominator.is_nan() || last_denominator <= 0.0 {
            return Some(Guard::NotEnoughLeft);
        }
        None
    }

    /// Per-slot hit chance for each needed copy, in order.
    ///
    /// A denominator smaller than the copies left saturates at certainty.
    pub fn hit_probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.copies_needed).map(move |i| {
            let left = (self.copies_left - i64::from(i)) as f64;
            let denominator = self.pool_denominator - f64::from(i);
            (left / denominator * self.cost_odds).min(1.0)
        })
    }
}

impl Engine<'_> {
    /// Work out copies needed, copies left and the tier odds for `query`.
    ///
    /// # Errors
    /// [`QueryError::UnknownTier`] / [`QueryError::UnknownLevel`] when the
    /// query points outside the ruleset or odds table.
    pub fn process_state(&self, query: &RollQuery) -> Result<RollState, QueryError> {
        let cost = query.cost;
        let bag = self
            .ruleset
            .bag_size(cost)
            .ok_or(QueryError::UnknownTier { cost })?;
        let level = query.level;
        let odds = self.odds.level_odds(level).ok_or(QueryError::UnknownLevel { level })?;
        let cost_odds = odds
            .get(usize::from(cost) - 1)
            .copied()
            .ok_or(QueryError::UnknownTier { cost })?;

        let target = self.ruleset.copies_for(query.star);
        let copies_needed = target.saturating_sub(query.owned_on_team);
        let copies_left =
            i64::from(bag) - i64::from(query.owned_on_team) - i64::from(query.owned_elsewhere);

        let state = RollState {
            cost,
            copies_needed,
            copies_left,
            pool_denominator: query.pool_denominator,
            cost_odds,
        };
        debug!(
            target: "shoproll::stats",
            cost,
            level,
            copies_needed,
            copies_left,
            cost_odds,
            "processed roll state"
        );
        Ok(state)
    }
}
