use serde::{Deserialize, Serialize};

use super::{Engine, RollOutcome, RollQuery, Rounding};
use crate::error::QueryError;

/// One point of a sensitivity sweep: the swept quantity and the expected
/// refreshes (or guard) at that value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub value: u32,
    pub outcome: RollOutcome,
}

impl Engine<'_> {
    /// Vary how many copies other players hold, from one up to every copy
    /// not on the player's team. Each point reports how many copies are
    /// left in the pool; every copy taken elsewhere also shrinks the pool
    /// denominator.
    ///
    /// `base.owned_elsewhere` is ignored, and `base.pool_denominator` must
    /// not already exclude copies held elsewhere.
    pub fn n_other_shop_distribution(
        &self,
        base: &RollQuery,
    ) -> Result<Vec<SweepPoint>, QueryError> {
        let bag = self
            .ruleset
            .bag_size(base.cost)
            .ok_or(QueryError::UnknownTier { cost: base.cost })?;
        let not_on_team = bag.saturating_sub(base.owned_on_team);

        (1..not_on_team)
            .map(|taken| {
                let query = RollQuery {
                    owned_elsewhere: taken,
                    pool_denominator: base.pool_denominator - f64::from(taken),
                    ..*base
                };
                Ok(SweepPoint {
                    value: not_on_team - taken,
                    outcome: self.number_shops(&query, Rounding::Hundredths)?,
                })
            })
            .collect()
    }

    /// Vary how many same-cost units are in the pool, from one bag's worth
    /// up to `units_per_cost` bags. Each point reports the number of other
    /// same-cost units on top of the target's own bag.
    ///
    /// `base.pool_denominator` is ignored.
    pub fn n_pool_shop_distribution(
        &self,
        base: &RollQuery,
        units_per_cost: u32,
    ) -> Result<Vec<SweepPoint>, QueryError> {
        let bag = self
            .ruleset
            .bag_size(base.cost)
            .ok_or(QueryError::UnknownTier { cost: base.cost })?;
        let full = bag.saturating_mul(units_per_cost);

        (bag..full)
            .map(|pool| {
                let query = RollQuery {
                    pool_denominator: f64::from(pool),
                    ..*base
                };
                Ok(SweepPoint {
                    value: pool - bag,
                    outcome: self.number_shops(&query, Rounding::Hundredths)?,
                })
            })
            .collect()
    }
}
