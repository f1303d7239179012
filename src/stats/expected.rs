use tracing::debug;

use super::{Engine, Outcome, RollOutcome, RollQuery, Rounding};
use crate::error::QueryError;
use crate::shop::SHOP_SLOTS;

impl Engine<'_> {
    /// Expected shop refreshes until the query's star level is reached.
    ///
    /// Each needed copy costs `1 / p` slots on average; a refresh shows
    /// [`SHOP_SLOTS`] slots, so the total is divided accordingly.
    pub fn number_shops(
        &self,
        query: &RollQuery,
        rounding: Rounding,
    ) -> Result<RollOutcome, QueryError> {
        let state = self.process_state(query)?;
        if let Some(guard) = state.guard() {
            debug!(target: "shoproll::stats", ?guard, "no expectation");
            return Ok(Outcome::Guarded(guard));
        }

        let slots: f64 = state.hit_probabilities().map(|p| 1.0 / p).sum();
        let shops = slots / SHOP_SLOTS as f64;
        Ok(Outcome::Value(rounding.apply(shops)))
    }
}
