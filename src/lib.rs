//! # shoproll
//!
//! A shared, finite unit pool and the shop that rolls from it, as found in
//! auto-battlers, plus the odds engine that answers "how many rerolls until
//! I three-star this?".
//!
//! The pieces:
//!
//! 1. A [`Pool`] seeded from a [`Catalog`] and a [`Ruleset`]: every tier
//!    holds `bag_size(tier)` copies of each unit, draws are without
//!    replacement, and [`Pool::odds_of`] reflects what is left right now.
//! 2. A [`Shop`] of [`SHOP_SLOTS`] slots. Each slot rolls a cost tier from
//!    the level's row of an [`OddsTable`] (an alias table per level) and
//!    then draws from that tier.
//! 3. An [`Engine`] over a ruleset and odds table that turns a
//!    [`RollQuery`] into expected refreshes ([`Engine::number_shops`]), a
//!    full distribution ([`Engine::distribution`]) or a sensitivity sweep.
//! 4. A [`Session`] that owns one player's pool, shop, bench and RNG.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use shoproll::{Catalog, OddsTable, Ruleset, Rounding, Session, Star};
//!
//! # fn main() -> Result<(), shoproll::Error> {
//! let mut session = Session::seeded(
//!     &Catalog::builtin(),
//!     &OddsTable::builtin(),
//!     Ruleset::default(),
//!     7,
//!     42,
//! )?;
//! session.reroll()?;
//! println!("shop: {:?}", session.shop().slot_names());
//!
//! let jinx = Catalog::builtin().find("Jinx").expect("in roster");
//! let query = session.query_for(&jinx, Star::Two, 2);
//! let shops = session.engine().number_shops(&query, Rounding::Hundredths)?;
//! println!("expected refreshes: {shops}");
//! # Ok(()) }
//! ```
//!
//! ## Guards versus errors
//! * Malformed data ([`ConfigError`]) and exhausted tiers
//!   ([`EmptyTierError`]) are errors.
//! * "Already there", "level too low" and "not enough left" are ordinary
//!   answers and come back as [`Outcome::Guarded`] with a [`Guard`].
//!
//! ## Performance
//! * **Tier roll**: O(1) per slot (alias table).
//! * **Pool draw**: O(distinct units in the tier), walking cumulative counts;
//!   copies are counted, never materialised.
//! * **Distribution**: O(copies · slots), stepping slot by slot until all
//!   but [`TAIL_TOLERANCE`] of the probability is placed. A long-odds
//!   three-star query runs to a couple of hundred thousand slots.
//!
//! ## Logging
//! Events go through `tracing` under `shoproll::*` targets. The crate never
//! installs a subscriber.

mod catalog;
mod error;
mod odds;
mod pool;
mod ruleset;
mod sampler;
mod session;
mod shop;
mod source;
mod stats;
mod unit;
mod walker;

/// A minimal interface for "index samplers".
/// Implemented by `WeightedSampler` (per-level tier odds) and by the pool's
/// per-tier bags (uniform over remaining copies).
#[allow(clippy::len_without_is_empty)]
pub trait IndexSampler {
    fn len(&self) -> usize;
    fn sample_index<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> usize;
}

pub use catalog::{Catalog, CatalogProvider, UnitDescriptor};
pub use error::{
    ConfigError, EmptyTierError, Error, PoolError, QueryError, SamplerError, ShopError,
};
pub use odds::{ODDS_TOLERANCE, OddsProvider, OddsTable};
pub use pool::Pool;
pub use ruleset::Ruleset;
pub use session::Session;
pub use shop::{SHOP_SLOTS, Shop};
pub use source::JsonSource;
pub use stats::{
    DEFAULT_HORIZON_SLOTS, Engine, Guard, Outcome, RollDistribution, RollOutcome, RollQuery,
    RollState, Rounding, SweepPoint, TAIL_TOLERANCE,
};
pub use unit::{Star, Unit};
pub use walker::WeightedSampler;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_session() {
        let mut session = Session::seeded(
            &Catalog::builtin(),
            &OddsTable::builtin(),
            Ruleset::default(),
            5,
            1,
        )
        .unwrap();
        session.reroll().unwrap();
        assert_eq!(session.shop().slot_names().len(), SHOP_SLOTS);
    }
}
