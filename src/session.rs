use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::catalog::CatalogProvider;
use crate::error::{ConfigError, Error, PoolError, ShopError};
use crate::odds::OddsProvider;
use crate::pool::Pool;
use crate::ruleset::Ruleset;
use crate::shop::Shop;
use crate::stats::{Engine, RollQuery};
use crate::unit::{Star, Unit};

/// Everything one simulated player mutates: their pool, shop and bench.
///
/// Sessions share nothing; callers that need concurrent access wrap a
/// session in their own lock.
#[derive(Debug)]
pub struct Session<R = StdRng> {
    ruleset: Ruleset,
    pool: Pool,
    shop: Shop,
    bench: Vec<Unit>,
    rng: R,
}

impl Session<StdRng> {
    pub fn seeded<C, O>(
        catalog: &C,
        odds: &O,
        ruleset: Ruleset,
        level: u32,
        seed: u64,
    ) -> Result<Self, Error>
    where
        C: CatalogProvider + ?Sized,
        O: OddsProvider + ?Sized,
    {
        Self::new(catalog, odds, ruleset, level, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    /// Fetch both snapshots once and build an empty shop at `level`.
    ///
    /// # Errors
    /// Provider failures, a catalog the ruleset rejects, an odds table whose
    /// tier count differs from the ruleset's, or an unknown starting level.
    pub fn new<C, O>(
        catalog: &C,
        odds: &O,
        ruleset: Ruleset,
        level: u32,
        rng: R,
    ) -> Result<Self, Error>
    where
        C: CatalogProvider + ?Sized,
        O: OddsProvider + ?Sized,
    {
        let catalog = catalog.catalog()?;
        let odds = odds.odds()?;
        if odds.tier_count() != ruleset.tier_count() {
            return Err(ConfigError::TierCountMismatch {
                odds: odds.tier_count(),
                ruleset: ruleset.tier_count(),
            }
            .into());
        }
        let pool = Pool::initialize(&catalog, &ruleset)?;
        let shop = Shop::new(level, odds)?;
        info!(
            target: "shoproll::session",
            level,
            tiers = ruleset.tier_count(),
            pool = pool.size(None),
            "session started"
        );
        Ok(Self {
            ruleset,
            pool,
            shop,
            bench: Vec::new(),
            rng,
        })
    }

    /// Fill any empty shop slots.
    pub fn fill(&mut self) -> Result<(), ShopError> {
        self.shop.fresh_shop(&mut self.pool, &mut self.rng)
    }

    pub fn reroll(&mut self) -> Result<(), ShopError> {
        self.shop.refresh_shop(&mut self.pool, &mut self.rng)
    }

    /// Move the unit in `slot` to the bench.
    pub fn buy(&mut self, slot: usize) -> Result<Option<&Unit>, ShopError> {
        let Some(unit) = self.shop.buy(slot)? else {
            return Ok(None);
        };
        debug!(target: "shoproll::session", unit = unit.name(), slot, "bought");
        self.bench.push(unit);
        Ok(self.bench.last())
    }

    /// Sell one benched copy of `name` back into the pool. Returns whether
    /// a copy was found.
    pub fn sell(&mut self, name: &str) -> Result<bool, PoolError> {
        let Some(idx) = self.bench.iter().position(|u| u.name() == name) else {
            return Ok(false);
        };
        let unit = self.bench.swap_remove(idx);
        debug!(target: "shoproll::session", unit = unit.name(), "sold");
        self.pool.return_unit(unit)?;
        Ok(true)
    }

    pub fn level_up(&mut self) {
        self.shop.level_up();
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn shop_mut(&mut self) -> &mut Shop {
        &mut self.shop
    }

    pub fn bench(&self) -> &[Unit] {
        &self.bench
    }

    pub fn owned_copies(&self, name: &str) -> u32 {
        let n = self.bench.iter().filter(|u| u.name() == name).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    /// Probability engine over this session's ruleset and shop odds.
    pub fn engine(&self) -> Engine<'_> {
        Engine::new(&self.ruleset, self.shop.odds_table())
    }

    /// Build a query from live state: the bench gives the team count, and
    /// the pool denominator is what a reroll would draw from (the tier plus
    /// same-cost units now in the shop) less copies held elsewhere.
    pub fn query_for(&self, unit: &Unit, star: Star, owned_elsewhere: u32) -> RollQuery {
        let cost = unit.cost();
        let drawable = self.pool.size(Some(cost)) + self.shop.slotted(cost);
        let denominator = drawable.saturating_sub(owned_elsewhere);
        RollQuery::new(unit, star, self.shop.level(), f64::from(denominator))
            .on_team(self.owned_copies(unit.name()))
            .elsewhere(owned_elsewhere)
    }
}
