use rand::Rng;
use tracing::debug;

use crate::error::ShopError;
use crate::odds::OddsTable;
use crate::pool::Pool;
use crate::unit::Unit;

/// Number of offers a shop shows per refresh.
pub const SHOP_SLOTS: usize = 5;

/// Five purchase slots drawn from a [`Pool`] at the odds of the current level.
///
/// A unit in a slot is checked out of the pool until the slot is refreshed
/// (returned) or bought (kept by the player).
#[derive(Debug, Clone)]
pub struct Shop {
    level: u32,
    slots: [Option<Unit>; SHOP_SLOTS],
    odds: OddsTable,
}

impl Shop {
    /// Empty shop at `level`.
    ///
    /// # Errors
    /// [`ShopError::UnknownLevel`] if `odds` has no row for `level`.
    pub fn new(level: u32, odds: OddsTable) -> Result<Self, ShopError> {
        if !odds.has_level(level) {
            return Err(ShopError::UnknownLevel { level });
        }
        Ok(Self {
            level,
            slots: Default::default(),
            odds,
        })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn slots(&self) -> &[Option<Unit>; SHOP_SLOTS] {
        &self.slots
    }

    /// Names in slot order; empty slots are skipped.
    pub fn slot_names(&self) -> Vec<&str> {
        self.slots.iter().flatten().map(Unit::name).collect()
    }

    pub fn odds_table(&self) -> &OddsTable {
        &self.odds
    }

    pub fn odds_table_mut(&mut self) -> &mut OddsTable {
        &mut self.odds
    }

    /// Fill every empty slot: roll a cost tier from the level's odds, then
    /// draw from that tier. Slots are rolled independently.
    ///
    /// # Errors
    /// An exhausted tier stops the fill with [`ShopError::Pool`]; slots filled
    /// before the failure keep their units.
    pub fn fresh_shop<R: Rng + ?Sized>(
        &mut self,
        pool: &mut Pool,
        rng: &mut R,
    ) -> Result<(), ShopError> {
        let level = self.level;
        for slot in self.slots.iter_mut().filter(|s| s.is_none()) {
            let tier = self
                .odds
                .sample_tier(level, rng)
                .ok_or(ShopError::UnknownLevel { level })?;
            *slot = Some(pool.draw(tier, rng)?);
        }
        Ok(())
    }

    /// Reroll: return everything in the shop to the pool, then refill.
    pub fn refresh_shop<R: Rng + ?Sized>(
        &mut self,
        pool: &mut Pool,
        rng: &mut R,
    ) -> Result<(), ShopError> {
        self.clear(pool)?;
        self.fresh_shop(pool, rng)?;
        debug!(
            target: "shoproll::shop",
            level = self.level,
            slots = ?self.slot_names(),
            "refreshed"
        );
        Ok(())
    }

    /// Return every slotted unit to the pool and leave the slots empty.
    pub fn clear(&mut self, pool: &mut Pool) -> Result<(), ShopError> {
        for slot in &mut self.slots {
            if let Some(unit) = slot.take() {
                pool.return_unit(unit)?;
            }
        }
        Ok(())
    }

    /// Take the unit out of `slot`. It stays out of the pool.
    pub fn buy(&mut self, slot: usize) -> Result<Option<Unit>, ShopError> {
        self.slots
            .get_mut(slot)
            .map(Option::take)
            .ok_or(ShopError::NoSuchSlot { slot })
    }

    /// Affects later fills only; the current slots are untouched.
    pub fn level_up(&mut self) {
        self.level += 1;
        debug!(target: "shoproll::shop", level = self.level, "level up");
    }

    /// Chance a single slot at the current level shows `unit`: the chance of
    /// rolling its tier times its share of that tier in `pool`.
    pub fn odds_of(&self, unit: &Unit, pool: &Pool) -> f64 {
        let tier_odds = self.odds.probability(self.level, unit.cost()).unwrap_or(0.0);
        pool.odds_of(unit) * tier_odds
    }

    /// Units of `cost` currently sitting in the slots.
    pub fn slotted(&self, cost: u8) -> u32 {
        let n = self.slots.iter().flatten().filter(|u| u.cost() == cost).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, UnitDescriptor};
    use crate::error::{EmptyTierError, PoolError};
    use crate::ruleset::Ruleset;
    use rand::{SeedableRng, rngs::StdRng};

    fn setup(level: u32) -> (Shop, Pool, StdRng) {
        let pool = Pool::initialize(&Catalog::builtin(), &Ruleset::default()).unwrap();
        let shop = Shop::new(level, OddsTable::builtin()).unwrap();
        (shop, pool, StdRng::seed_from_u64(2024))
    }

    #[test]
    fn fresh_shop_fills_five_slots() {
        let (mut shop, mut pool, mut rng) = setup(8);
        let before = pool.size(None);
        shop.fresh_shop(&mut pool, &mut rng).unwrap();
        assert!(shop.slots().iter().all(Option::is_some));
        assert_eq!(shop.slot_names().len(), SHOP_SLOTS);
        assert_eq!(pool.size(None), before - SHOP_SLOTS as u32);
    }

    #[test]
    fn refresh_returns_before_refilling() {
        let (mut shop, mut pool, mut rng) = setup(8);
        let before = pool.size(None);
        for _ in 0..100 {
            shop.refresh_shop(&mut pool, &mut rng).unwrap();
            assert_eq!(pool.size(None), before - SHOP_SLOTS as u32);
        }
        shop.clear(&mut pool).unwrap();
        assert_eq!(pool.size(None), before);
    }

    #[test]
    fn pinned_odds_only_offer_that_tier() {
        let (mut shop, mut pool, mut rng) = setup(8);
        shop.fresh_shop(&mut pool, &mut rng).unwrap();
        for tier in 1..=5u8 {
            let mut odds = vec![0.0; 5];
            odds[usize::from(tier - 1)] = 1.0;
            shop.odds_table_mut().set_level(8, odds).unwrap();

            shop.refresh_shop(&mut pool, &mut rng).unwrap();
            for unit in shop.slots().iter().flatten() {
                assert_eq!(unit.cost(), tier);
            }
        }
    }

    #[test]
    fn low_levels_only_roll_one_costs() {
        let (mut shop, mut pool, mut rng) = setup(1);
        for _ in 0..20 {
            shop.refresh_shop(&mut pool, &mut rng).unwrap();
            assert_eq!(shop.slotted(1), SHOP_SLOTS as u32);
        }
    }

    #[test]
    fn level_up_keeps_slots() {
        let (mut shop, mut pool, mut rng) = setup(3);
        shop.fresh_shop(&mut pool, &mut rng).unwrap();
        let names: Vec<String> = shop.slot_names().iter().map(|s| s.to_string()).collect();
        shop.level_up();
        assert_eq!(shop.level(), 4);
        assert_eq!(shop.slot_names(), names);
    }

    #[test]
    fn buy_vacates_slot_and_keeps_unit_out_of_pool() {
        let (mut shop, mut pool, mut rng) = setup(5);
        shop.fresh_shop(&mut pool, &mut rng).unwrap();
        let size = pool.size(None);
        let bought = shop.buy(0).unwrap().unwrap();
        assert!(shop.slots()[0].is_none());
        assert_eq!(shop.buy(0).unwrap(), None);
        assert_eq!(shop.buy(SHOP_SLOTS), Err(ShopError::NoSuchSlot { slot: SHOP_SLOTS }));

        shop.refresh_shop(&mut pool, &mut rng).unwrap();
        // four returned, five drawn
        assert_eq!(pool.size(None), size + 4 - 5);
        assert!(pool.count_of(&bought) < pool.size(Some(bought.cost())));
    }

    #[test]
    fn shop_odds_is_pool_share_times_tier_odds() {
        let (shop, pool, _) = setup(3);
        let jinx = Catalog::builtin().find("Jinx").unwrap();
        let expected = (25.0 / (25.0 * 13.0)) * 0.25;
        assert!((shop.odds_of(&jinx, &pool) - expected).abs() < 1e-12);

        let ahri = Catalog::builtin().find("Ahri").unwrap();
        assert_eq!(shop.odds_of(&ahri, &pool), 0.0);
    }

    #[test]
    fn exhausted_tier_propagates() {
        let catalog: Catalog = [(1u8, UnitDescriptor::new("Solo"))].into_iter().collect();
        let rules = Ruleset::new(vec![3], [1, 3, 9]).unwrap();
        let mut pool = Pool::initialize(&catalog, &rules).unwrap();
        let odds = OddsTable::new(vec![vec![1.0]]).unwrap();
        let mut shop = Shop::new(1, odds).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            shop.fresh_shop(&mut pool, &mut rng),
            Err(ShopError::Pool(PoolError::EmptyTier(EmptyTierError { tier: 1 })))
        );
        assert_eq!(shop.slot_names(), vec!["Solo"; 3]);
    }

    #[test]
    fn unknown_levels() {
        assert_eq!(
            Shop::new(0, OddsTable::builtin()).unwrap_err(),
            ShopError::UnknownLevel { level: 0 }
        );
        let (mut shop, mut pool, mut rng) = setup(11);
        shop.level_up();
        assert_eq!(
            shop.fresh_shop(&mut pool, &mut rng),
            Err(ShopError::UnknownLevel { level: 12 })
        );
    }
}
