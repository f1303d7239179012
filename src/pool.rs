use std::collections::BTreeMap;

use rand::Rng;
use tracing::{debug, info, trace};

use crate::IndexSampler;
use crate::catalog::Catalog;
use crate::error::{ConfigError, EmptyTierError, PoolError};
use crate::ruleset::Ruleset;
use crate::sampler::TierBag;
use crate::unit::Unit;

/// The shared bag every shop draws from, partitioned by cost tier.
///
/// Units sitting in a shop slot or on a player's bench are checked out and
/// not counted here. Tiers are independent: nothing done to one tier changes
/// another tier's counts or odds.
#[derive(Debug, Clone)]
pub struct Pool {
    tiers: BTreeMap<u8, TierBag>,
}

impl Pool {
    /// Seed every tier with `bag_size(tier)` copies of each catalog unit.
    ///
    /// # Errors
    /// * [`ConfigError::MissingTier`] if the catalog has no units for a tier
    ///   the ruleset manages.
    /// * [`ConfigError::TierOutOfRange`] for a catalog tier outside `1..=K`.
    /// * [`ConfigError::DuplicateUnit`] if a name appears twice in a tier.
    pub fn initialize(catalog: &Catalog, rules: &Ruleset) -> Result<Self, ConfigError> {
        rules.validate()?;
        let max = rules.max_cost();

        for (tier, units) in catalog.tiers() {
            if !rules.manages(tier) {
                let name = units.first().map(|u| u.name.clone()).unwrap_or_default();
                return Err(ConfigError::TierOutOfRange {
                    name,
                    cost: tier,
                    max,
                });
            }
        }

        let mut tiers = BTreeMap::new();
        for (tier, copies) in rules.tiers().zip(rules.bag_sizes.iter().copied()) {
            let units = catalog.tier(tier);
            if units.is_empty() {
                return Err(ConfigError::MissingTier { tier });
            }
            let mut bag = TierBag::default();
            for desc in units {
                if bag.contains_name(&desc.name) {
                    return Err(ConfigError::DuplicateUnit {
                        name: desc.name.clone(),
                        tier,
                    });
                }
                bag.seed(desc.to_unit(tier)?, copies);
            }
            debug!(
                target: "shoproll::pool",
                tier,
                distinct = units.len(),
                copies,
                size = bag.total(),
                "seeded tier"
            );
            tiers.insert(tier, bag);
        }

        let pool = Self { tiers };
        info!(target: "shoproll::pool", size = pool.size(None), "pool initialized");
        Ok(pool)
    }

    /// Remove and return one copy from `tier`, uniformly over what remains.
    ///
    /// # Errors
    /// [`PoolError::EmptyTier`] when the tier is exhausted; nothing is retried.
    pub fn draw<R: Rng + ?Sized>(&mut self, tier: u8, rng: &mut R) -> Result<Unit, PoolError> {
        let bag = self
            .tiers
            .get_mut(&tier)
            .ok_or(PoolError::UnknownTier { tier })?;
        if bag.total() == 0 {
            return Err(EmptyTierError { tier }.into());
        }
        let idx = bag.sample_index(rng);
        let unit = bag.take(idx).ok_or(EmptyTierError { tier })?;
        trace!(target: "shoproll::pool", tier, unit = unit.name(), left = bag.total(), "draw");
        Ok(unit)
    }

    /// Put a unit back into its tier. The caller pairs draws and returns.
    pub fn return_unit(&mut self, unit: Unit) -> Result<(), PoolError> {
        let tier = unit.cost();
        let bag = self
            .tiers
            .get_mut(&tier)
            .ok_or(PoolError::UnknownTier { tier })?;
        trace!(target: "shoproll::pool", tier, unit = unit.name(), "return");
        bag.put(unit);
        Ok(())
    }

    /// Copies left in `tier`, or in the whole pool for `None`.
    pub fn size(&self, tier: Option<u8>) -> u32 {
        match tier {
            Some(t) => self.tiers.get(&t).map_or(0, TierBag::total),
            None => self.tiers.values().map(TierBag::total).sum(),
        }
    }

    /// Copies of `unit` left in its tier.
    pub fn count_of(&self, unit: &Unit) -> u32 {
        self.tiers
            .get(&unit.cost())
            .map_or(0, |bag| bag.count_of(unit))
    }

    /// Chance a single draw from the unit's tier yields that unit.
    /// An empty or unmanaged tier has zero chance.
    pub fn odds_of(&self, unit: &Unit) -> f64 {
        let size = self.size(Some(unit.cost()));
        if size == 0 {
            return 0.0;
        }
        f64::from(self.count_of(unit)) / f64::from(size)
    }

    pub fn tiers(&self) -> impl Iterator<Item = u8> + '_ {
        self.tiers.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UnitDescriptor;
    use rand::{SeedableRng, rngs::StdRng};

    const DISTINCT: [u32; 5] = [12, 13, 13, 12, 8];
    const BAGS: [u32; 5] = [30, 25, 18, 10, 9];

    fn pool() -> Pool {
        Pool::initialize(&Catalog::builtin(), &Ruleset::default()).unwrap()
    }

    #[test]
    fn fresh_pool_sizes() {
        let pool = pool();
        for tier in 1..=5u8 {
            let i = usize::from(tier - 1);
            assert_eq!(pool.size(Some(tier)), DISTINCT[i] * BAGS[i], "tier {tier}");
        }
        let total: u32 = DISTINCT.iter().zip(BAGS).map(|(d, b)| d * b).sum();
        assert_eq!(pool.size(None), total);
        assert_eq!(pool.size(Some(9)), 0);
    }

    #[test]
    fn fourteen_units_at_thirty_copies_is_420() {
        let catalog: Catalog = (0..14)
            .map(|i| (1u8, UnitDescriptor::new(format!("unit-{i}"))))
            .collect();
        let rules = Ruleset::new(vec![30], [1, 3, 9]).unwrap();
        let pool = Pool::initialize(&catalog, &rules).unwrap();
        assert_eq!(pool.size(Some(1)), 420);
    }

    #[test]
    fn draw_then_return_restores_size() {
        let mut pool = pool();
        let mut rng = StdRng::seed_from_u64(5);
        for tier in 1..=5u8 {
            let before = pool.size(Some(tier));
            let unit = pool.draw(tier, &mut rng).unwrap();
            assert_eq!(unit.cost(), tier);
            assert_eq!(pool.size(Some(tier)), before - 1);
            pool.return_unit(unit).unwrap();
            assert_eq!(pool.size(Some(tier)), before);
        }
    }

    #[test]
    fn odds_track_draws_and_returns() {
        let mut pool = pool();
        let mut rng = StdRng::seed_from_u64(9);
        for tier in 1..=5u8 {
            let i = usize::from(tier - 1);
            let drawn = pool.draw(tier, &mut rng).unwrap();
            let after_draw = pool.odds_of(&drawn);
            let fresh = 1.0 / f64::from(DISTINCT[i]);
            let expected = f64::from(BAGS[i] - 1) / f64::from(BAGS[i] * DISTINCT[i] - 1);
            assert!((after_draw - expected).abs() < 1e-12, "tier {tier}");
            assert!(after_draw < fresh, "tier {tier}");

            pool.return_unit(drawn.clone()).unwrap();
            let after_return = pool.odds_of(&drawn);
            assert!(after_return > after_draw, "tier {tier}");
            assert!((after_return - fresh).abs() < 1e-12, "tier {tier}");
        }
    }

    #[test]
    fn tiers_are_independent() {
        let mut pool = pool();
        let mut rng = StdRng::seed_from_u64(1);
        let jinx = Catalog::builtin().find("Jinx").unwrap();
        let odds = pool.odds_of(&jinx);
        for _ in 0..50 {
            pool.draw(1, &mut rng).unwrap();
        }
        assert_eq!(pool.odds_of(&jinx), odds);
        assert_eq!(pool.size(Some(2)), 13 * 25);
    }

    #[test]
    fn exhausted_tier_is_an_error() {
        let catalog: Catalog = [(1u8, UnitDescriptor::new("Solo"))].into_iter().collect();
        let rules = Ruleset::new(vec![2], [1, 3, 9]).unwrap();
        let mut pool = Pool::initialize(&catalog, &rules).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let solo = pool.draw(1, &mut rng).unwrap();
        assert_eq!(pool.odds_of(&solo), 1.0);
        pool.draw(1, &mut rng).unwrap();
        assert_eq!(pool.odds_of(&solo), 0.0);
        assert_eq!(
            pool.draw(1, &mut rng),
            Err(PoolError::EmptyTier(EmptyTierError { tier: 1 }))
        );
        assert_eq!(
            pool.draw(2, &mut rng),
            Err(PoolError::UnknownTier { tier: 2 })
        );
    }

    #[test]
    fn returning_into_unmanaged_tier_fails() {
        let mut pool = pool();
        let stray = Unit::new("Viktor", 6).unwrap();
        assert_eq!(
            pool.return_unit(stray),
            Err(PoolError::UnknownTier { tier: 6 })
        );
    }

    #[test]
    fn rejects_incomplete_catalogs() {
        let rules = Ruleset::default();

        let full = Catalog::builtin();
        let missing: Catalog = full
            .tiers()
            .filter(|(t, _)| *t != 3)
            .flat_map(|(t, units)| units.iter().cloned().map(move |u| (t, u)))
            .collect();
        assert!(matches!(
            Pool::initialize(&missing, &rules),
            Err(ConfigError::MissingTier { tier: 3 })
        ));

        let mut extra = Catalog::builtin();
        extra.insert(6, UnitDescriptor::new("Viktor"));
        assert!(matches!(
            Pool::initialize(&extra, &rules),
            Err(ConfigError::TierOutOfRange { cost: 6, max: 5, .. })
        ));

        let mut dup = Catalog::builtin();
        dup.insert(2, UnitDescriptor::new("Jinx"));
        assert!(matches!(
            Pool::initialize(&dup, &rules),
            Err(ConfigError::DuplicateUnit { tier: 2, .. })
        ));
    }
}
