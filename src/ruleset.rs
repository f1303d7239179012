use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::unit::Star;

/// Per-ruleset constants: how many copies of each unit a tier is seeded
/// with, and how many copies each star level takes.
///
/// Tier `c` lives at index `c - 1`, so a ruleset with `n` bag sizes manages
/// cost tiers `1..=n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    pub bag_sizes: Vec<u32>,
    pub star_copies: [u32; 3],
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            bag_sizes: vec![30, 25, 18, 10, 9],
            star_copies: [1, 3, 9],
        }
    }
}

impl Ruleset {
    pub fn new(bag_sizes: Vec<u32>, star_copies: [u32; 3]) -> Result<Self, ConfigError> {
        let rules = Self {
            bag_sizes,
            star_copies,
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Parse a (possibly partial) ruleset; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bag_sizes.is_empty() {
            return Err(ConfigError::Ruleset("no cost tiers"));
        }
        if self.bag_sizes.len() > usize::from(u8::MAX) {
            return Err(ConfigError::Ruleset("too many cost tiers"));
        }
        if self.bag_sizes.contains(&0) {
            return Err(ConfigError::Ruleset("bag sizes must be positive"));
        }
        let [one, two, three] = self.star_copies;
        if one == 0 || one >= two || two >= three {
            return Err(ConfigError::Ruleset(
                "star copy thresholds must be positive and strictly increasing",
            ));
        }
        Ok(())
    }

    pub fn tier_count(&self) -> usize {
        self.bag_sizes.len()
    }

    /// Highest managed cost tier.
    pub fn max_cost(&self) -> u8 {
        // validate() caps the tier count at u8::MAX
        u8::try_from(self.bag_sizes.len()).unwrap_or(u8::MAX)
    }

    pub fn tiers(&self) -> impl Iterator<Item = u8> {
        1..=self.max_cost()
    }

    pub fn manages(&self, cost: u8) -> bool {
        cost >= 1 && cost <= self.max_cost()
    }

    pub fn bag_size(&self, cost: u8) -> Option<u32> {
        let idx = usize::from(cost).checked_sub(1)?;
        self.bag_sizes.get(idx).copied()
    }

    /// Total copies a unit must reach for `star`.
    pub fn copies_for(&self, star: Star) -> u32 {
        self.star_copies[star.index()]
    }
}
