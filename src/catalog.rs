//! Unit rosters: which distinct units exist in each cost tier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::unit::Unit;

/// Supplies the roster a [`crate::Pool`] is seeded from.
///
/// Implementations may read a file, decode an embedded constant or call out
/// to a service; the pool only sees the resulting snapshot.
pub trait CatalogProvider {
    fn catalog(&self) -> Result<Catalog, ConfigError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDescriptor {
    pub name: String,
    #[serde(default)]
    pub traits: Vec<String>,
}

impl UnitDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            traits: Vec::new(),
        }
    }

    pub fn to_unit(&self, cost: u8) -> Result<Unit, ConfigError> {
        Ok(Unit::new(self.name.clone(), cost)?.with_traits(self.traits.iter().cloned()))
    }
}

/// Snapshot of a roster, keyed by cost tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tiers: BTreeMap<u8, Vec<UnitDescriptor>>,
}

const BUILTIN_ROSTER: [(u8, &[&str]); 5] = [
    (
        1,
        &[
            "Cassiopeia", "Cho'Gath", "Graves", "Illaoi", "Irelia", "Jhin", "Kayle", "Malzahar",
            "Milio", "Orianna", "Poppy", "Renekton",
        ],
    ),
    (
        2,
        &[
            "Ashe", "Galio", "Jinx", "Kassadin", "Naafiri", "Qiyana", "Sett", "Soraka", "Swain",
            "Taliyah", "Twisted Fate", "Vi", "Warwick",
        ],
    ),
    (
        3,
        &[
            "Darius", "Ekko", "Jayce", "Karma", "Katarina", "Miss Fortune", "Nautilus", "Neeko",
            "Quinn", "Rek'Sai", "Sona", "Taric", "Vel'Koz",
        ],
    ),
    (
        4,
        &[
            "Aphelios", "Azir", "Fiora", "Jarvan IV", "Kai'Sa", "Mordekaiser", "Nasus", "Nilah",
            "Sejuani", "Shen", "Silco", "Xayah",
        ],
    ),
    (
        5,
        &[
            "Aatrox", "Ahri", "Bel'Veth", "Gangplank", "Heimerdinger", "K'Sante", "Ryze", "Sion",
        ],
    ),
];

impl Catalog {
    /// Embedded five-tier roster matching [`crate::Ruleset::default`].
    pub fn builtin() -> Self {
        BUILTIN_ROSTER
            .iter()
            .flat_map(|(tier, names)| names.iter().map(move |n| (*tier, UnitDescriptor::new(*n))))
            .collect()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the champion list of one set out of a CommunityDragon TFT export.
    ///
    /// Entries above `max_cost`, and trait-less entries (summons, props,
    /// tutorial dummies), are skipped.
    pub fn from_cdragon_json(json: &str, set_id: &str, max_cost: u8) -> Result<Self, ConfigError> {
        let export: CdragonExport = serde_json::from_str(json)?;
        let set = export
            .sets
            .get(set_id)
            .ok_or_else(|| ConfigError::MissingSet(set_id.to_string()))?;

        Ok(set
            .champions
            .iter()
            .filter(|c| c.cost <= max_cost && !c.traits.is_empty())
            .map(|c| {
                (
                    c.cost,
                    UnitDescriptor {
                        name: c.name.clone(),
                        traits: c.traits.clone(),
                    },
                )
            })
            .collect())
    }

    pub fn insert(&mut self, tier: u8, unit: UnitDescriptor) {
        self.tiers.entry(tier).or_default().push(unit);
    }

    pub fn tier(&self, tier: u8) -> &[UnitDescriptor] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct units in `tier`.
    pub fn distinct(&self, tier: u8) -> usize {
        self.tier(tier).len()
    }

    pub fn tiers(&self) -> impl Iterator<Item = (u8, &[UnitDescriptor])> {
        self.tiers.iter().map(|(t, units)| (*t, units.as_slice()))
    }

    /// Find a unit by name in any tier.
    pub fn find(&self, name: &str) -> Option<Unit> {
        self.tiers.iter().find_map(|(tier, units)| {
            units
                .iter()
                .find(|u| u.name == name)
                .and_then(|u| u.to_unit(*tier).ok())
        })
    }
}

impl FromIterator<(u8, UnitDescriptor)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (u8, UnitDescriptor)>>(iter: I) -> Self {
        let mut catalog = Catalog::default();
        for (tier, unit) in iter {
            catalog.insert(tier, unit);
        }
        catalog
    }
}

impl CatalogProvider for Catalog {
    fn catalog(&self) -> Result<Catalog, ConfigError> {
        Ok(self.clone())
    }
}

#[derive(Deserialize)]
struct CdragonExport {
    sets: BTreeMap<String, CdragonSet>,
}

#[derive(Deserialize)]
struct CdragonSet {
    #[serde(default)]
    champions: Vec<CdragonChampion>,
}

#[derive(Deserialize)]
struct CdragonChampion {
    name: String,
    cost: u8,
    #[serde(default)]
    traits: Vec<String>,
}
