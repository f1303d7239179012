use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A game piece. Two units with the same name and cost are interchangeable,
/// whatever their trait tags say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    name: String,
    cost: u8,
    #[serde(default)]
    traits: BTreeSet<String>,
}

impl Unit {
    /// # Errors
    /// [`ConfigError::InvalidUnit`] for an empty name or a cost of 0. The
    /// upper bound of the cost range belongs to the ruleset and is checked
    /// when a pool is built.
    pub fn new(name: impl Into<String>, cost: u8) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.trim().is_empty() || cost == 0 {
            return Err(ConfigError::InvalidUnit { name, cost });
        }
        Ok(Self {
            name,
            cost,
            traits: BTreeSet::new(),
        })
    }

    #[must_use]
    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = traits.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> u8 {
        self.cost
    }

    pub fn traits(&self) -> &BTreeSet<String> {
        &self.traits
    }

    /// Same pool identity as `other` (name and cost).
    pub fn same_as(&self, name: &str, cost: u8) -> bool {
        self.cost == cost && self.name == name
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(&other.name, other.cost)
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.cost.hash(state);
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}-cost)", self.name, self.cost)
    }
}

/// Upgrade tier of a unit, reached by collecting copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Star {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Star {
    pub const ALL: [Star; 3] = [Star::One, Star::Two, Star::Three];

    pub(crate) fn index(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<u8> for Star {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Star::One),
            2 => Ok(Star::Two),
            3 => Ok(Star::Three),
            other => Err(format!("star level must be 1, 2 or 3 (got {other})")),
        }
    }
}

impl From<Star> for u8 {
    fn from(star: Star) -> Self {
        star as u8
    }
}

impl fmt::Display for Star {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-star", *self as u8)
    }
}
