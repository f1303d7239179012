//! Reroll-count statistics.
//!
//! Each needed copy is modelled as a geometric wait (in shop slots) whose
//! success chance is `copies_left / pool_denominator * tier_odds`. After
//! every copy both counts drop by one, so later waits are longer. The
//! expectation of the total is a plain sum of `1 / p`; the distribution is
//! the convolution of the per-copy PMFs, built by stepping a copies-in-hand
//! chain one slot at a time.
//!
//! Nothing here touches a [`crate::Pool`] or [`crate::Shop`]; the engine
//! reads a ruleset and an odds table and works on plain numbers, so it can be
//! shared across threads freely.

mod distribution;
mod expected;
mod state;
mod sweep;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::odds::OddsTable;
use crate::ruleset::Ruleset;
use crate::unit::{Star, Unit};

pub use distribution::{DEFAULT_HORIZON_SLOTS, RollDistribution, TAIL_TOLERANCE};
pub use state::RollState;
pub use sweep::SweepPoint;

/// Inputs of one "how long until I hit" question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollQuery {
    pub cost: u8,
    /// Copies the player already holds.
    pub owned_on_team: u32,
    /// Copies on other players' boards and benches.
    pub owned_elsewhere: u32,
    /// Same-cost units left to draw from. May be an estimate.
    pub pool_denominator: f64,
    pub star: Star,
    pub level: u32,
}

impl RollQuery {
    pub fn new(unit: &Unit, star: Star, level: u32, pool_denominator: f64) -> Self {
        Self {
            cost: unit.cost(),
            owned_on_team: 0,
            owned_elsewhere: 0,
            pool_denominator,
            star,
            level,
        }
    }

    #[must_use]
    pub fn on_team(mut self, copies: u32) -> Self {
        self.owned_on_team = copies;
        self
    }

    #[must_use]
    pub fn elsewhere(mut self, copies: u32) -> Self {
        self.owned_elsewhere = copies;
        self
    }
}

/// Why a query has no numeric answer. These come from ordinary input and
/// are meant to be shown to the user, not raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Guard {
    AlreadyMet,
    LevelTooLow { cost: u8 },
    NotEnoughLeft,
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::AlreadyMet => write!(f, "unit is already at the target star level"),
            Guard::LevelTooLow { cost } => write!(f, "level too low to find {cost} cost units"),
            Guard::NotEnoughLeft => write!(f, "not enough units left in pool"),
        }
    }
}

/// A numeric answer or the guard that prevented one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome<T> {
    Value(T),
    Guarded(Guard),
}

/// Expected shop refreshes, or a guard.
pub type RollOutcome = Outcome<f64>;

impl<T> Outcome<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::Guarded(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::Guarded(_) => None,
        }
    }

    pub fn guard(&self) -> Option<Guard> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Guarded(g) => Some(*g),
        }
    }
}

impl fmt::Display for Outcome<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Value(v) => write!(f, "{v}"),
            Outcome::Guarded(g) => write!(f, "{g}"),
        }
    }
}

/// How `number_shops` presents its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rounding {
    /// Nearest whole refresh (halves round away from zero).
    #[default]
    Nearest,
    Hundredths,
    Exact,
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Nearest => value.round(),
            Rounding::Hundredths => (value * 100.0).round() / 100.0,
            Rounding::Exact => value,
        }
    }
}

/// Stateless calculator over one ruleset and odds table.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'a> {
    ruleset: &'a Ruleset,
    odds: &'a OddsTable,
}

impl<'a> Engine<'a> {
    pub fn new(ruleset: &'a Ruleset, odds: &'a OddsTable) -> Self {
        Self { ruleset, odds }
    }

    pub fn ruleset(&self) -> &'a Ruleset {
        self.ruleset
    }

    pub fn odds(&self) -> &'a OddsTable {
        self.odds
    }
}
