use thiserror::Error;

/// Errors raised while building an alias table from raw weights.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplerError {
    #[error("weights slice is empty")]
    Empty,
    #[error("weights contain a negative value at index {index}: {value}")]
    Negative { index: usize, value: f64 },
    #[error("sum of weights is zero")]
    ZeroSum,
}

/// Malformed or incomplete catalog, odds or ruleset data.
///
/// Always fatal to whatever was being constructed; nothing is defaulted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid unit {name:?} (cost {cost})")]
    InvalidUnit { name: String, cost: u8 },
    #[error("catalog has no units for cost tier {tier}")]
    MissingTier { tier: u8 },
    #[error("unit {name:?} has cost {cost}, outside the supported range 1..={max}")]
    TierOutOfRange { name: String, cost: u8, max: u8 },
    #[error("unit {name:?} listed twice in cost tier {tier}")]
    DuplicateUnit { name: String, tier: u8 },
    #[error("catalog export has no set {0:?}")]
    MissingSet(String),
    #[error("ruleset is invalid: {0}")]
    Ruleset(&'static str),
    #[error("odds table has no levels")]
    NoLevels,
    #[error("level {level} has {found} tier odds, expected {expected}")]
    OddsLength {
        level: u32,
        expected: usize,
        found: usize,
    },
    #[error("level {level} odds sum to {sum}, expected 1.0")]
    OddsSum { level: u32, sum: f64 },
    #[error("level {level} odds are unusable: {source}")]
    OddsSampler {
        level: u32,
        #[source]
        source: SamplerError,
    },
    #[error("level {level} is not in the odds table (1..={max})")]
    UnknownLevel { level: u32, max: u32 },
    #[error("odds table covers {odds} tiers but the ruleset defines {ruleset}")]
    TierCountMismatch { odds: usize, ruleset: usize },
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A draw hit a cost tier with nothing left in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cost tier {tier} has no units left to draw")]
pub struct EmptyTierError {
    pub tier: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error(transparent)]
    EmptyTier(#[from] EmptyTierError),
    #[error("cost tier {tier} is not managed by this pool")]
    UnknownTier { tier: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("no shop odds for level {level}")]
    UnknownLevel { level: u32 },
    #[error("shop slot {slot} does not exist")]
    NoSuchSlot { slot: usize },
}

/// A probability query referenced data the engine does not have.
///
/// Ordinary "can't get there" answers are [`crate::Guard`] values, not errors.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no shop odds for level {level}")]
    UnknownLevel { level: u32 },
    #[error("cost tier {cost} is not part of the ruleset")]
    UnknownTier { cost: u8 },
}

/// Umbrella error for callers that drive a whole [`crate::Session`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Shop(#[from] ShopError),
    #[error(transparent)]
    Query(#[from] QueryError),
}
