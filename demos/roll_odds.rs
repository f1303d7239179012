use std::path::PathBuf;

use clap::Parser;
use shoproll::{
    Catalog, CatalogProvider, DEFAULT_HORIZON_SLOTS, JsonSource, OddsProvider, OddsTable,
    Outcome, RollQuery, Rounding, Ruleset, Session, Star,
};
use tracing_subscriber::{EnvFilter, fmt};

/// Expected rerolls (and the odds by reroll) to star up a unit.
#[derive(Debug, Parser)]
struct Args {
    /// Unit name as it appears in the catalog.
    unit: String,
    /// Target star level (1-3).
    #[arg(long, default_value_t = 2)]
    star: u8,
    /// Player level.
    #[arg(long, default_value_t = 7)]
    level: u32,
    /// Copies already on your board or bench.
    #[arg(long, default_value_t = 0)]
    team: u32,
    /// Copies on other players' boards and benches.
    #[arg(long, default_value_t = 0)]
    other: u32,
    /// Catalog JSON (tier -> units); defaults to the built-in roster.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Odds JSON ({"levels": [[...], ...]}); defaults to the built-in table.
    #[arg(long)]
    odds: Option<PathBuf>,
    /// Ruleset JSON; missing fields keep their defaults.
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Also roll this many shops in a simulated session.
    #[arg(long, default_value_t = 0)]
    simulate: u32,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let star = Star::try_from(args.star)?;

    let catalog: Box<dyn CatalogProvider> = match &args.catalog {
        Some(path) => Box::new(JsonSource::new(path)),
        None => Box::new(Catalog::builtin()),
    };
    let odds: Box<dyn OddsProvider> = match &args.odds {
        Some(path) => Box::new(JsonSource::new(path)),
        None => Box::new(OddsTable::builtin()),
    };
    let rules = match &args.rules {
        Some(path) => Ruleset::from_json(&std::fs::read_to_string(path)?)?,
        None => Ruleset::default(),
    };

    let unit = catalog
        .catalog()?
        .find(&args.unit)
        .ok_or_else(|| format!("{} is not in the catalog", args.unit))?;

    let mut session = Session::seeded(
        catalog.as_ref(),
        odds.as_ref(),
        rules,
        args.level,
        args.seed,
    )?;
    for _ in 0..args.simulate {
        session.reroll()?;
        println!("{:?}", session.shop().slot_names());
    }

    // copies on our team are out of the tier's bag; the sweep takes copies
    // elsewhere out itself
    let drawable = session.pool().size(Some(unit.cost())) + session.shop().slotted(unit.cost());
    let sweep_base = RollQuery::new(
        &unit,
        star,
        args.level,
        f64::from(drawable.saturating_sub(args.team)),
    )
    .on_team(args.team);
    let query = RollQuery {
        pool_denominator: (sweep_base.pool_denominator - f64::from(args.other)).max(0.0),
        ..sweep_base.elsewhere(args.other)
    };
    let engine = session.engine();

    let expected = engine.number_shops(&query, Rounding::Hundredths)?;
    println!("Expected shops until {star} {}: {expected}", unit.name());

    if let Outcome::Value(dist) = engine.distribution(&query, DEFAULT_HORIZON_SLOTS)? {
        for confidence in [0.5, 0.75, 0.9, 0.99] {
            match dist.rerolls_for(confidence) {
                Some(r) => println!("  {:>3.0}% by {r} rerolls", confidence * 100.0),
                None => println!("  {:>3.0}% beyond the horizon", confidence * 100.0),
            }
        }
    }

    for point in engine.n_other_shop_distribution(&sweep_base)?.iter().step_by(3) {
        println!("  {:>2} left in pool: {}", point.value, point.outcome);
    }
    Ok(())
}
