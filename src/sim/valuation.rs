//! Company reputation and share price from the day's market results.

use std::collections::BTreeMap;

use super::context::DayContext;
use super::effects::clamp_unit;
use crate::config::EngineConfig;
use crate::model::{Company, Sector};

pub fn update_companies(ctx: &mut DayContext) {
    let config = ctx.config;

    let mut competitors: BTreeMap<Sector, usize> = BTreeMap::new();
    for company in ctx.world.companies.values() {
        *competitors.entry(company.sector.clone()).or_insert(0) += 1;
    }

    for company in ctx.world.companies.values_mut() {
        let sector_spend = ctx
            .market
            .sector_spend
            .get(&company.sector)
            .copied()
            .unwrap_or(0.0);
        if sector_spend > 0.0 {
            let share = ctx.market.sale(company.id).spend / sector_spend;
            let fair_share = 1.0 / competitors[&company.sector] as f64;
            company.reputation = next_reputation(company.reputation, share, fair_share, config);
        }

        let opening = ctx
            .opening_reputation
            .get(&company.id)
            .copied()
            .unwrap_or(company.reputation);
        revalue(company, opening, config);
    }
}

/// `clamp(old + k_r * (share - fair_share))`.
pub fn next_reputation(old: f64, share: f64, fair_share: f64, config: &EngineConfig) -> f64 {
    clamp_unit(old + config.reputation_rate * (share - fair_share))
}

/// Update share price and trailing revenue from today's retained revenue.
///
/// The revenue ratio is measured against yesterday's trailing average, so a
/// company's first trading day is neutral.
pub fn revalue(company: &mut Company, opening_reputation: f64, config: &EngineConfig) {
    let revenue = company.last_day_revenue;
    let ratio = match company.trailing_revenue {
        Some(ema) if ema > 0.0 => (revenue / ema).clamp(0.0, config.max_revenue_ratio),
        _ => 1.0,
    };
    let growth = 1.0
        + config.price_rate * (ratio - 1.0)
        + config.price_reputation_rate * (company.reputation - opening_reputation);
    company.share_price = (company.share_price * growth).max(config.price_floor);

    company.trailing_revenue = Some(match company.trailing_revenue {
        Some(ema) => config.revenue_smoothing * revenue + (1.0 - config.revenue_smoothing) * ema,
        None => revenue,
    });
}
