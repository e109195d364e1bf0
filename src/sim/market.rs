use std::collections::BTreeMap;

use super::context::DayContext;
use crate::model::Sector;

/// One company's result for a market round.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sale {
    /// Money segments spent with the company.
    pub spend: f64,
    pub units: f64,
    /// Spend after tax/subsidy adjustment; what the company keeps.
    pub revenue: f64,
}

/// Outcome of one day's market, read by the valuation and social updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketReport {
    pub sales: BTreeMap<u64, Sale>,
    /// Sum of segment sub-budgets earmarked per sector.
    pub sector_budgets: BTreeMap<Sector, f64>,
    /// Sum of spend actually allocated per sector.
    pub sector_spend: BTreeMap<Sector, f64>,
    /// Budget that found no company to spend on.
    pub unspent: f64,
    /// segment id -> company id -> spend.
    pub purchases: BTreeMap<u64, BTreeMap<u64, f64>>,
}

impl MarketReport {
    pub fn sale(&self, company_id: u64) -> Sale {
        self.sales.get(&company_id).copied().unwrap_or_default()
    }

    pub fn total_revenue(&self) -> f64 {
        self.sales.values().map(|s| s.revenue).sum()
    }
}

/// Natural log of a company's market attractiveness,
/// `alpha * ln(reputation) - beta * ln(price)`, never below `ln(floor)`.
///
/// Working in logs keeps steep exponents from overflowing: the raw score
/// `reputation^alpha * (1/price)^beta` is only ever formed relative to the
/// best score in the sector (see [`relative_scores`]).
pub fn log_score(reputation: f64, effective_price: f64, alpha: f64, beta: f64, floor: f64) -> f64 {
    let reputation_term = if alpha == 0.0 { 0.0 } else { alpha * reputation.ln() };
    let raw = reputation_term - beta * effective_price.ln();
    if raw.is_nan() {
        floor.ln()
    } else {
        raw.clamp(floor.ln(), f64::MAX)
    }
}

/// Turn one sector's log scores into weights relative to its best company,
/// which gets 1. Proportions match the raw scores exactly.
pub fn relative_scores(log_scored: &[(u64, f64)]) -> Vec<(u64, f64)> {
    let best = log_scored
        .iter()
        .map(|(_, s)| *s)
        .fold(f64::NEG_INFINITY, f64::max);
    log_scored
        .iter()
        .map(|(id, s)| (*id, (s - best).exp()))
        .collect()
}

/// Split `budget` across `(id, score)` pairs proportionally to score.
pub fn allocate(budget: f64, scored: &[(u64, f64)]) -> Vec<(u64, f64)> {
    let total: f64 = scored.iter().map(|(_, s)| s).sum();
    if budget <= 0.0 || total <= 0.0 {
        return scored.iter().map(|(id, _)| (*id, 0.0)).collect();
    }
    scored
        .iter()
        .map(|(id, s)| (*id, budget * s / total))
        .collect()
}

/// Allocate every segment's spending and record per-company sales.
///
/// Each company's last-day units and revenue are overwritten, including
/// companies that sold nothing. Retained revenue is credited to cash.
pub fn simulate_market(ctx: &mut DayContext) {
    let config = ctx.config;
    let mut report = MarketReport::default();

    let mut scored_by_sector: BTreeMap<Sector, Vec<(u64, f64)>> = BTreeMap::new();
    for company in ctx.world.companies.values() {
        let price = ctx
            .pricing
            .price_of(company.id)
            .unwrap_or(company.base_price)
            .max(config.price_floor);
        let s = log_score(
            company.reputation,
            price,
            config.alpha,
            config.beta,
            config.score_floor,
        );
        scored_by_sector
            .entry(company.sector.clone())
            .or_default()
            .push((company.id, s));
    }

    let scored_by_sector: BTreeMap<Sector, Vec<(u64, f64)>> = scored_by_sector
        .into_iter()
        .map(|(sector, log_scored)| (sector, relative_scores(&log_scored)))
        .collect();

    for segment in ctx.world.segments.values() {
        for (sector, share) in &segment.propensities {
            if *share <= 0.0 {
                continue;
            }
            let sub_budget = segment.sector_budget(sector);
            *report.sector_budgets.entry(sector.clone()).or_insert(0.0) += sub_budget;

            let Some(scored) = scored_by_sector.get(sector) else {
                report.unspent += sub_budget;
                tracing::debug!(
                    segment = segment.id,
                    sector = %sector,
                    sub_budget,
                    "no companies in sector, budget unspent"
                );
                continue;
            };
            let purchases = report.purchases.entry(segment.id).or_default();
            for (company_id, spend) in allocate(sub_budget, scored) {
                report.sales.entry(company_id).or_default().spend += spend;
                *report.sector_spend.entry(sector.clone()).or_insert(0.0) += spend;
                *purchases.entry(company_id).or_insert(0.0) += spend;
            }
        }
    }

    for company in ctx.world.companies.values_mut() {
        let sale = report.sales.entry(company.id).or_default();
        let price = ctx
            .pricing
            .price_of(company.id)
            .unwrap_or(company.base_price)
            .max(config.price_floor);
        sale.units = sale.spend / price;
        sale.revenue = sale.spend * ctx.pricing.revenue_multiplier_of(company.id);

        company.last_day_units_sold = sale.units;
        company.last_day_revenue = sale.revenue;
        company.cash += sale.revenue;
    }

    tracing::debug!(
        day = ctx.day,
        revenue = report.total_revenue(),
        unspent = report.unspent,
        "market cleared"
    );
    ctx.market = report;
}
