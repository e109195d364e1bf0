use std::collections::BTreeMap;

use super::context::DayContext;
use super::effects::clamp_unit;
use crate::model::{CitizenSegment, Sector, WorldState};

/// Update segment satisfaction, then move every party's popularity by the
/// size-weighted mean satisfaction change. Party reputation is left alone.
pub fn update_society(ctx: &mut DayContext) {
    let config = ctx.config;
    let world: &WorldState = ctx.world;
    let mut weighted_delta = 0.0;
    let mut total_size = 0.0;

    let mut updated = Vec::with_capacity(world.segments.len());
    for segment in world.segments.values() {
        let experience = ctx
            .market
            .purchases
            .get(&segment.id)
            .and_then(|spend| market_experience(world, spend));
        let policy = policy_term(segment, &ctx.pricing.consumer_effect);

        let old = segment.satisfaction;
        let market_term = experience.map_or(0.0, |exp| config.satisfaction_rate * (exp - old));
        let new = clamp_unit(old + market_term + policy * config.policy_satisfaction_rate);

        weighted_delta += segment.size as f64 * (new - old);
        total_size += segment.size as f64;
        updated.push((segment.id, new));
    }
    for (id, satisfaction) in updated {
        if let Some(segment) = ctx.world.segments.get_mut(&id) {
            segment.satisfaction = satisfaction;
        }
    }

    let mean_delta = if total_size > 0.0 {
        weighted_delta / total_size
    } else {
        0.0
    };
    for party in ctx.world.parties.values_mut() {
        party.popularity = clamp_unit(party.popularity + config.popularity_rate * mean_delta);
    }
    tracing::debug!(day = ctx.day, mean_delta, "society updated");
}

/// Spend-weighted mean reputation of the companies a segment bought from.
/// `None` when the segment spent nothing.
pub fn market_experience(world: &WorldState, spend: &BTreeMap<u64, f64>) -> Option<f64> {
    let mut total = 0.0;
    let mut weighted = 0.0;
    for (company_id, amount) in spend {
        let Some(company) = world.company(*company_id) else {
            continue;
        };
        if *amount > 0.0 {
            total += amount;
            weighted += amount * company.reputation;
        }
    }
    (total > 0.0).then(|| weighted / total)
}

/// Sum of today's policy consumer effects over the sectors a segment buys in.
fn policy_term(segment: &CitizenSegment, consumer_effect: &BTreeMap<Sector, f64>) -> f64 {
    consumer_effect
        .iter()
        .filter(|(sector, _)| segment.spends_in(sector))
        .map(|(_, effect)| effect)
        .sum()
}
