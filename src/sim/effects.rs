//! Event and policy effects.
//!
//! 1. `apply_events`: adds each event's deltas to its targets in generator
//!    order, clamping to [0, 1], and turns proposals/revocations into policy
//!    lifecycle changes.
//! 2. `apply_policies`: retires expired policies, then derives today's
//!    effective prices, revenue multipliers and consumer effects. Base prices
//!    are never touched.
//!
//! A target that no longer resolves (unknown id, sector without companies) is
//! a no-op for the day and logged.

use std::collections::BTreeMap;

use super::context::DayContext;
use crate::error::SimError;
use crate::model::{
    Event, EventEffect, EventKind, EventTarget, Policy, PolicyKind, PolicyTarget, Sector,
    WorldState,
};

/// Per-day pricing derived from the active policies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyPricing {
    /// Consumer-facing price for every company this round.
    pub effective_price: BTreeMap<u64, f64>,
    /// Fraction of market spend each company retains (1 when unregulated).
    pub revenue_multiplier: BTreeMap<u64, f64>,
    /// Summed direct consumer effect of active policies per sector.
    pub consumer_effect: BTreeMap<Sector, f64>,
}

impl PolicyPricing {
    pub fn price_of(&self, company_id: u64) -> Option<f64> {
        self.effective_price.get(&company_id).copied()
    }

    pub fn revenue_multiplier_of(&self, company_id: u64) -> f64 {
        self.revenue_multiplier
            .get(&company_id)
            .copied()
            .unwrap_or(1.0)
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

pub fn apply_events(ctx: &mut DayContext) {
    let events = std::mem::take(&mut ctx.events);
    for event in &events {
        apply_event(ctx.world, event, ctx.day);
    }
    ctx.events = events;
}

/// Apply one event. Each effect or revocation that fails to resolve is skipped
/// on its own; the rest of the event still lands.
fn apply_event(world: &mut WorldState, event: &Event, day: u32) {
    match event.kind {
        EventKind::PolicyProposal => {
            if let Err(err) = enact_proposal(world, event, day) {
                absorb(event, err);
            }
        }
        EventKind::PolicyRevocation => {
            for target in &event.targets {
                if let EventTarget::Policy(id) = target {
                    if let Err(err) = revoke(world, *id, day) {
                        absorb(event, err);
                    }
                }
            }
        }
        kind => {
            for effect in &event.effects {
                if let Err(err) = apply_effect(world, kind, effect) {
                    absorb(event, err);
                }
            }
        }
    }
}

fn apply_effect(world: &mut WorldState, kind: EventKind, effect: &EventEffect) -> Result<(), SimError> {
    match (kind, &effect.target) {
        (EventKind::CompanyImpact, EventTarget::Company(id)) => {
            let company = world
                .companies
                .get_mut(id)
                .ok_or_else(|| SimError::empty(format!("company {id} does not exist")))?;
            company.reputation = clamp_unit(company.reputation + effect.delta);
        }
        (EventKind::SectorImpact, EventTarget::Sector(sector)) => {
            let mut touched = 0;
            for company in world.companies.values_mut().filter(|c| &c.sector == sector) {
                company.reputation = clamp_unit(company.reputation + effect.delta);
                touched += 1;
            }
            if touched == 0 {
                return Err(SimError::empty(format!("no companies in sector {sector}")));
            }
        }
        (EventKind::PartyScandal, EventTarget::Party(id)) => {
            let party = world
                .parties
                .get_mut(id)
                .ok_or_else(|| SimError::empty(format!("party {id} does not exist")))?;
            party.reputation = clamp_unit(party.reputation - effect.delta);
            party.popularity = clamp_unit(party.popularity - effect.delta);
        }
        // An effect whose target does not fit the event kind carries no meaning.
        _ => {}
    }
    Ok(())
}

fn enact_proposal(world: &mut WorldState, event: &Event, day: u32) -> Result<(), SimError> {
    let Some(proposal) = &event.proposal else {
        return Err(SimError::empty(format!(
            "proposal event {} carries no policy",
            event.id
        )));
    };
    if !world.parties.contains_key(&proposal.sponsor) {
        return Err(SimError::empty(format!(
            "sponsor party {} does not exist",
            proposal.sponsor
        )));
    }
    if !(proposal.magnitude > 0.0 && proposal.magnitude < 1.0) {
        return Err(SimError::empty(format!(
            "policy magnitude {} outside (0, 1)",
            proposal.magnitude
        )));
    }
    let expiry_day = match proposal.duration_days {
        Some(0) => {
            return Err(SimError::empty(format!(
                "policy '{}' has zero duration",
                proposal.name
            )));
        }
        // Past the last representable day the policy never expires.
        Some(days) => day.checked_add(days - 1),
        None => None,
    };
    let id = world.add_policy(Policy {
        id: 0,
        name: proposal.name.clone(),
        sponsor: proposal.sponsor,
        target: proposal.target.clone(),
        kind: proposal.kind,
        magnitude: proposal.magnitude,
        activation_day: day,
        expiry_day,
        revoked_day: None,
        proposed_by_event: event.id,
    });
    tracing::debug!(day, policy = id, name = %proposal.name, "policy enacted");
    Ok(())
}

fn revoke(world: &mut WorldState, policy_id: u64, day: u32) -> Result<(), SimError> {
    let policy = world
        .active_policies
        .iter_mut()
        .find(|p| p.id == policy_id)
        .ok_or_else(|| SimError::empty(format!("policy {policy_id} is not active")))?;
    // Left for expiry retirement so the record shows it ran its course.
    if policy.is_expired_on(day) {
        return Err(SimError::empty(format!("policy {policy_id} already expired")));
    }
    policy.revoked_day = Some(day);
    world.retire_policy(policy_id);
    tracing::debug!(day, policy = policy_id, "policy revoked");
    Ok(())
}

fn absorb(event: &Event, err: SimError) {
    tracing::warn!(
        event = event.id,
        kind = %event.kind,
        error = %err,
        "event effect skipped"
    );
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

pub fn apply_policies(ctx: &mut DayContext) {
    let day = ctx.day;
    let expired: Vec<u64> = ctx
        .world
        .active_policies
        .iter()
        .filter(|p| p.is_expired_on(day))
        .map(|p| p.id)
        .collect();
    for id in expired {
        ctx.world.retire_policy(id);
        tracing::debug!(day, policy = id, "policy expired");
    }

    ctx.pricing = price_round(ctx.world, day, ctx.config.price_floor);
}

/// Effective prices for one market round. Multiplicative taxes and subsidies
/// apply first, then caps, then the floor.
pub fn price_round(world: &WorldState, day: u32, price_floor: f64) -> PolicyPricing {
    let mut pricing = PolicyPricing {
        effective_price: world
            .companies
            .values()
            .map(|c| (c.id, c.base_price))
            .collect(),
        ..PolicyPricing::default()
    };
    let mut ceilings: BTreeMap<u64, f64> = BTreeMap::new();

    for policy in world.active_policies.iter().filter(|p| p.is_active_on(day)) {
        let targeted = match targeted_companies(world, &policy.target) {
            Ok(ids) => ids,
            Err(err) => {
                tracing::warn!(day, policy = policy.id, error = %err, "policy has no effect today");
                continue;
            }
        };

        match policy.kind {
            PolicyKind::PriceCap => {
                let mean_base = targeted
                    .iter()
                    .filter_map(|id| world.company(*id))
                    .map(|c| c.base_price)
                    .sum::<f64>()
                    / targeted.len() as f64;
                let ceiling = (1.0 - policy.magnitude) * mean_base;
                for id in &targeted {
                    let entry = ceilings.entry(*id).or_insert(ceiling);
                    *entry = entry.min(ceiling);
                }
            }
            PolicyKind::Tax | PolicyKind::Subsidy => {
                for id in &targeted {
                    if let Some(price) = pricing.effective_price.get_mut(id) {
                        *price *= policy.price_multiplier();
                    }
                    *pricing.revenue_multiplier.entry(*id).or_insert(1.0) *=
                        policy.revenue_multiplier();
                }
            }
        }

        if let Some(sector) = world.policy_sector(&policy.target) {
            *pricing.consumer_effect.entry(sector).or_insert(0.0) += policy.consumer_effect();
        }
    }

    for (id, price) in pricing.effective_price.iter_mut() {
        if let Some(ceiling) = ceilings.get(id) {
            *price = price.min(*ceiling);
        }
        *price = price.max(price_floor);
    }
    pricing
}

fn targeted_companies(world: &WorldState, target: &PolicyTarget) -> Result<Vec<u64>, SimError> {
    let ids: Vec<u64> = match target {
        PolicyTarget::Sector(sector) => world.companies_in_sector(sector).map(|c| c.id).collect(),
        PolicyTarget::Company(id) => world.company(*id).map(|c| c.id).into_iter().collect(),
    };
    if ids.is_empty() {
        return Err(SimError::empty(format!("policy target {target:?} has no companies")));
    }
    Ok(ids)
}

pub(crate) fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}
