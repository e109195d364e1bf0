use std::fmt;

use super::context::DayContext;
use super::effects::{apply_events, apply_policies};
use super::generator::EventGenerator;
use super::market::simulate_market;
use super::social::update_society;
use super::valuation::update_companies;
use crate::config::{EngineConfig, MAX_EVENTS_PER_DAY};
use crate::error::SimError;
use crate::model::{CompanySnapshot, DaySummary, Event, PartySnapshot, WorldState};

/// One step of a simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Generate,
    ApplyEvents,
    ApplyPolicies,
    SimulateMarket,
    UpdateCompanies,
    UpdateSociety,
    Summarize,
}

/// Strict order of phases within a day.
pub const PHASE_ORDER: [Phase; 7] = [
    Phase::Generate,
    Phase::ApplyEvents,
    Phase::ApplyPolicies,
    Phase::SimulateMarket,
    Phase::UpdateCompanies,
    Phase::UpdateSociety,
    Phase::Summarize,
];

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Generate => "generate",
            Phase::ApplyEvents => "apply_events",
            Phase::ApplyPolicies => "apply_policies",
            Phase::SimulateMarket => "simulate_market",
            Phase::UpdateCompanies => "update_companies",
            Phase::UpdateSociety => "update_society",
            Phase::Summarize => "summarize",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives the daily pipeline with a validated configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Simulate one day and append its summary to the world's history.
    ///
    /// The day runs on a copy of `state`; the caller's state is replaced only
    /// when every phase succeeds. `day` must be later than `state.day`.
    pub fn simulate_day(
        &self,
        state: &mut WorldState,
        day: u32,
        generator: &mut dyn EventGenerator,
    ) -> Result<DaySummary, SimError> {
        if day <= state.day {
            return Err(SimError::DayOutOfOrder {
                requested: day,
                last: state.day,
            });
        }
        state.validate()?;

        let mut next = state.clone();
        next.events_today.clear();

        let mut ctx = DayContext::new(&mut next, &self.config, day);
        for phase in PHASE_ORDER {
            tracing::debug!(day, phase = %phase, "entering phase");
            match phase {
                Phase::Generate => ctx.events = generate_events(ctx.world, day, generator),
                Phase::ApplyEvents => apply_events(&mut ctx),
                Phase::ApplyPolicies => apply_policies(&mut ctx),
                Phase::SimulateMarket => simulate_market(&mut ctx),
                Phase::UpdateCompanies => update_companies(&mut ctx),
                Phase::UpdateSociety => update_society(&mut ctx),
                Phase::Summarize => {}
            }
            if let Err(err) = ctx.world.check_invariants(phase) {
                tracing::error!(day, phase = %phase, error = %err, "day abandoned");
                return Err(err);
            }
        }

        let summary = summarize(&next, day, self.config.top_companies);
        next.day = day;
        next.history.push(summary.clone());
        *state = next;

        tracing::info!(
            day,
            events = summary.events_count,
            total_revenue = summary.total_revenue,
            mean_satisfaction = summary.mean_satisfaction,
            "day simulated"
        );
        Ok(summary)
    }

    /// Simulate the `num_days` days following `state.day`.
    pub fn run(
        &self,
        state: &mut WorldState,
        num_days: u32,
        generator: &mut dyn EventGenerator,
    ) -> Result<Vec<DaySummary>, SimError> {
        let start = state.day;
        if start.checked_add(num_days).is_none() {
            return Err(SimError::invalid(
                "num_days",
                format!("{num_days} days after day {start} is past the last representable day"),
            ));
        }
        (1..=num_days)
            .map(|offset| self.simulate_day(state, start + offset, generator))
            .collect()
    }
}

/// [`Engine::simulate_day`] with the default configuration.
pub fn simulate_day(
    state: &mut WorldState,
    day: u32,
    generator: &mut dyn EventGenerator,
) -> Result<DaySummary, SimError> {
    Engine::default().simulate_day(state, day, generator)
}

/// [`Engine::run`] with the default configuration.
pub fn run(
    state: &mut WorldState,
    num_days: u32,
    generator: &mut dyn EventGenerator,
) -> Result<Vec<DaySummary>, SimError> {
    Engine::default().run(state, num_days, generator)
}

/// Ask the generator for today's events and record the ones that honour its
/// contract. A failing generator means a quiet day.
fn generate_events(
    world: &mut WorldState,
    day: u32,
    generator: &mut dyn EventGenerator,
) -> Vec<Event> {
    let mut events = match generator.generate(world, day) {
        Ok(events) => events,
        Err(source) => {
            let err = SimError::GeneratorUnavailable {
                generator: generator.name().to_string(),
                source,
            };
            tracing::warn!(day, error = %err, "no events today");
            return Vec::new();
        }
    };

    let before = events.len();
    events.retain(|e| e.day == day);
    if events.len() != before {
        tracing::warn!(
            day,
            generator = generator.name(),
            dropped = before - events.len(),
            "dropped events dated for another day"
        );
    }
    if events.len() > MAX_EVENTS_PER_DAY {
        tracing::warn!(
            day,
            generator = generator.name(),
            produced = events.len(),
            kept = MAX_EVENTS_PER_DAY,
            "too many events, truncating"
        );
        events.truncate(MAX_EVENTS_PER_DAY);
    }

    events.into_iter().map(|e| world.accept_event(e)).collect()
}

/// Snapshot the world at the end of `day`.
pub fn summarize(world: &WorldState, day: u32, top_n: usize) -> DaySummary {
    let total_revenue = world.companies.values().map(|c| c.last_day_revenue).sum();
    let mean_share_price = if world.companies.is_empty() {
        0.0
    } else {
        world.companies.values().map(|c| c.share_price).sum::<f64>()
            / world.companies.len() as f64
    };

    let parties = world
        .parties
        .values()
        .map(|p| PartySnapshot {
            party_id: p.id,
            name: p.name.clone(),
            popularity: p.popularity,
            reputation: p.reputation,
        })
        .collect();

    let mut top_companies: Vec<CompanySnapshot> = world
        .companies
        .values()
        .map(|c| CompanySnapshot {
            company_id: c.id,
            name: c.name.clone(),
            reputation: c.reputation,
            share_price: c.share_price,
            revenue: c.last_day_revenue,
        })
        .collect();
    top_companies.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then(a.company_id.cmp(&b.company_id))
    });
    top_companies.truncate(top_n);

    DaySummary {
        day,
        total_revenue,
        mean_share_price,
        mean_satisfaction: world.mean_satisfaction(),
        parties,
        top_companies,
        events_count: world.events_today.len(),
        active_policies_count: world.active_policies.len(),
    }
}
