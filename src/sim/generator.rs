use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, SimError};
use crate::model::{
    Event, EventKind, EventTarget, PolicyKind, PolicyProposal, PolicyTarget, WorldState,
};

/// Largest magnitude the random generator gives a proposed policy.
const MAX_POLICY_MAGNITUDE: f64 = 0.95;

/// A pluggable source of daily events.
///
/// Implementations see a read-only snapshot of the world and return at most
/// five events dated `day`, in the order they should be applied. A source that
/// cannot produce events (a remote backend is down, a call timed out) returns
/// an error; the engine treats that as a quiet day. Implementations doing I/O
/// must bound their own latency.
///
/// Object-safe so generators can be passed as `&mut dyn EventGenerator`.
pub trait EventGenerator {
    fn name(&self) -> &str;
    fn generate(&mut self, state: &WorldState, day: u32) -> Result<Vec<Event>, GeneratorError>;
}

/// Produces no events, ever.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventGenerator;

impl EventGenerator for NullEventGenerator {
    fn name(&self) -> &str {
        "null"
    }

    fn generate(&mut self, _state: &WorldState, _day: u32) -> Result<Vec<Event>, GeneratorError> {
        Ok(Vec::new())
    }
}

/// Replays a fixed list of events per day. Days can be marked as failing to
/// exercise the unavailable-source path.
#[derive(Debug, Default, Clone)]
pub struct ScriptedEventGenerator {
    by_day: BTreeMap<u32, Vec<Event>>,
    failing_days: BTreeSet<u32>,
}

impl ScriptedEventGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for its own `day`.
    pub fn with_event(mut self, event: Event) -> Self {
        self.by_day.entry(event.day).or_default().push(event);
        self
    }

    pub fn failing_on(mut self, day: u32) -> Self {
        self.failing_days.insert(day);
        self
    }
}

impl EventGenerator for ScriptedEventGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate(&mut self, _state: &WorldState, day: u32) -> Result<Vec<Event>, GeneratorError> {
        if self.failing_days.contains(&day) {
            return Err(GeneratorError::Unavailable(format!(
                "scripted outage on day {day}"
            )));
        }
        Ok(self.by_day.get(&day).cloned().unwrap_or_default())
    }
}

/// The default strategy: a seeded draw of 0..=`max_events` events with
/// weighted kinds, uniformly chosen targets and bounded symmetric deltas.
///
/// The same seed fed the same sequence of world snapshots yields the same events.
pub struct RandomEventGenerator {
    config: GeneratorConfig,
    rng: SmallRng,
}

impl RandomEventGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, SimError> {
        config.validate()?;
        let rng = SmallRng::seed_from_u64(config.seed);
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn pick_kind(&mut self) -> Option<EventKind> {
        let w = &self.config.kind_weights;
        let weighted = [
            (EventKind::CompanyImpact, w.company_impact),
            (EventKind::SectorImpact, w.sector_impact),
            (EventKind::PartyScandal, w.party_scandal),
            (EventKind::PolicyProposal, w.policy_proposal),
            (EventKind::PolicyRevocation, w.policy_revocation),
        ];
        let total: f64 = weighted.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return None;
        }
        let roll = self.rng.random_range(0.0..total);
        let mut cumulative = 0.0;
        for (kind, weight) in weighted {
            cumulative += weight;
            if weight > 0.0 && roll < cumulative {
                return Some(kind);
            }
        }
        // Float rounding can leave the roll just past the last bucket.
        weighted
            .iter()
            .rev()
            .find(|(_, w)| *w > 0.0)
            .map(|(k, _)| *k)
    }

    fn delta(&mut self) -> f64 {
        let bound = self.config.effect_bound;
        self.rng.random_range(-bound..=bound)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rng.random_range(0..items.len())])
        }
    }

    fn draw(&mut self, state: &WorldState, day: u32, kind: EventKind) -> Option<Event> {
        match kind {
            EventKind::CompanyImpact => {
                let companies: Vec<_> = state.companies.values().collect();
                let company = *self.pick(&companies)?;
                let delta = self.delta();
                let narrative = if delta >= 0.0 {
                    format!("{} wins praise for a new product line", company.name)
                } else {
                    format!("{} is hit by a product recall", company.name)
                };
                Some(
                    Event::new(day, kind, narrative)
                        .with_effect(EventTarget::Company(company.id), delta),
                )
            }
            EventKind::SectorImpact => {
                let sectors: Vec<_> = state.sectors().into_iter().collect();
                let sector = self.pick(&sectors)?.clone();
                let delta = self.delta();
                let narrative = if delta >= 0.0 {
                    format!("Confidence booms across the {sector} sector")
                } else {
                    format!("A crisis shakes the {sector} sector")
                };
                Some(Event::new(day, kind, narrative).with_effect(EventTarget::Sector(sector), delta))
            }
            EventKind::PartyScandal => {
                let parties: Vec<_> = state.parties.values().collect();
                let party = *self.pick(&parties)?;
                let delta = self.delta();
                let narrative = if delta >= 0.0 {
                    format!("{} is engulfed in a corruption scandal", party.name)
                } else {
                    format!("{} is cleared of wrongdoing and gains sympathy", party.name)
                };
                Some(Event::new(day, kind, narrative).with_effect(EventTarget::Party(party.id), delta))
            }
            EventKind::PolicyProposal => self.draw_proposal(state, day),
            EventKind::PolicyRevocation => {
                let policy = self.pick(&state.active_policies)?;
                Some(
                    Event::new(day, kind, format!("{} is repealed", policy.name))
                        .with_target(EventTarget::Policy(policy.id)),
                )
            }
        }
    }

    fn draw_proposal(&mut self, state: &WorldState, day: u32) -> Option<Event> {
        let parties: Vec<_> = state.parties.values().collect();
        let sponsor = *self.pick(&parties)?;

        let target = if self.rng.random_bool(0.5) {
            let sectors: Vec<_> = state.sectors().into_iter().collect();
            PolicyTarget::Sector(self.pick(&sectors)?.clone())
        } else {
            let companies: Vec<_> = state.companies.keys().copied().collect();
            PolicyTarget::Company(*self.pick(&companies)?)
        };
        let kind = *self.pick(PolicyKind::ALL)?;
        let u: f64 = self.rng.random_range(0.0..1.0);
        let magnitude = (self.config.effect_bound * (1.0 - u)).min(MAX_POLICY_MAGNITUDE);
        let duration = self
            .rng
            .random_range(self.config.policy_duration_days.clone());

        let target_label = match &target {
            PolicyTarget::Sector(s) => format!("the {s} sector"),
            PolicyTarget::Company(id) => state
                .company(*id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("company {id}")),
        };
        let name = format!("{} on {target_label}", kind.as_str().replace('_', " "));
        let narrative = format!("{} proposes a {name}", sponsor.name);
        Some(Event::new(day, EventKind::PolicyProposal, narrative).with_proposal(
            PolicyProposal {
                name,
                sponsor: sponsor.id,
                target,
                kind,
                magnitude,
                duration_days: Some(duration),
            },
        ))
    }
}

impl EventGenerator for RandomEventGenerator {
    fn name(&self) -> &str {
        "random"
    }

    fn generate(&mut self, state: &WorldState, day: u32) -> Result<Vec<Event>, GeneratorError> {
        let count = self.rng.random_range(0..=self.config.max_events);
        let mut events = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(kind) = self.pick_kind() else {
                break;
            };
            if let Some(event) = self.draw(state, day, kind) {
                events.push(event);
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KindWeights, MAX_EVENTS_PER_DAY};
    use crate::testutil::small_world;

    fn only(kind: EventKind) -> KindWeights {
        KindWeights {
            company_impact: 0.0,
            sector_impact: 0.0,
            party_scandal: 0.0,
            policy_proposal: 0.0,
            policy_revocation: 0.0,
        }
        .with(kind, 1.0)
    }

    impl KindWeights {
        fn with(mut self, kind: EventKind, w: f64) -> Self {
            match kind {
                EventKind::CompanyImpact => self.company_impact = w,
                EventKind::SectorImpact => self.sector_impact = w,
                EventKind::PartyScandal => self.party_scandal = w,
                EventKind::PolicyProposal => self.policy_proposal = w,
                EventKind::PolicyRevocation => self.policy_revocation = w,
            }
            self
        }
    }

    #[test]
    fn null_generator_is_empty() {
        let world = small_world();
        assert!(NullEventGenerator.generate(&world, 1).unwrap().is_empty());
    }

    #[test]
    fn scripted_generator_replays_by_day() {
        let world = small_world();
        let mut generator = ScriptedEventGenerator::new()
            .with_event(Event::new(2, EventKind::SectorImpact, "two"))
            .failing_on(3);
        assert!(generator.generate(&world, 1).unwrap().is_empty());
        assert_eq!(generator.generate(&world, 2).unwrap().len(), 1);
        assert!(generator.generate(&world, 3).is_err());
    }

    #[test]
    fn random_events_respect_contract() {
        let world = small_world();
        let mut generator = RandomEventGenerator::new(GeneratorConfig::with_seed(7)).unwrap();
        for day in 1..=200 {
            let events = generator.generate(&world, day).unwrap();
            assert!(events.len() <= MAX_EVENTS_PER_DAY);
            for event in &events {
                assert_eq!(event.day, day);
                for effect in &event.effects {
                    assert!(effect.delta.abs() <= 0.1);
                }
            }
        }
    }

    #[test]
    fn same_seed_same_events() {
        let world = small_world();
        let mut a = RandomEventGenerator::new(GeneratorConfig::with_seed(99)).unwrap();
        let mut b = RandomEventGenerator::new(GeneratorConfig::with_seed(99)).unwrap();
        for day in 1..=50 {
            assert_eq!(
                a.generate(&world, day).unwrap(),
                b.generate(&world, day).unwrap()
            );
        }
    }

    #[test]
    fn all_zero_weights_produce_nothing() {
        let world = small_world();
        let config = GeneratorConfig {
            kind_weights: KindWeights {
                company_impact: 0.0,
                sector_impact: 0.0,
                party_scandal: 0.0,
                policy_proposal: 0.0,
                policy_revocation: 0.0,
            },
            ..GeneratorConfig::default()
        };
        let mut generator = RandomEventGenerator::new(config).unwrap();
        for day in 1..=20 {
            assert!(generator.generate(&world, day).unwrap().is_empty());
        }
    }

    #[test]
    fn proposals_carry_valid_policy_details() {
        let world = small_world();
        let config = GeneratorConfig {
            kind_weights: only(EventKind::PolicyProposal),
            ..GeneratorConfig::with_seed(3)
        };
        let mut generator = RandomEventGenerator::new(config).unwrap();
        let mut seen = 0;
        for day in 1..=30 {
            for event in generator.generate(&world, day).unwrap() {
                let proposal = event.proposal.expect("proposal events carry details");
                assert!(proposal.magnitude > 0.0 && proposal.magnitude < 1.0);
                assert!(world.party(proposal.sponsor).is_some());
                let duration = proposal.duration_days.unwrap();
                assert!((5..=30).contains(&duration));
                seen += 1;
            }
        }
        assert!(seen > 0);
    }

    #[test]
    fn revocations_need_active_policies() {
        let world = small_world();
        let config = GeneratorConfig {
            kind_weights: only(EventKind::PolicyRevocation),
            ..GeneratorConfig::default()
        };
        let mut generator = RandomEventGenerator::new(config).unwrap();
        for day in 1..=20 {
            assert!(generator.generate(&world, day).unwrap().is_empty());
        }
    }

    #[test]
    fn generation_does_not_touch_the_world() {
        let world = small_world();
        let before = serde_json::to_string(&world).unwrap();
        let mut generator = RandomEventGenerator::new(GeneratorConfig::default()).unwrap();
        for day in 1..=10 {
            generator.generate(&world, day).unwrap();
        }
        assert_eq!(serde_json::to_string(&world).unwrap(), before);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = GeneratorConfig {
            effect_bound: 0.0,
            ..GeneratorConfig::default()
        };
        assert!(RandomEventGenerator::new(config).is_err());
    }
}
