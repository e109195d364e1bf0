use crate::error::SimError;
use crate::model::*;
use crate::sim::{EventGenerator, run};

// -- Builder-style ref types --

/// Typed reference to a company in a [`Scenario`], enabling chained field mutation.
///
/// Created by [`Scenario::company`] (creation) or [`Scenario::company_mut`] (mutation).
/// Call [`.id()`](CompanyRef::id) to terminate the chain and extract the company ID.
pub struct CompanyRef<'a> {
    scenario: &'a mut Scenario,
    id: u64,
}

impl<'a> CompanyRef<'a> {
    fn update(mut self, f: impl FnOnce(&mut Company)) -> Self {
        if let Some(company) = self.scenario.world.companies.get_mut(&self.id) {
            f(company);
        }
        self
    }

    pub fn quality(self, v: f64) -> Self { self.update(|c| c.base_quality = v) }
    pub fn price(self, v: f64) -> Self { self.update(|c| c.base_price = v) }
    pub fn reputation(self, v: f64) -> Self { self.update(|c| c.reputation = v) }
    pub fn share_price(self, v: f64) -> Self { self.update(|c| c.share_price = v) }
    pub fn cash(self, v: f64) -> Self { self.update(|c| c.cash = v) }
    pub fn trailing_revenue(self, v: f64) -> Self { self.update(|c| c.trailing_revenue = Some(v)) }

    /// Escape hatch: apply an arbitrary closure to the company.
    pub fn with(self, f: impl FnOnce(&mut Company)) -> Self { self.update(f) }

    /// Terminate the chain and return the company ID.
    pub fn id(self) -> u64 { self.id }
}

/// Typed reference to a party in a [`Scenario`], enabling chained field mutation.
///
/// Created by [`Scenario::party`] (creation) or [`Scenario::party_mut`] (mutation).
pub struct PartyRef<'a> {
    scenario: &'a mut Scenario,
    id: u64,
}

impl<'a> PartyRef<'a> {
    fn update(mut self, f: impl FnOnce(&mut Party)) -> Self {
        if let Some(party) = self.scenario.world.parties.get_mut(&self.id) {
            f(party);
        }
        self
    }

    pub fn popularity(self, v: f64) -> Self { self.update(|p| p.popularity = v) }
    pub fn reputation(self, v: f64) -> Self { self.update(|p| p.reputation = v) }
    pub fn in_government(self, v: bool) -> Self { self.update(|p| p.in_government = v) }

    /// Escape hatch: apply an arbitrary closure to the party.
    pub fn with(self, f: impl FnOnce(&mut Party)) -> Self { self.update(f) }

    /// Terminate the chain and return the party ID.
    pub fn id(self) -> u64 { self.id }
}

/// Typed reference to a citizen segment in a [`Scenario`], enabling chained field mutation.
///
/// Created by [`Scenario::segment`] (creation) or [`Scenario::segment_mut`] (mutation).
pub struct SegmentRef<'a> {
    scenario: &'a mut Scenario,
    id: u64,
}

impl<'a> SegmentRef<'a> {
    fn update(mut self, f: impl FnOnce(&mut CitizenSegment)) -> Self {
        if let Some(segment) = self.scenario.world.segments.get_mut(&self.id) {
            f(segment);
        }
        self
    }

    pub fn satisfaction(self, v: f64) -> Self { self.update(|s| s.satisfaction = v) }
    pub fn propensity(self, sector: Sector, share: f64) -> Self {
        self.update(|s| {
            s.propensities.insert(sector, share);
        })
    }
    pub fn ideology(self, bias: IdeologicalBias, weight: f64) -> Self {
        self.update(|s| {
            s.ideology.insert(bias, weight);
        })
    }
    pub fn preferred_party(self, party: u64) -> Self { self.update(|s| s.preferred_party = Some(party)) }

    /// Escape hatch: apply an arbitrary closure to the segment.
    pub fn with(self, f: impl FnOnce(&mut CitizenSegment)) -> Self { self.update(f) }

    /// Terminate the chain and return the segment ID.
    pub fn id(self) -> u64 { self.id }
}

/// Fluent world builder for tests and demos.
///
/// Entities get neutral defaults (reputation 0.5, satisfaction 0.5, no
/// propensities); chain ref methods to override them.
pub struct Scenario {
    world: WorldState,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    /// Create an empty scenario at day 0.
    pub fn new() -> Self {
        Self {
            world: WorldState::new(),
        }
    }

    /// Start from an existing world, e.g. [`crate::worldgen::default_world`].
    pub fn from_world(world: WorldState) -> Self {
        Self { world }
    }

    // -- Entity creation --

    /// Add a company of average quality.
    pub fn company(&mut self, name: &str, sector: Sector, price: f64) -> CompanyRef<'_> {
        let id = self.world.add_company(Company::new(name, sector, 0.5, price));
        CompanyRef { scenario: self, id }
    }

    pub fn company_mut(&mut self, id: u64) -> CompanyRef<'_> {
        CompanyRef { scenario: self, id }
    }

    pub fn party(&mut self, name: &str, ideology: IdeologicalBias) -> PartyRef<'_> {
        let id = self.world.add_party(Party::new(name, ideology));
        PartyRef { scenario: self, id }
    }

    pub fn party_mut(&mut self, id: u64) -> PartyRef<'_> {
        PartyRef { scenario: self, id }
    }

    pub fn segment(&mut self, name: &str, size: u64, average_wealth: f64) -> SegmentRef<'_> {
        let id = self.world.add_segment(CitizenSegment::new(name, size, average_wealth));
        SegmentRef { scenario: self, id }
    }

    pub fn segment_mut(&mut self, id: u64) -> SegmentRef<'_> {
        SegmentRef { scenario: self, id }
    }

    /// Put a policy in force directly, bypassing the proposal event.
    /// `duration_days` of `None`, or one reaching past the last representable
    /// day, leaves it open-ended.
    pub fn policy(
        &mut self,
        sponsor: u64,
        target: PolicyTarget,
        kind: PolicyKind,
        magnitude: f64,
        activation_day: u32,
        duration_days: Option<u32>,
    ) -> u64 {
        self.world.add_policy(Policy {
            id: 0,
            name: format!("{kind} on {target:?}"),
            sponsor,
            target,
            kind,
            magnitude,
            activation_day,
            expiry_day: duration_days.and_then(|d| activation_day.checked_add(d.saturating_sub(1))),
            revoked_day: None,
            proposed_by_event: 0,
        })
    }

    // -- Finishing --

    pub fn build(self) -> WorldState {
        self.world
    }

    /// Build the world and simulate `num_days` days with the default engine.
    pub fn run(
        self,
        num_days: u32,
        generator: &mut dyn EventGenerator,
    ) -> Result<(WorldState, Vec<DaySummary>), SimError> {
        let mut world = self.build();
        let summaries = run(&mut world, num_days, generator)?;
        Ok((world, summaries))
    }

    /// Borrow the world for inspection.
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::NullEventGenerator;

    #[test]
    fn builds_linked_world() {
        let mut s = Scenario::new();
        let shop = s.company("Shop", Sector::Food, 4.0).reputation(0.7).cash(10.0).id();
        let party = s.party("Reds", IdeologicalBias::Left).popularity(0.4).in_government(true).id();
        let seg = s
            .segment("Workers", 100, 20.0)
            .propensity(Sector::Food, 0.5)
            .preferred_party(party)
            .id();
        let world = s.build();

        let company = world.company(shop).unwrap();
        assert_eq!(company.reputation, 0.7);
        assert_eq!(company.cash, 10.0);
        assert!(world.party(party).unwrap().in_government);
        assert_eq!(world.segment(seg).unwrap().preferred_party, Some(party));
    }

    #[test]
    fn policy_expiry_counts_activation_day() {
        let mut s = Scenario::new();
        let party = s.party("Blues", IdeologicalBias::Right).id();
        let id = s.policy(party, PolicyTarget::Sector(Sector::Food), PolicyKind::Tax, 0.1, 3, Some(4));
        let policy = s.world().policy(id).unwrap();
        assert_eq!(policy.expiry_day, Some(6));
        assert!(s.world().party(party).unwrap().policies.contains(&id));
    }

    #[test]
    fn overlong_policy_is_open_ended() {
        let mut s = Scenario::new();
        let party = s.party("Blues", IdeologicalBias::Right).id();
        let id = s.policy(party, PolicyTarget::Company(1), PolicyKind::Tax, 0.1, 10, Some(u32::MAX));
        assert_eq!(s.world().policy(id).unwrap().expiry_day, None);
    }

    #[test]
    fn mutating_unknown_id_is_harmless() {
        let mut s = Scenario::new();
        s.company_mut(99).reputation(0.1);
        assert!(s.world().companies.is_empty());
    }

    #[test]
    fn run_advances_days() {
        let mut s = Scenario::new();
        s.company("Shop", Sector::Food, 4.0);
        s.segment("Workers", 100, 20.0).propensity(Sector::Food, 0.5);
        let (world, summaries) = s.run(3, &mut NullEventGenerator).unwrap();
        assert_eq!(summaries.len(), 3);
        assert_eq!(world.day, 3);
    }
}
