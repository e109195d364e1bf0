use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::company::Company;
use super::event::Event;
use super::party::Party;
use super::policy::{Policy, PolicyTarget};
use super::sector::Sector;
use super::segment::CitizenSegment;
use super::summary::DaySummary;
use crate::error::SimError;
use crate::id::IdGenerator;
use crate::sim::Phase;

/// The single mutable aggregate of a simulation.
///
/// Every pipeline stage receives it by reference; nothing is process-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    /// Last simulated day. 0 before the first day has run.
    pub day: u32,
    pub companies: BTreeMap<u64, Company>,
    pub parties: BTreeMap<u64, Party>,
    pub segments: BTreeMap<u64, CitizenSegment>,
    /// Policies in force, in creation order.
    pub active_policies: Vec<Policy>,
    /// Expired or revoked policies, kept for audit.
    pub retired_policies: Vec<Policy>,
    pub events_today: Vec<Event>,
    pub history: Vec<DaySummary>,
    pub id_gen: IdGenerator,
}

impl WorldState {
    pub fn new() -> Self {
        Self {
            day: 0,
            companies: BTreeMap::new(),
            parties: BTreeMap::new(),
            segments: BTreeMap::new(),
            active_policies: Vec::new(),
            retired_policies: Vec::new(),
            events_today: Vec::new(),
            history: Vec::new(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a company, assigning it a unique ID. Returns the assigned ID.
    pub fn add_company(&mut self, mut company: Company) -> u64 {
        let id = self.id_gen.next_id();
        company.id = id;
        self.companies.insert(id, company);
        id
    }

    pub fn add_party(&mut self, mut party: Party) -> u64 {
        let id = self.id_gen.next_id();
        party.id = id;
        self.parties.insert(id, party);
        id
    }

    pub fn add_segment(&mut self, mut segment: CitizenSegment) -> u64 {
        let id = self.id_gen.next_id();
        segment.id = id;
        self.segments.insert(id, segment);
        id
    }

    /// Put a policy in force: assigns its ID, registers it with its sponsor and
    /// appends it to the active set. Returns the assigned ID.
    pub fn add_policy(&mut self, mut policy: Policy) -> u64 {
        let id = self.id_gen.next_id();
        policy.id = id;
        if let Some(party) = self.parties.get_mut(&policy.sponsor) {
            party.policies.insert(id);
        }
        self.active_policies.push(policy);
        id
    }

    /// Move an active policy to the retired set. Returns false if it was not active.
    pub fn retire_policy(&mut self, policy_id: u64) -> bool {
        let Some(pos) = self.active_policies.iter().position(|p| p.id == policy_id) else {
            return false;
        };
        let policy = self.active_policies.remove(pos);
        if let Some(party) = self.parties.get_mut(&policy.sponsor) {
            party.policies.remove(&policy_id);
        }
        self.retired_policies.push(policy);
        true
    }

    /// Assign an ID to a generated event and record it for today.
    pub fn accept_event(&mut self, mut event: Event) -> Event {
        event.id = self.id_gen.next_id();
        self.events_today.push(event.clone());
        event
    }

    pub fn company(&self, id: u64) -> Option<&Company> {
        self.companies.get(&id)
    }

    pub fn party(&self, id: u64) -> Option<&Party> {
        self.parties.get(&id)
    }

    pub fn segment(&self, id: u64) -> Option<&CitizenSegment> {
        self.segments.get(&id)
    }

    pub fn policy(&self, id: u64) -> Option<&Policy> {
        self.active_policies.iter().find(|p| p.id == id)
    }

    /// Every policy ever created: active first, then retired.
    pub fn policy_history(&self) -> impl Iterator<Item = &Policy> {
        self.active_policies.iter().chain(self.retired_policies.iter())
    }

    pub fn companies_in_sector<'a>(
        &'a self,
        sector: &'a Sector,
    ) -> impl Iterator<Item = &'a Company> + 'a {
        self.companies.values().filter(move |c| &c.sector == sector)
    }

    /// Distinct sectors with at least one company.
    pub fn sectors(&self) -> BTreeSet<Sector> {
        self.companies.values().map(|c| c.sector.clone()).collect()
    }

    /// Sector a policy ultimately regulates, if its target still resolves.
    pub fn policy_sector(&self, target: &PolicyTarget) -> Option<Sector> {
        match target {
            PolicyTarget::Sector(s) => Some(s.clone()),
            PolicyTarget::Company(id) => self.companies.get(id).map(|c| c.sector.clone()),
        }
    }

    /// Size-weighted mean satisfaction (0 for a world without citizens).
    pub fn mean_satisfaction(&self) -> f64 {
        let total: f64 = self.segments.values().map(|s| s.size as f64).sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.segments
            .values()
            .map(|s| s.size as f64 * s.satisfaction)
            .sum::<f64>()
            / total
    }

    /// Check a freshly built world before any day runs.
    pub fn validate(&self) -> Result<(), SimError> {
        match self.first_out_of_range() {
            Some(bad) => Err(SimError::invalid(
                format!("{}.{}", bad.entity, bad.attribute),
                format!("value {} is out of range", bad.value),
            )),
            None => Ok(()),
        }
    }

    /// Check every attribute after a pipeline phase.
    pub fn check_invariants(&self, phase: Phase) -> Result<(), SimError> {
        match self.first_out_of_range() {
            Some(bad) => Err(SimError::InvariantViolation {
                phase,
                entity: bad.entity,
                attribute: bad.attribute,
                value: bad.value,
            }),
            None => Ok(()),
        }
    }

    fn first_out_of_range(&self) -> Option<OutOfRange> {
        for c in self.companies.values() {
            let checks = [
                ("base_quality", c.base_quality, unit(c.base_quality)),
                ("base_price", c.base_price, positive(c.base_price)),
                ("reputation", c.reputation, unit(c.reputation)),
                ("share_price", c.share_price, positive(c.share_price)),
                ("cash", c.cash, non_negative(c.cash)),
                ("last_day_revenue", c.last_day_revenue, non_negative(c.last_day_revenue)),
                (
                    "last_day_units_sold",
                    c.last_day_units_sold,
                    non_negative(c.last_day_units_sold),
                ),
            ];
            if let Some(bad) = first_failure(&checks, || format!("company {} ({})", c.id, c.name)) {
                return Some(bad);
            }
        }
        for p in self.parties.values() {
            let checks = [
                ("popularity", p.popularity, unit(p.popularity)),
                ("reputation", p.reputation, unit(p.reputation)),
            ];
            if let Some(bad) = first_failure(&checks, || format!("party {} ({})", p.id, p.name)) {
                return Some(bad);
            }
        }
        for s in self.segments.values() {
            let checks = [
                ("size", s.size as f64, s.size > 0),
                ("average_wealth", s.average_wealth, positive(s.average_wealth)),
                ("satisfaction", s.satisfaction, unit(s.satisfaction)),
            ];
            let label = || format!("segment {} ({})", s.id, s.name);
            if let Some(bad) = first_failure(&checks, label) {
                return Some(bad);
            }
            if let Some(bad) = s.propensities.values().find(|v| !non_negative(**v)) {
                return Some(OutOfRange {
                    entity: label(),
                    attribute: "propensity",
                    value: *bad,
                });
            }
        }
        for p in &self.active_policies {
            if !(p.magnitude.is_finite() && p.magnitude > 0.0 && p.magnitude < 1.0) {
                return Some(OutOfRange {
                    entity: format!("policy {} ({})", p.id, p.name),
                    attribute: "magnitude",
                    value: p.magnitude,
                });
            }
        }
        None
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

struct OutOfRange {
    entity: String,
    attribute: &'static str,
    value: f64,
}

fn first_failure(
    checks: &[(&'static str, f64, bool)],
    label: impl FnOnce() -> String,
) -> Option<OutOfRange> {
    checks
        .iter()
        .find(|(_, _, ok)| !ok)
        .map(|(attribute, value, _)| OutOfRange {
            entity: label(),
            attribute: *attribute,
            value: *value,
        })
}

fn unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventKind, IdeologicalBias, PolicyKind};

    fn world_with_policy() -> (WorldState, u64, u64) {
        let mut world = WorldState::new();
        let party = world.add_party(Party::new("Greens", IdeologicalBias::CenterLeft));
        let policy = world.add_policy(Policy {
            id: 0,
            name: "Rent cap".to_string(),
            sponsor: party,
            target: PolicyTarget::Sector(Sector::Housing),
            kind: PolicyKind::PriceCap,
            magnitude: 0.1,
            activation_day: 1,
            expiry_day: Some(5),
            revoked_day: None,
            proposed_by_event: 0,
        });
        (world, party, policy)
    }

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut world = WorldState::new();
        let c = world.add_company(Company::new("Acme", Sector::Food, 0.5, 10.0));
        let p = world.add_party(Party::new("Reds", IdeologicalBias::Left));
        let s = world.add_segment(CitizenSegment::new("Workers", 10, 1.0));
        assert_eq!(world.company(c).unwrap().id, c);
        assert_eq!(world.party(p).unwrap().id, p);
        assert_eq!(world.segment(s).unwrap().id, s);
        assert!(c != p && p != s && c != s);
    }

    #[test]
    fn add_policy_registers_with_sponsor() {
        let (world, party, policy) = world_with_policy();
        assert!(world.party(party).unwrap().policies.contains(&policy));
        assert_eq!(world.active_policies.len(), 1);
    }

    #[test]
    fn retire_policy_keeps_audit_trail() {
        let (mut world, party, policy) = world_with_policy();
        assert!(world.retire_policy(policy));
        assert!(world.active_policies.is_empty());
        assert!(!world.party(party).unwrap().policies.contains(&policy));
        assert_eq!(world.policy_history().count(), 1);
        assert!(!world.retire_policy(policy));
    }

    #[test]
    fn accept_event_assigns_id() {
        let mut world = WorldState::new();
        let a = world.accept_event(Event::new(1, EventKind::CompanyImpact, "a"));
        let b = world.accept_event(Event::new(1, EventKind::SectorImpact, "b"));
        assert!(a.id > 0 && b.id > a.id);
        assert_eq!(world.events_today.len(), 2);
    }

    #[test]
    fn sectors_and_lookup() {
        let mut world = WorldState::new();
        world.add_company(Company::new("A", Sector::Food, 0.5, 1.0));
        world.add_company(Company::new("B", Sector::Food, 0.5, 1.0));
        world.add_company(Company::new("C", Sector::Finance, 0.5, 1.0));
        assert_eq!(world.sectors().len(), 2);
        assert_eq!(world.companies_in_sector(&Sector::Food).count(), 2);
        assert_eq!(world.companies_in_sector(&Sector::Housing).count(), 0);
    }

    #[test]
    fn mean_satisfaction_is_size_weighted() {
        let mut world = WorldState::new();
        world.add_segment(CitizenSegment::new("Big", 300, 1.0).with_satisfaction(0.6));
        world.add_segment(CitizenSegment::new("Small", 100, 1.0).with_satisfaction(0.2));
        assert!((world.mean_satisfaction() - 0.5).abs() < 1e-12);
        assert_eq!(WorldState::new().mean_satisfaction(), 0.0);
    }

    #[test]
    fn validate_rejects_out_of_range_reputation() {
        let mut world = WorldState::new();
        world.add_company(Company::new("Bad", Sector::Food, 0.5, 1.0).with_reputation(1.5));
        let err = world.validate().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("reputation"));
    }

    #[test]
    fn invariants_reject_zero_share_price() {
        let mut world = WorldState::new();
        world.add_company(Company::new("Flat", Sector::Food, 0.5, 1.0).with_share_price(0.0));
        match world.check_invariants(Phase::UpdateCompanies) {
            Err(SimError::InvariantViolation {
                phase, attribute, ..
            }) => {
                assert_eq!(phase, Phase::UpdateCompanies);
                assert_eq!(attribute, "share_price");
            }
            other => panic!("expected invariant violation, got {other:?}"),
        }
    }

    #[test]
    fn invariants_reject_nan() {
        let mut world = WorldState::new();
        world.add_segment(CitizenSegment::new("Lost", 10, 1.0).with_satisfaction(f64::NAN));
        assert!(world.check_invariants(Phase::UpdateSociety).is_err());
    }

    #[test]
    fn empty_world_is_valid() {
        assert!(WorldState::new().validate().is_ok());
    }

    #[test]
    fn custom_sector_tag_joins_the_named_sector() {
        let mut world = WorldState::new();
        let named = world.add_company(Company::new("Grocer", Sector::Food, 0.5, 2.0));
        let tagged = world.add_company(Company::new(
            "Baker",
            Sector::Custom("food".to_string()),
            0.5,
            3.0,
        ));
        let ids: Vec<u64> = world.companies_in_sector(&Sector::Food).map(|c| c.id).collect();
        assert_eq!(ids, vec![named, tagged]);
        assert_eq!(world.sectors().len(), 1);
    }
}
