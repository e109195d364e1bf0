use serde::{Deserialize, Serialize};

use super::policy::{PolicyKind, PolicyTarget};
use super::sector::Sector;

string_enum! {
    pub enum EventKind {
        CompanyImpact => "company_impact",
        SectorImpact => "sector_impact",
        PartyScandal => "party_scandal",
        /// Creates a policy from the attached proposal.
        PolicyProposal => "policy_proposal",
        /// Retires the targeted policy early.
        PolicyRevocation => "policy_revocation",
    }
}

/// Identity reference to something an event touches. Never ownership.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTarget {
    Company(u64),
    Party(u64),
    Sector(Sector),
    Policy(u64),
}

/// A delta on the [0, 1]-scaled attribute of one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEffect {
    pub target: EventTarget,
    pub delta: f64,
}

/// Details of a policy carried by a `PolicyProposal` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyProposal {
    pub name: String,
    pub sponsor: u64,
    pub target: PolicyTarget,
    pub kind: PolicyKind,
    pub magnitude: f64,
    /// Days in force counting the activation day. `None` = open-ended.
    pub duration_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Assigned by the world when the event is accepted for a day; 0 before that.
    pub id: u64,
    pub day: u32,
    pub kind: EventKind,
    /// Opaque narrative text; never interpreted by the engine.
    pub narrative: String,
    pub targets: Vec<EventTarget>,
    pub effects: Vec<EventEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal: Option<PolicyProposal>,
}

impl Event {
    pub fn new(day: u32, kind: EventKind, narrative: impl Into<String>) -> Self {
        Self {
            id: 0,
            day,
            kind,
            narrative: narrative.into(),
            targets: Vec::new(),
            effects: Vec::new(),
            proposal: None,
        }
    }

    /// Add a target that carries a numeric delta.
    pub fn with_effect(mut self, target: EventTarget, delta: f64) -> Self {
        if !self.targets.contains(&target) {
            self.targets.push(target.clone());
        }
        self.effects.push(EventEffect { target, delta });
        self
    }

    /// Add a target with no numeric effect (e.g. a policy sponsor).
    pub fn with_target(mut self, target: EventTarget) -> Self {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
        self
    }

    pub fn with_proposal(mut self, proposal: PolicyProposal) -> Self {
        self = self.with_target(EventTarget::Party(proposal.sponsor));
        self = match &proposal.target {
            PolicyTarget::Sector(s) => self.with_target(EventTarget::Sector(s.clone())),
            PolicyTarget::Company(id) => self.with_target(EventTarget::Company(*id)),
        };
        self.proposal = Some(proposal);
        self
    }

}
