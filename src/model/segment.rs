use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::sector::{IdeologicalBias, Sector};

/// An aggregate standing in for many citizens with shared wealth and preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitizenSegment {
    pub id: u64,
    pub name: String,
    /// Number of citizens represented (> 0).
    pub size: u64,
    /// Mean wealth per citizen (> 0).
    pub average_wealth: f64,
    /// Satisfaction in [0, 1].
    pub satisfaction: f64,
    pub ideology: BTreeMap<IdeologicalBias, f64>,
    /// Share of budget spent per sector. Non-negative; the remainder below 1 is saved.
    pub propensities: BTreeMap<Sector, f64>,
    pub preferred_party: Option<u64>,
}

impl CitizenSegment {
    pub fn new(name: impl Into<String>, size: u64, average_wealth: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            size,
            average_wealth,
            satisfaction: 0.5,
            ideology: BTreeMap::new(),
            propensities: BTreeMap::new(),
            preferred_party: None,
        }
    }

    pub fn with_satisfaction(mut self, satisfaction: f64) -> Self {
        self.satisfaction = satisfaction;
        self
    }

    pub fn with_propensity(mut self, sector: Sector, share: f64) -> Self {
        self.propensities.insert(sector, share);
        self
    }

    pub fn with_ideology(mut self, bias: IdeologicalBias, weight: f64) -> Self {
        self.ideology.insert(bias, weight);
        self
    }

    pub fn total_wealth(&self) -> f64 {
        self.size as f64 * self.average_wealth
    }

    /// Sum of sector propensities, capped at 1.
    pub fn spending_share(&self) -> f64 {
        self.propensities.values().sum::<f64>().min(1.0)
    }

    /// Daily spending budget: total wealth × capped propensity sum.
    pub fn budget(&self) -> f64 {
        self.total_wealth() * self.spending_share()
    }

    /// Budget earmarked for one sector. When raw propensities sum above 1 each
    /// sector is scaled down proportionally so the parts add up to [`budget`].
    ///
    /// [`budget`]: CitizenSegment::budget
    pub fn sector_budget(&self, sector: &Sector) -> f64 {
        let share = self.propensities.get(sector).copied().unwrap_or(0.0);
        let raw_total: f64 = self.propensities.values().sum();
        if share <= 0.0 || raw_total <= 0.0 {
            return 0.0;
        }
        self.total_wealth() * share * (raw_total.min(1.0) / raw_total)
    }

    pub fn spends_in(&self, sector: &Sector) -> bool {
        self.propensities.get(sector).is_some_and(|p| *p > 0.0)
    }
}
