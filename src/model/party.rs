use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::sector::IdeologicalBias;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Party {
    pub id: u64,
    pub name: String,
    pub ideology: IdeologicalBias,
    /// Approval-style popularity in [0, 1]; independent of other parties.
    pub popularity: f64,
    /// Integrity reputation in [0, 1]. Moves only on discrete events.
    pub reputation: f64,
    pub in_government: bool,
    /// Ids of the active policies this party currently sponsors.
    pub policies: BTreeSet<u64>,
}

impl Party {
    pub fn new(name: impl Into<String>, ideology: IdeologicalBias) -> Self {
        Self {
            id: 0,
            name: name.into(),
            ideology,
            popularity: 0.2,
            reputation: 0.5,
            in_government: false,
            policies: BTreeSet::new(),
        }
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = popularity;
        self
    }

    pub fn with_reputation(mut self, reputation: f64) -> Self {
        self.reputation = reputation;
        self
    }

    pub fn in_government(mut self, in_government: bool) -> Self {
        self.in_government = in_government;
        self
    }
}
