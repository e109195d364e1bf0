use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartySnapshot {
    pub party_id: u64,
    pub name: String,
    pub popularity: f64,
    pub reputation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub company_id: u64,
    pub name: String,
    pub reputation: f64,
    pub share_price: f64,
    pub revenue: f64,
}

/// Immutable per-day audit record. Appended to the world history, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: u32,
    pub total_revenue: f64,
    pub mean_share_price: f64,
    /// Size-weighted mean segment satisfaction.
    pub mean_satisfaction: f64,
    pub parties: Vec<PartySnapshot>,
    /// Highest daily revenue first; ties broken by id.
    pub top_companies: Vec<CompanySnapshot>,
    pub events_count: usize,
    pub active_policies_count: usize,
}
