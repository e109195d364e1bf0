use std::collections::BTreeMap;

use super::effects::PolicyPricing;
use super::market::MarketReport;
use crate::config::EngineConfig;
use crate::model::{Event, WorldState};

/// Everything one simulated day threads through its phases.
///
/// Later phases read what earlier phases left here (today's events, policy
/// pricing, market results) instead of stashing it on the world.
pub struct DayContext<'a> {
    pub world: &'a mut WorldState,
    pub config: &'a EngineConfig,
    pub day: u32,
    /// Company reputations before any of today's events were applied.
    pub opening_reputation: BTreeMap<u64, f64>,
    pub events: Vec<Event>,
    pub pricing: PolicyPricing,
    pub market: MarketReport,
}

impl<'a> DayContext<'a> {
    pub fn new(world: &'a mut WorldState, config: &'a EngineConfig, day: u32) -> Self {
        let opening_reputation = world
            .companies
            .values()
            .map(|c| (c.id, c.reputation))
            .collect();
        Self {
            world,
            config,
            day,
            opening_reputation,
            events: Vec::new(),
            pricing: PolicyPricing::default(),
            market: MarketReport::default(),
        }
    }
}
