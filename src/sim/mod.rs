mod context;
pub mod effects;
mod generator;
pub mod market;
mod runner;
pub mod social;
pub mod valuation;

pub use context::DayContext;
pub use effects::PolicyPricing;
pub use generator::{
    EventGenerator, NullEventGenerator, RandomEventGenerator, ScriptedEventGenerator,
};
pub use market::{MarketReport, Sale};
pub use runner::{Engine, PHASE_ORDER, Phase, run, simulate_day};
