pub mod config;
pub mod error;
pub mod flush;
pub mod id;
pub mod model;
pub mod scenario;
pub mod sim;
pub mod worldgen;

#[cfg(test)]
mod testutil;

pub use config::{EngineConfig, GeneratorConfig};
pub use error::{GeneratorError, SimError};
pub use id::IdGenerator;
pub use model::{
    CitizenSegment, Company, DaySummary, Event, EventKind, EventTarget, Party, Policy, PolicyKind,
    PolicyTarget, Sector, WorldState,
};
pub use sim::{Engine, EventGenerator, RandomEventGenerator, run, simulate_day};
