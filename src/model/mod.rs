#[macro_use]
mod macros;

pub mod company;
pub mod event;
pub mod party;
pub mod policy;
pub mod sector;
pub mod segment;
pub mod summary;
pub mod world;

pub use company::Company;
pub use event::{Event, EventEffect, EventKind, EventTarget, PolicyProposal};
pub use party::Party;
pub use policy::{Policy, PolicyKind, PolicyTarget};
pub use sector::{IdeologicalBias, Sector};
pub use segment::CitizenSegment;
pub use summary::{CompanySnapshot, DaySummary, PartySnapshot};
pub use world::WorldState;
