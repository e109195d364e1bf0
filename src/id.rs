use serde::{Deserialize, Serialize};

/// Hands out world-unique ids: companies, parties, segments, policies and
/// events all draw from the same counter, starting at 1 (0 means "unassigned").
///
/// Serializes as the bare next id so a world snapshot resumes numbering exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdGenerator(u64);

impl IdGenerator {
    pub fn new() -> Self {
        Self(1)
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
