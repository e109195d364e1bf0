use serde::{Deserialize, Serialize};

use super::sector::Sector;

string_enum! {
    pub enum PolicyKind {
        PriceCap => "price_cap",
        Tax => "tax",
        Subsidy => "subsidy",
    }
}

/// What a policy regulates. Resolved against the world at use time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyTarget {
    Sector(Sector),
    Company(u64),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Policy {
    pub id: u64,
    pub name: String,
    pub sponsor: u64,
    pub target: PolicyTarget,
    pub kind: PolicyKind,
    /// Fraction in (0, 1). See [`Policy::price_multiplier`] and friends.
    pub magnitude: f64,
    pub activation_day: u32,
    /// Last day (inclusive) the policy is in force. `None` = open-ended.
    pub expiry_day: Option<u32>,
    pub revoked_day: Option<u32>,
    /// Id of the event that proposed this policy.
    pub proposed_by_event: u64,
}

impl Policy {
    pub fn is_active_on(&self, day: u32) -> bool {
        self.revoked_day.is_none()
            && self.activation_day <= day
            && self.expiry_day.is_none_or(|expiry| day <= expiry)
    }

    pub fn is_expired_on(&self, day: u32) -> bool {
        self.expiry_day.is_some_and(|expiry| expiry < day)
    }

    /// Multiplier on the consumer-facing price of every targeted company.
    /// Price caps are not multiplicative and return 1.
    pub fn price_multiplier(&self) -> f64 {
        match self.kind {
            PolicyKind::PriceCap => 1.0,
            PolicyKind::Tax => 1.0 + self.magnitude,
            PolicyKind::Subsidy => 1.0 - self.magnitude,
        }
    }

    /// Multiplier on the revenue a targeted company retains after the market round.
    pub fn revenue_multiplier(&self) -> f64 {
        match self.kind {
            PolicyKind::PriceCap => 1.0,
            PolicyKind::Tax => 1.0 - self.magnitude,
            PolicyKind::Subsidy => 1.0 + self.magnitude,
        }
    }

    /// Signed direct effect on consumers of the targeted sector.
    pub fn consumer_effect(&self) -> f64 {
        match self.kind {
            PolicyKind::PriceCap | PolicyKind::Subsidy => self.magnitude,
            PolicyKind::Tax => -self.magnitude,
        }
    }
}
