use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Upper bound on events a generator may produce for one day.
pub const MAX_EVENTS_PER_DAY: usize = 5;

/// Constants of the daily update formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reputation exponent in the market score.
    pub alpha: f64,
    /// Inverse-price exponent in the market score.
    pub beta: f64,
    /// k_r: pull of revenue share deviation on company reputation.
    pub reputation_rate: f64,
    /// k_p: share price sensitivity to revenue vs. its trailing average.
    pub price_rate: f64,
    /// k_rep: share price sensitivity to the day's reputation change.
    pub price_reputation_rate: f64,
    /// EMA smoothing factor for trailing revenue.
    pub revenue_smoothing: f64,
    /// k_s: satisfaction smoothing toward market experience.
    pub satisfaction_rate: f64,
    /// k_pop: popularity response to the mean satisfaction change.
    pub popularity_rate: f64,
    /// Scale of active policies' direct effect on segment satisfaction.
    pub policy_satisfaction_rate: f64,
    /// Smallest allowed effective price and share price.
    pub price_floor: f64,
    /// Smallest market score, so zero-reputation companies can still sell.
    pub score_floor: f64,
    /// Cap on revenue / trailing revenue in the share price update.
    pub max_revenue_ratio: f64,
    /// Companies listed in each day summary.
    pub top_companies: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
            reputation_rate: 0.05,
            price_rate: 0.5,
            price_reputation_rate: 1.0,
            revenue_smoothing: 0.3,
            satisfaction_rate: 0.1,
            popularity_rate: 0.5,
            policy_satisfaction_rate: 0.05,
            price_floor: 1e-6,
            score_floor: 1e-6,
            max_revenue_ratio: 3.0,
            top_companies: 5,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document (missing fields take defaults) and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        non_negative_exponent("alpha", self.alpha)?;
        non_negative_exponent("beta", self.beta)?;
        rate("price_rate", self.price_rate)?;
        rate("price_reputation_rate", self.price_reputation_rate)?;
        rate("revenue_smoothing", self.revenue_smoothing)?;
        rate("satisfaction_rate", self.satisfaction_rate)?;
        rate("popularity_rate", self.popularity_rate)?;
        rate("policy_satisfaction_rate", self.policy_satisfaction_rate)?;
        // Larger k_r lets reputation overshoot fair share and oscillate.
        if !(self.reputation_rate > 0.0 && self.reputation_rate <= 0.2) {
            return Err(SimError::invalid(
                "reputation_rate",
                format!("{} is outside (0, 0.2]", self.reputation_rate),
            ));
        }
        positive("price_floor", self.price_floor)?;
        positive("score_floor", self.score_floor)?;
        if !(self.max_revenue_ratio.is_finite() && self.max_revenue_ratio >= 1.0) {
            return Err(SimError::invalid(
                "max_revenue_ratio",
                format!("{} must be finite and >= 1", self.max_revenue_ratio),
            ));
        }
        if self.top_companies == 0 {
            return Err(SimError::invalid("top_companies", "must be at least 1"));
        }
        Ok(())
    }
}

/// Relative weights of each event kind in the random generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindWeights {
    pub company_impact: f64,
    pub sector_impact: f64,
    pub party_scandal: f64,
    pub policy_proposal: f64,
    pub policy_revocation: f64,
}

impl Default for KindWeights {
    fn default() -> Self {
        Self {
            company_impact: 1.0,
            sector_impact: 1.0,
            party_scandal: 1.0,
            policy_proposal: 1.0,
            policy_revocation: 0.0,
        }
    }
}

/// Configuration for the seeded random event generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Events per day are drawn uniformly from `0..=max_events`.
    pub max_events: usize,
    /// Deltas are drawn from `[-effect_bound, effect_bound]`.
    pub effect_bound: f64,
    pub kind_weights: KindWeights,
    pub policy_duration_days: RangeInclusive<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_events: MAX_EVENTS_PER_DAY,
            effect_bound: 0.1,
            kind_weights: KindWeights::default(),
            policy_duration_days: 5..=30,
        }
    }
}

impl GeneratorConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.max_events > MAX_EVENTS_PER_DAY {
            return Err(SimError::invalid(
                "max_events",
                format!("{} exceeds {MAX_EVENTS_PER_DAY}", self.max_events),
            ));
        }
        if !(self.effect_bound.is_finite() && self.effect_bound > 0.0 && self.effect_bound <= 1.0)
        {
            return Err(SimError::invalid(
                "effect_bound",
                format!("{} is outside (0, 1]", self.effect_bound),
            ));
        }
        let w = &self.kind_weights;
        for (name, weight) in [
            ("kind_weights.company_impact", w.company_impact),
            ("kind_weights.sector_impact", w.sector_impact),
            ("kind_weights.party_scandal", w.party_scandal),
            ("kind_weights.policy_proposal", w.policy_proposal),
            ("kind_weights.policy_revocation", w.policy_revocation),
        ] {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(SimError::invalid(name, format!("{weight} must be >= 0")));
            }
        }
        let (min, max) = (
            *self.policy_duration_days.start(),
            *self.policy_duration_days.end(),
        );
        if min == 0 || min > max {
            return Err(SimError::invalid(
                "policy_duration_days",
                format!("{min}..={max} must be a non-empty range starting at 1 or later"),
            ));
        }
        Ok(())
    }
}

fn non_negative_exponent(field: &str, v: f64) -> Result<(), SimError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(field, format!("{v} must be finite and >= 0")))
    }
}

fn rate(field: &str, v: f64) -> Result<(), SimError> {
    if v > 0.0 && v <= 1.0 {
        Ok(())
    } else {
        Err(SimError::invalid(field, format!("{v} is outside (0, 1]")))
    }
}

fn positive(field: &str, v: f64) -> Result<(), SimError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(field, format!("{v} must be finite and > 0")))
    }
}
