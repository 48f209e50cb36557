//! Processing regimes.
//!
//! A regime is a fixed label chosen per query. It decides the sampling
//! temperature and the framing text. The leverage and amplification numbers
//! are reported to callers but have no effect on the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Support,
    Exploration,
    Balanced,
}

/// Constants attached to a regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeProfile {
    pub leverage: f64,
    pub amplification: f64,
    pub temperature: f32,
    pub focus: &'static str,
    pub optimal_for: [&'static str; 3],
}

const SUPPORT: RegimeProfile = RegimeProfile {
    leverage: 32.1,
    amplification: 1.321,
    temperature: 0.4,
    focus: "Efficiency, direct execution, task optimization",
    optimal_for: ["data migration", "report generation", "system integration"],
};

const EXPLORATION: RegimeProfile = RegimeProfile {
    leverage: 26.8,
    amplification: 1.268,
    temperature: 0.8,
    focus: "Pattern discovery, creative synthesis, innovation",
    optimal_for: ["market analysis", "customer insights", "strategy development"],
};

const BALANCED: RegimeProfile = RegimeProfile {
    leverage: 11.5,
    amplification: 1.115,
    temperature: 0.6,
    focus: "Strategic orchestration, multi-perspective integration",
    optimal_for: ["business planning", "decision making", "holistic analysis"],
};

impl Regime {
    pub const ALL: [Regime; 3] = [Regime::Support, Regime::Exploration, Regime::Balanced];

    pub fn profile(&self) -> &'static RegimeProfile {
        match self {
            Self::Support => &SUPPORT,
            Self::Exploration => &EXPLORATION,
            Self::Balanced => &BALANCED,
        }
    }

    pub fn temperature(&self) -> f32 {
        self.profile().temperature
    }

    pub fn amplification(&self) -> f64 {
        self.profile().amplification
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Exploration => "exploration",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Regime {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Regime::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::UnknownValue {
                field: "regime",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_table() {
        assert!((Regime::Support.temperature() - 0.4).abs() < f32::EPSILON);
        assert!((Regime::Exploration.temperature() - 0.8).abs() < f32::EPSILON);
        assert!((Regime::Balanced.temperature() - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn amplification_is_leverage_scaled() {
        for regime in Regime::ALL {
            let p = regime.profile();
            assert!((p.amplification - (1.0 + p.leverage / 100.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Regime::Exploration).unwrap(),
            "\"exploration\""
        );
        assert_eq!("Support".parse::<Regime>().unwrap(), Regime::Support);
    }
}
