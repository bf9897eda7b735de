use super::config::RiskThresholds;
use super::RuleFinding;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Sum of every emitted finding's contribution. No clamping is applied.
pub fn total_score(findings: &[RuleFinding]) -> u32 {
    findings.iter().map(|finding| finding.score).sum()
}

/// Map a raw score onto a risk band; bounds are inclusive.
pub fn risk_level(score: u32, thresholds: &RiskThresholds) -> RiskLevel {
    if score <= thresholds.low {
        RiskLevel::Low
    } else if score <= thresholds.medium {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}
