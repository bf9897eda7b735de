mod config;
mod rules;
mod scoring;

pub use config::{RiskThresholds, RuleConfig};
pub use scoring::{risk_level, total_score, RiskLevel};

use super::profile::FinancialProfile;
use serde::{Deserialize, Serialize};

/// Stateless evaluator that applies the injected policy to a profile.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: RuleConfig,
}

impl RuleEngine {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn evaluate(&self, profile: &FinancialProfile) -> RiskVerdict {
        let findings = rules::run_rules(profile, &self.config);
        let risk_score = total_score(&findings);
        let risk_level = risk_level(risk_score, &self.config.thresholds);

        RiskVerdict {
            findings,
            risk_score,
            risk_level,
        }
    }
}

/// Score a profile against the reference lending policy.
pub fn evaluate(profile: &FinancialProfile) -> RiskVerdict {
    RuleEngine::default().evaluate(profile)
}

/// Identifiers for the rules in the battery, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleId {
    FoirCheck,
    MinSalaryCheck,
    BounceCheck,
    SalaryStability,
    SalaryVariance,
    DocumentCompleteness,
}

impl RuleId {
    pub const fn label(self) -> &'static str {
        match self {
            RuleId::FoirCheck => "FOIR_CHECK",
            RuleId::MinSalaryCheck => "MIN_SALARY_CHECK",
            RuleId::BounceCheck => "BOUNCE_CHECK",
            RuleId::SalaryStability => "SALARY_STABILITY",
            RuleId::SalaryVariance => "SALARY_VARIANCE",
            RuleId::DocumentCompleteness => "DOCUMENT_COMPLETENESS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    Pass,
    Fail,
    Warning,
}

impl RuleStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RuleStatus::Pass => "PASS",
            RuleStatus::Fail => "FAIL",
            RuleStatus::Warning => "WARNING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

/// One rule's outcome together with the points it added to the risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleFinding {
    pub rule: RuleId,
    pub status: RuleStatus,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub score: u32,
}

/// Findings in evaluation order, the summed score and the derived risk band.
///
/// `risk_score` is the raw sum and may exceed 100 when several rules fail together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub findings: Vec<RuleFinding>,
    pub risk_score: u32,
    pub risk_level: RiskLevel,
}

impl RiskVerdict {
    pub fn finding(&self, rule: RuleId) -> Option<&RuleFinding> {
        self.findings.iter().find(|finding| finding.rule == rule)
    }

    /// Score bounded to the nominal 0-100 scale, for display only.
    pub fn display_score(&self) -> u32 {
        self.risk_score.min(100)
    }

    /// Plain-text digest of the verdict, one line per finding.
    pub fn digest(&self) -> String {
        let mut lines = vec![
            format!("Risk Score: {}/100", self.display_score()),
            format!("Risk Level: {}", self.risk_level.label()),
            "Findings:".to_string(),
        ];
        for finding in &self.findings {
            lines.push(format!(
                "- {}: {} ({}) - {}",
                finding.rule.label(),
                finding.status.label(),
                finding.severity.label(),
                finding.message
            ));
        }
        lines.join("\n")
    }
}
