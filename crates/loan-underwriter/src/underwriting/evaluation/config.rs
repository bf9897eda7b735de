use serde::{Deserialize, Serialize};

/// Lending policy thresholds consumed by the rule battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub max_foir: f64,
    /// FOIR above this (but within `max_foir`) still draws an elevated penalty.
    pub elevated_foir: f64,
    pub min_net_salary: f64,
    pub min_salary_months: usize,
    pub max_bounces_allowed: usize,
    pub variance_min_slips: usize,
    pub variance_tolerance: f64,
    pub thresholds: RiskThresholds,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_foir: 0.50,
            elevated_foir: 0.40,
            min_net_salary: 25_000.0,
            min_salary_months: 6,
            max_bounces_allowed: 0,
            variance_min_slips: 3,
            variance_tolerance: 0.20,
            thresholds: RiskThresholds::default(),
        }
    }
}

/// Inclusive upper bounds of the LOW and MEDIUM risk bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub low: u32,
    pub medium: u32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self { low: 30, medium: 60 }
    }
}
