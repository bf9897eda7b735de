use super::super::profile::FinancialProfile;
use super::config::RuleConfig;
use super::{RuleFinding, RuleId, RuleStatus, Severity};

const FOIR_FAIL_SCORE: u32 = 40;
const FOIR_ELEVATED_SCORE: u32 = 20;
const FOIR_PASS_SCORE: u32 = 5;
const FOIR_UNAVAILABLE_SCORE: u32 = 25;
const MIN_SALARY_FAIL_SCORE: u32 = 35;
const BOUNCE_FAIL_SCORE: u32 = 30;
const STABILITY_WARNING_SCORE: u32 = 15;
const VARIANCE_WARNING_SCORE: u32 = 10;
const COMPLETENESS_WARNING_SCORE: u32 = 10;

/// Run the battery in its fixed order. Rules only read the profile, never each other.
pub(crate) fn run_rules(profile: &FinancialProfile, config: &RuleConfig) -> Vec<RuleFinding> {
    let mut findings = vec![
        foir_check(profile, config),
        min_salary_check(profile, config),
        bounce_check(profile, config),
    ];

    let stability = salary_stability(profile, config);
    let stable = stability.status == RuleStatus::Pass;
    findings.push(stability);

    if stable {
        if let Some(variance) = salary_variance(profile, config) {
            findings.push(variance);
        }
    }

    findings.push(document_completeness(profile));
    findings
}

fn foir_check(profile: &FinancialProfile, config: &RuleConfig) -> RuleFinding {
    let income = profile.average_net_income();
    if income <= 0.0 {
        return RuleFinding {
            rule: RuleId::FoirCheck,
            status: RuleStatus::Warning,
            severity: Severity::High,
            message: "Unable to calculate FOIR - bank statement data missing".to_string(),
            value: None,
            score: FOIR_UNAVAILABLE_SCORE,
        };
    }

    let foir = profile.average_emi() / income;
    let (status, score, verdict) = if foir > config.max_foir {
        (RuleStatus::Fail, FOIR_FAIL_SCORE, "EMI burden too high!")
    } else if foir > config.elevated_foir {
        (
            RuleStatus::Pass,
            FOIR_ELEVATED_SCORE,
            "Within acceptable limits.",
        )
    } else {
        (RuleStatus::Pass, FOIR_PASS_SCORE, "Within acceptable limits.")
    };

    RuleFinding {
        rule: RuleId::FoirCheck,
        status,
        severity: Severity::Critical,
        message: format!(
            "FOIR is {:.1}% (Max allowed: {}%). {}",
            foir * 100.0,
            config.max_foir * 100.0,
            verdict
        ),
        value: Some(foir),
        score,
    }
}

fn min_salary_check(profile: &FinancialProfile, config: &RuleConfig) -> RuleFinding {
    let latest = profile.latest_net_salary();
    let passed = latest >= config.min_net_salary;

    RuleFinding {
        rule: RuleId::MinSalaryCheck,
        status: if passed {
            RuleStatus::Pass
        } else {
            RuleStatus::Fail
        },
        severity: Severity::Critical,
        message: format!(
            "Net salary is {} (Min required: {})",
            format_rupees(latest),
            format_rupees(config.min_net_salary)
        ),
        value: Some(latest),
        score: if passed { 0 } else { MIN_SALARY_FAIL_SCORE },
    }
}

fn bounce_check(profile: &FinancialProfile, config: &RuleConfig) -> RuleFinding {
    let bounces = profile.bounce_count();
    let passed = bounces <= config.max_bounces_allowed;

    RuleFinding {
        rule: RuleId::BounceCheck,
        status: if passed {
            RuleStatus::Pass
        } else {
            RuleStatus::Fail
        },
        severity: Severity::Critical,
        message: format!(
            "{bounces} cheque bounce(s) detected in statement period (Max allowed: {})",
            config.max_bounces_allowed
        ),
        value: Some(bounces as f64),
        score: if passed { 0 } else { BOUNCE_FAIL_SCORE },
    }
}

fn salary_stability(profile: &FinancialProfile, config: &RuleConfig) -> RuleFinding {
    let count = profile.salary_slips.len();
    let passed = count >= config.min_salary_months;

    RuleFinding {
        rule: RuleId::SalaryStability,
        status: if passed {
            RuleStatus::Pass
        } else {
            RuleStatus::Warning
        },
        severity: Severity::High,
        message: format!(
            "{count} salary slip(s) provided (Recommended: {})",
            config.min_salary_months
        ),
        value: Some(count as f64),
        score: if passed { 0 } else { STABILITY_WARNING_SCORE },
    }
}

/// Only emitted when some slip deviates from the mean by more than the tolerance.
fn salary_variance(profile: &FinancialProfile, config: &RuleConfig) -> Option<RuleFinding> {
    let count = profile.salary_slips.len();
    if count < config.variance_min_slips || count == 0 {
        return None;
    }

    let average = profile
        .salary_slips
        .iter()
        .map(|slip| slip.net_salary)
        .sum::<f64>()
        / count as f64;
    // A zero mean has no meaningful relative deviation.
    if average <= 0.0 {
        return None;
    }

    let flagged = profile
        .salary_slips
        .iter()
        .any(|slip| (slip.net_salary - average).abs() / average > config.variance_tolerance);
    if !flagged {
        return None;
    }

    Some(RuleFinding {
        rule: RuleId::SalaryVariance,
        status: RuleStatus::Warning,
        severity: Severity::Medium,
        message: format!(
            "Significant salary variation detected (>{:.0}%)",
            config.variance_tolerance * 100.0
        ),
        value: Some(average),
        score: VARIANCE_WARNING_SCORE,
    })
}

fn document_completeness(profile: &FinancialProfile) -> RuleFinding {
    let complete = profile.pan.is_some()
        && profile.aadhaar.is_some()
        && profile.bank_statement.is_some()
        && !profile.salary_slips.is_empty();

    if complete {
        RuleFinding {
            rule: RuleId::DocumentCompleteness,
            status: RuleStatus::Pass,
            severity: Severity::Medium,
            message: "All essential documents provided".to_string(),
            value: None,
            score: 0,
        }
    } else {
        let mut missing = Vec::new();
        if profile.pan.is_none() {
            missing.push("PAN");
        }
        if profile.aadhaar.is_none() {
            missing.push("Aadhaar");
        }
        if profile.bank_statement.is_none() {
            missing.push("Bank Statement");
        }
        if profile.salary_slips.is_empty() {
            missing.push("Salary Slips");
        }

        RuleFinding {
            rule: RuleId::DocumentCompleteness,
            status: RuleStatus::Warning,
            severity: Severity::Medium,
            message: format!("Some documents missing: {}", missing.join(", ")),
            value: None,
            score: COMPLETENESS_WARNING_SCORE,
        }
    }
}

/// Render a rupee amount with Indian digit grouping, e.g. `₹1,25,000`.
pub(crate) fn format_rupees(amount: f64) -> String {
    let rounded = amount.round().max(0.0) as u64;
    let digits = rounded.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();

    format!("₹{},{}", groups.join(","), tail)
}
