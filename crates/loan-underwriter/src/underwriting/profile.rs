//! Aggregation of per-document extraction results into one applicant profile.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{
    AadhaarData, AddressProofData, BankStatementData, DocumentType, ExtractionResult,
    IncomeCertificateData, OfficeIdData, PanData, SalarySlipData,
};

/// Canonical financial facts for one applicant at one point in time.
///
/// Salary slips are ordered most-recent-first. Every other document type holds at
/// most one result; when an applicant uploads several, the last one seen wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub salary_slips: Vec<SalarySlipData>,
    pub bank_statement: Option<BankStatementData>,
    pub pan: Option<PanData>,
    pub aadhaar: Option<AadhaarData>,
    pub income_certificate: Option<IncomeCertificateData>,
    pub address_proof: Option<AddressProofData>,
    pub office_id: Option<OfficeIdData>,
}

impl FinancialProfile {
    /// Build a profile from `(document type, result)` pairs in upload order.
    pub fn aggregate<I>(results: I) -> Self
    where
        I: IntoIterator<Item = (DocumentType, Option<ExtractionResult>)>,
    {
        let mut builder = ProfileBuilder::default();
        for (document_type, result) in results {
            builder.push(document_type, result);
        }
        builder.build()
    }

    /// Net salary of the most recent slip, or zero when no slip was extracted.
    pub fn latest_net_salary(&self) -> f64 {
        self.salary_slips
            .first()
            .map(|slip| slip.net_salary)
            .unwrap_or(0.0)
    }

    pub fn average_net_income(&self) -> f64 {
        self.bank_statement
            .as_ref()
            .map(|statement| statement.summary.avg_net_monthly_income)
            .unwrap_or(0.0)
    }

    pub fn average_emi(&self) -> f64 {
        self.bank_statement
            .as_ref()
            .map(|statement| statement.summary.avg_monthly_emi)
            .unwrap_or(0.0)
    }

    pub fn bounce_count(&self) -> usize {
        self.bank_statement
            .as_ref()
            .map(|statement| statement.bounces.len())
            .unwrap_or(0)
    }
}

/// Declared pay period of a salary slip, used only for ordering.
///
/// Unparseable periods keep their raw text and sort after every parsed period.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PayPeriod {
    Raw(String),
    Month(NaiveDate),
}

impl PayPeriod {
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();

        let full_dates = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];
        for format in full_dates {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return PayPeriod::Month(date);
            }
        }

        let month_only = [
            (format!("{value}-01"), "%Y-%m-%d"),
            (format!("{value}/01"), "%Y/%m/%d"),
            (format!("01/{value}"), "%d/%m/%Y"),
            (format!("01 {value}"), "%d %B %Y"),
            (format!("01-{value}"), "%d-%B-%Y"),
        ];
        for (candidate, format) in month_only {
            if let Ok(date) = NaiveDate::parse_from_str(&candidate, format) {
                return PayPeriod::Month(date);
            }
        }

        PayPeriod::Raw(value.to_string())
    }

    /// Descending recency comparison suitable for `sort_by`.
    fn most_recent_first(left: &Self, right: &Self) -> Ordering {
        right.cmp(left)
    }
}

#[derive(Debug, Default)]
struct ProfileBuilder {
    salary_slips: Vec<(PayPeriod, SalarySlipData)>,
    bank_statement: Option<BankStatementData>,
    pan: Option<PanData>,
    aadhaar: Option<AadhaarData>,
    income_certificate: Option<IncomeCertificateData>,
    address_proof: Option<AddressProofData>,
    office_id: Option<OfficeIdData>,
}

impl ProfileBuilder {
    fn push(&mut self, document_type: DocumentType, result: Option<ExtractionResult>) {
        let Some(result) = result else {
            debug!(document_type = document_type.label(), "no extraction result");
            return;
        };

        if result.document_type() != document_type {
            warn!(
                declared = document_type.label(),
                extracted = result.document_type().label(),
                "extraction result does not match declared document type; dropping"
            );
            return;
        }

        match result {
            ExtractionResult::SalarySlip(slip) => {
                let slip = sanitize_salary_slip(slip);
                self.salary_slips.push((PayPeriod::parse(&slip.month), slip));
            }
            ExtractionResult::BankStatement(statement) => {
                replace_singleton(
                    &mut self.bank_statement,
                    sanitize_bank_statement(statement),
                    document_type,
                );
            }
            ExtractionResult::Pan(pan) => replace_singleton(&mut self.pan, pan, document_type),
            ExtractionResult::Aadhaar(aadhaar) => {
                replace_singleton(&mut self.aadhaar, aadhaar, document_type)
            }
            ExtractionResult::Form16(certificate) => {
                replace_singleton(&mut self.income_certificate, certificate, document_type)
            }
            ExtractionResult::AddressProof(proof) => {
                replace_singleton(&mut self.address_proof, proof, document_type)
            }
            ExtractionResult::OfficeId(office_id) => {
                replace_singleton(&mut self.office_id, office_id, document_type)
            }
        }
    }

    fn build(self) -> FinancialProfile {
        let mut keyed = self.salary_slips;
        keyed.sort_by(|left, right| PayPeriod::most_recent_first(&left.0, &right.0));

        FinancialProfile {
            salary_slips: keyed.into_iter().map(|(_, slip)| slip).collect(),
            bank_statement: self.bank_statement,
            pan: self.pan,
            aadhaar: self.aadhaar,
            income_certificate: self.income_certificate,
            address_proof: self.address_proof,
            office_id: self.office_id,
        }
    }
}

fn replace_singleton<T>(slot: &mut Option<T>, value: T, document_type: DocumentType) {
    if slot.replace(value).is_some() {
        warn!(
            document_type = document_type.label(),
            "multiple documents of a single-valued type; keeping the last one seen"
        );
    }
}

fn sanitize_salary_slip(mut slip: SalarySlipData) -> SalarySlipData {
    slip.net_salary = sanitize_amount(slip.net_salary, "netSalary");
    slip.gross_salary = slip
        .gross_salary
        .map(|value| sanitize_amount(value, "grossSalary"));
    slip.pf = slip.pf.map(|value| sanitize_amount(value, "pf"));
    slip
}

fn sanitize_bank_statement(mut statement: BankStatementData) -> BankStatementData {
    statement.summary.avg_net_monthly_income =
        sanitize_amount(statement.summary.avg_net_monthly_income, "avgNetMonthlyIncome");
    statement.summary.avg_monthly_emi =
        sanitize_amount(statement.summary.avg_monthly_emi, "avgMonthlyEmi");
    statement
}

/// Negative and non-finite amounts are clamped to zero so downstream rules stay total.
fn sanitize_amount(value: f64, field: &'static str) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!(field, value, "invalid amount from extractor; clamping to zero");
        0.0
    }
}
