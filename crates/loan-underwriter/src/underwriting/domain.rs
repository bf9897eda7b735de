use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for an applicant whose documents are under review.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

/// Identifier wrapper for a single analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnalysisId(pub String);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of document categories produced by the upstream classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    SalarySlip,
    BankStatement,
    Pan,
    Aadhaar,
    #[serde(rename = "FORM_16")]
    Form16,
    AddressProof,
    OfficeId,
    Unknown,
}

impl DocumentType {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentType::SalarySlip => "SALARY_SLIP",
            DocumentType::BankStatement => "BANK_STATEMENT",
            DocumentType::Pan => "PAN",
            DocumentType::Aadhaar => "AADHAAR",
            DocumentType::Form16 => "FORM_16",
            DocumentType::AddressProof => "ADDRESS_PROOF",
            DocumentType::OfficeId => "OFFICE_ID",
            DocumentType::Unknown => "UNKNOWN",
        }
    }
}

/// One uploaded document. `extracted_text` is `None` when text acquisition failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub document_type: DocumentType,
    #[serde(default)]
    pub extracted_text: Option<String>,
}

impl DocumentRecord {
    pub fn new(document_type: DocumentType, extracted_text: impl Into<String>) -> Self {
        Self {
            document_type,
            extracted_text: Some(extracted_text.into()),
        }
    }

    pub fn without_text(document_type: DocumentType) -> Self {
        Self {
            document_type,
            extracted_text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalarySlipData {
    #[serde(default)]
    pub employee_name: String,
    #[serde(default)]
    pub employer_name: String,
    /// Declared pay period, e.g. `2024-03` or `Mar 2024`.
    #[serde(default)]
    pub month: String,
    pub net_salary: f64,
    #[serde(default)]
    pub gross_salary: Option<f64>,
    #[serde(default)]
    pub pf: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTransaction {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankStatementSummary {
    pub avg_net_monthly_income: f64,
    pub avg_monthly_emi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankStatementData {
    #[serde(default)]
    pub salary_credits: Vec<BankTransaction>,
    #[serde(default)]
    pub emi_debits: Vec<BankTransaction>,
    #[serde(default)]
    pub bounces: Vec<BankTransaction>,
    pub summary: BankStatementSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanData {
    pub pan_number: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AadhaarData {
    pub aadhaar_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// Annual income certificate (Form 16).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeCertificateData {
    #[serde(default)]
    pub employer_name: String,
    #[serde(default)]
    pub assessment_year: String,
    #[serde(default)]
    pub gross_annual_income: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressProofData {
    #[serde(default)]
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeIdData {
    #[serde(default)]
    pub employee_name: String,
    pub employer_name: String,
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// Structured facts extracted from one document, tagged by document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ExtractionResult {
    SalarySlip(SalarySlipData),
    BankStatement(BankStatementData),
    Pan(PanData),
    Aadhaar(AadhaarData),
    Form16(IncomeCertificateData),
    AddressProof(AddressProofData),
    OfficeId(OfficeIdData),
}

impl ExtractionResult {
    pub const fn document_type(&self) -> DocumentType {
        match self {
            ExtractionResult::SalarySlip(_) => DocumentType::SalarySlip,
            ExtractionResult::BankStatement(_) => DocumentType::BankStatement,
            ExtractionResult::Pan(_) => DocumentType::Pan,
            ExtractionResult::Aadhaar(_) => DocumentType::Aadhaar,
            ExtractionResult::Form16(_) => DocumentType::Form16,
            ExtractionResult::AddressProof(_) => DocumentType::AddressProof,
            ExtractionResult::OfficeId(_) => DocumentType::OfficeId,
        }
    }
}
