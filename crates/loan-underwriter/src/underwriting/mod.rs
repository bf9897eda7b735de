//! Loan underwriting core: document aggregation, rule evaluation, and risk scoring.
//!
//! Extraction, persistence, and narrative summaries are collaborators behind traits;
//! the aggregation and scoring path in between is pure and deterministic.

pub mod domain;
pub mod evaluation;
pub mod export;
pub mod extraction;
pub mod masking;
pub mod orchestrator;
pub mod profile;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AadhaarData, AddressProofData, AnalysisId, ApplicantId, BankStatementData,
    BankStatementSummary, BankTransaction, DocumentRecord, DocumentType, ExtractionResult,
    IncomeCertificateData, OfficeIdData, PanData, SalarySlipData,
};
pub use evaluation::{
    evaluate, risk_level, RiskLevel, RiskThresholds, RiskVerdict, RuleConfig, RuleEngine,
    RuleFinding, RuleId, RuleStatus, Severity,
};
pub use export::write_findings_csv;
pub use extraction::{decode_payload, DocumentExtractor, ExtractionError, JsonPayloadExtractor};
pub use masking::{mask_aadhaar, mask_pan};
pub use orchestrator::{
    AnalysisError, AnalysisOrchestrator, AnalysisReport, ExtractionOptions, ExtractionStats,
};
pub use profile::{FinancialProfile, PayPeriod};
pub use repository::{
    AnalysisOverview, AnalysisRecord, AnalysisRepository, DigestSummarizer, NarrativeSummarizer,
    RepositoryError, SummaryError,
};
pub use router::{analysis_router, AnalysisRequest};
pub use service::{UnderwritingService, UnderwritingServiceError};
