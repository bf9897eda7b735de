use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnalysisId, ApplicantId};
use super::evaluation::{RiskLevel, RiskVerdict, RuleStatus};
use super::orchestrator::ExtractionStats;
use super::profile::FinancialProfile;

/// Stored outcome of one analysis run. `profile` is always the redacted form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub analysis_id: AnalysisId,
    pub applicant_id: ApplicantId,
    pub profile: FinancialProfile,
    pub verdict: RiskVerdict,
    pub extraction: ExtractionStats,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn overview(&self) -> AnalysisOverview {
        let count = |status: RuleStatus| {
            self.verdict
                .findings
                .iter()
                .filter(|finding| finding.status == status)
                .count()
        };

        AnalysisOverview {
            analysis_id: self.analysis_id.clone(),
            applicant_id: self.applicant_id.clone(),
            risk_score: self.verdict.risk_score,
            risk_level: self.verdict.risk_level,
            failed_rules: count(RuleStatus::Fail),
            warnings: count(RuleStatus::Warning),
            created_at: self.created_at,
        }
    }
}

/// Condensed view of a stored analysis for listings.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOverview {
    pub analysis_id: AnalysisId,
    pub applicant_id: ApplicantId,
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub failed_rules: usize,
    pub warnings: usize,
    pub created_at: DateTime<Utc>,
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait AnalysisRepository: Send + Sync {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError>;
    fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError>;
    /// Every stored run for the applicant, newest first.
    fn for_applicant(&self, applicant_id: &ApplicantId)
        -> Result<Vec<AnalysisRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Narrative summary collaborator. Only ever sees the redacted profile.
#[async_trait]
pub trait NarrativeSummarizer: Send + Sync {
    async fn summarize(
        &self,
        profile: &FinancialProfile,
        verdict: &RiskVerdict,
    ) -> Result<String, SummaryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("summary service unavailable: {0}")]
    Unavailable(String),
}

/// Summarizer that renders the verdict's findings digest verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct DigestSummarizer;

#[async_trait]
impl NarrativeSummarizer for DigestSummarizer {
    async fn summarize(
        &self,
        _profile: &FinancialProfile,
        verdict: &RiskVerdict,
    ) -> Result<String, SummaryError> {
        Ok(verdict.digest())
    }
}
