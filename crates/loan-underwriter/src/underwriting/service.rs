use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{AnalysisId, ApplicantId, DocumentRecord};
use super::evaluation::{RuleConfig, RuleEngine};
use super::extraction::DocumentExtractor;
use super::orchestrator::{AnalysisError, AnalysisOrchestrator, ExtractionOptions};
use super::repository::{
    AnalysisRecord, AnalysisRepository, NarrativeSummarizer, RepositoryError,
};

pub(crate) const SUMMARY_FALLBACK: &str =
    "Error generating underwriting summary. Please review manually.";

/// Service composing the orchestrator, repository, and summary collaborator.
pub struct UnderwritingService<X, R, S> {
    orchestrator: AnalysisOrchestrator<X>,
    repository: Arc<R>,
    summarizer: Arc<S>,
}

static ANALYSIS_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_analysis_id() -> AnalysisId {
    let id = ANALYSIS_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AnalysisId(format!("analysis-{id:06}"))
}

impl<X, R, S> UnderwritingService<X, R, S>
where
    X: DocumentExtractor + 'static,
    R: AnalysisRepository + 'static,
    S: NarrativeSummarizer + 'static,
{
    pub fn new(
        extractor: Arc<X>,
        repository: Arc<R>,
        summarizer: Arc<S>,
        config: RuleConfig,
        options: ExtractionOptions,
    ) -> Self {
        let engine = Arc::new(RuleEngine::new(config));
        Self {
            orchestrator: AnalysisOrchestrator::new(extractor, engine, options),
            repository,
            summarizer,
        }
    }

    /// Run a full analysis for the applicant and persist the redacted result.
    pub async fn analyze(
        &self,
        applicant_id: ApplicantId,
        documents: Vec<DocumentRecord>,
    ) -> Result<AnalysisRecord, UnderwritingServiceError> {
        let report = self.orchestrator.run(&applicant_id, &documents).await?;
        let profile = report.profile.redacted();

        let summary = match self.summarizer.summarize(&profile, &report.verdict).await {
            Ok(summary) => summary,
            Err(err) => {
                warn!(applicant = %applicant_id, error = %err, "summary generation failed");
                SUMMARY_FALLBACK.to_string()
            }
        };

        let record = AnalysisRecord {
            analysis_id: next_analysis_id(),
            applicant_id,
            profile,
            verdict: report.verdict,
            extraction: report.extraction,
            summary,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert(record)?;
        info!(
            analysis = %stored.analysis_id,
            applicant = %stored.applicant_id,
            "analysis stored"
        );
        Ok(stored)
    }

    /// Fetch a stored analysis for API responses.
    pub fn get(&self, analysis_id: &AnalysisId) -> Result<AnalysisRecord, UnderwritingServiceError> {
        let record = self
            .repository
            .fetch(analysis_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// All analyses for an applicant, newest first.
    pub fn history(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<Vec<AnalysisRecord>, UnderwritingServiceError> {
        Ok(self.repository.for_applicant(applicant_id)?)
    }
}

/// Error raised by the underwriting service.
#[derive(Debug, thiserror::Error)]
pub enum UnderwritingServiceError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
