//! Drives one analysis run: extraction fan-out, aggregation, evaluation.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{info, warn};

use super::domain::{ApplicantId, DocumentRecord, DocumentType, ExtractionResult};
use super::evaluation::{RiskVerdict, RuleEngine};
use super::extraction::DocumentExtractor;
use super::profile::FinancialProfile;
use crate::config::ExtractionConfig;

/// Bounds on the fan-out of extraction calls for a single applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionOptions {
    pub max_concurrency: usize,
    pub call_timeout: Duration,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self::from(&ExtractionConfig::default())
    }
}

impl From<&ExtractionConfig> for ExtractionOptions {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency.max(1),
            call_timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Raised only when a run cannot start at all.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("no documents found for applicant {applicant_id}")]
    NoDocuments { applicant_id: ApplicantId },
}

/// How each document fared during extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub documents: usize,
    pub extracted: usize,
    pub skipped_no_text: usize,
    pub unsupported: usize,
    /// Results whose variant did not match the declared document type.
    pub mismatched: usize,
    pub failed: usize,
    pub timed_out: usize,
}

/// Output of a completed run. Holds the unmasked profile; redact before it leaves the core.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub applicant_id: ApplicantId,
    pub profile: FinancialProfile,
    pub verdict: RiskVerdict,
    pub extraction: ExtractionStats,
}

enum DocumentOutcome {
    Extracted(ExtractionResult),
    NoText,
    Unsupported,
    Mismatched,
    Failed,
    TimedOut,
}

pub struct AnalysisOrchestrator<X> {
    extractor: Arc<X>,
    engine: Arc<RuleEngine>,
    options: ExtractionOptions,
}

impl<X> AnalysisOrchestrator<X>
where
    X: DocumentExtractor + 'static,
{
    pub fn new(extractor: Arc<X>, engine: Arc<RuleEngine>, options: ExtractionOptions) -> Self {
        Self {
            extractor,
            engine,
            options,
        }
    }

    /// Extract every document, then aggregate and score the resulting profile.
    ///
    /// Individual extraction failures degrade that document to absent; only an empty
    /// document set aborts the run.
    pub async fn run(
        &self,
        applicant_id: &ApplicantId,
        documents: &[DocumentRecord],
    ) -> Result<AnalysisReport, AnalysisError> {
        if documents.is_empty() {
            return Err(AnalysisError::NoDocuments {
                applicant_id: applicant_id.clone(),
            });
        }

        info!(
            applicant = %applicant_id,
            documents = documents.len(),
            "starting analysis run"
        );

        let calls: Vec<_> = documents
            .iter()
            .enumerate()
            .map(|(index, document)| async move {
                let outcome = self.extract_document(applicant_id, document).await;
                (index, document.document_type, outcome)
            })
            .collect();

        let mut outcomes: Vec<(usize, DocumentType, DocumentOutcome)> = stream::iter(calls)
            .buffer_unordered(self.options.max_concurrency)
            .collect()
            .await;

        // Completion order is arbitrary; restore upload order for last-seen-wins.
        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut stats = ExtractionStats {
            documents: documents.len(),
            ..ExtractionStats::default()
        };
        let results = outcomes
            .into_iter()
            .map(|(_, document_type, outcome)| {
                let result = match outcome {
                    DocumentOutcome::Extracted(result) => {
                        stats.extracted += 1;
                        Some(result)
                    }
                    DocumentOutcome::NoText => {
                        stats.skipped_no_text += 1;
                        None
                    }
                    DocumentOutcome::Unsupported => {
                        stats.unsupported += 1;
                        None
                    }
                    DocumentOutcome::Mismatched => {
                        stats.mismatched += 1;
                        None
                    }
                    DocumentOutcome::Failed => {
                        stats.failed += 1;
                        None
                    }
                    DocumentOutcome::TimedOut => {
                        stats.timed_out += 1;
                        None
                    }
                };
                (document_type, result)
            })
            .collect::<Vec<_>>();

        let profile = FinancialProfile::aggregate(results);
        let verdict = self.engine.evaluate(&profile);

        info!(
            applicant = %applicant_id,
            extracted = stats.extracted,
            failed = stats.failed + stats.timed_out,
            risk_score = verdict.risk_score,
            risk_level = verdict.risk_level.label(),
            "analysis run complete"
        );

        Ok(AnalysisReport {
            applicant_id: applicant_id.clone(),
            profile,
            verdict,
            extraction: stats,
        })
    }

    async fn extract_document(
        &self,
        applicant_id: &ApplicantId,
        document: &DocumentRecord,
    ) -> DocumentOutcome {
        let Some(text) = document.extracted_text.as_deref() else {
            return DocumentOutcome::NoText;
        };

        let call = AssertUnwindSafe(self.extractor.extract(document.document_type, text))
            .catch_unwind();

        match timeout(self.options.call_timeout, call).await {
            Ok(Ok(Ok(Some(result)))) if result.document_type() != document.document_type => {
                warn!(
                    applicant = %applicant_id,
                    declared = document.document_type.label(),
                    extracted = result.document_type().label(),
                    "extraction result does not match declared document type; treating as absent"
                );
                DocumentOutcome::Mismatched
            }
            Ok(Ok(Ok(Some(result)))) => DocumentOutcome::Extracted(result),
            Ok(Ok(Ok(None))) => DocumentOutcome::Unsupported,
            Ok(Ok(Err(err))) => {
                warn!(
                    applicant = %applicant_id,
                    document_type = document.document_type.label(),
                    error = %err,
                    "extraction failed; treating document as absent"
                );
                DocumentOutcome::Failed
            }
            Ok(Err(_)) => {
                warn!(
                    applicant = %applicant_id,
                    document_type = document.document_type.label(),
                    "extractor panicked; treating document as absent"
                );
                DocumentOutcome::Failed
            }
            Err(_) => {
                warn!(
                    applicant = %applicant_id,
                    document_type = document.document_type.label(),
                    timeout_secs = self.options.call_timeout.as_secs(),
                    "extraction timed out; treating document as absent"
                );
                DocumentOutcome::TimedOut
            }
        }
    }
}
