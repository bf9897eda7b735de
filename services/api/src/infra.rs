use loan_underwriter::underwriting::{
    AnalysisId, AnalysisRecord, AnalysisRepository, ApplicantId, DigestSummarizer,
    ExtractionOptions, JsonPayloadExtractor, RepositoryError, RuleConfig, UnderwritingService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

pub(crate) type ApiService =
    UnderwritingService<JsonPayloadExtractor, InMemoryAnalysisRepository, DigestSummarizer>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAnalysisRepository {
    records: Arc<Mutex<HashMap<AnalysisId, AnalysisRecord>>>,
}

impl InMemoryAnalysisRepository {
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<AnalysisId, AnalysisRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("analysis store lock poisoned".to_string()))
    }
}

impl AnalysisRepository for InMemoryAnalysisRepository {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&record.analysis_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.analysis_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn for_applicant(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        let mut records: Vec<_> = self
            .guard()?
            .values()
            .filter(|record| &record.applicant_id == applicant_id)
            .cloned()
            .collect();
        records.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.analysis_id.0.cmp(&left.analysis_id.0))
        });
        Ok(records)
    }
}

/// Wire the default collaborators: JSON payload extraction, in-memory storage, digest summaries.
pub(crate) fn build_service(options: ExtractionOptions) -> Arc<ApiService> {
    Arc::new(UnderwritingService::new(
        Arc::new(JsonPayloadExtractor),
        Arc::new(InMemoryAnalysisRepository::default()),
        Arc::new(DigestSummarizer),
        RuleConfig::default(),
        options,
    ))
}
