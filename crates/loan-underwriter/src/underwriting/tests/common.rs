use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::underwriting::domain::{
    AadhaarData, AnalysisId, ApplicantId, BankStatementData, BankStatementSummary,
    BankTransaction, DocumentRecord, DocumentType, ExtractionResult, PanData, SalarySlipData,
};
use crate::underwriting::evaluation::{RiskVerdict, RuleConfig, RuleEngine};
use crate::underwriting::extraction::{DocumentExtractor, ExtractionError, JsonPayloadExtractor};
use crate::underwriting::orchestrator::ExtractionOptions;
use crate::underwriting::profile::FinancialProfile;
use crate::underwriting::repository::{
    AnalysisRecord, AnalysisRepository, DigestSummarizer, NarrativeSummarizer, RepositoryError,
    SummaryError,
};
use crate::underwriting::UnderwritingService;

pub(super) fn salary_slip(month: &str, net_salary: f64) -> SalarySlipData {
    SalarySlipData {
        employee_name: "Asha Rao".to_string(),
        employer_name: "Kestrel Analytics".to_string(),
        month: month.to_string(),
        net_salary,
        gross_salary: Some(net_salary * 1.2),
        pf: Some(1800.0),
    }
}

pub(super) fn bounce(date: &str) -> BankTransaction {
    BankTransaction {
        date: date.to_string(),
        amount: None,
        description: "CHQ RETURN INSUFFICIENT FUNDS".to_string(),
    }
}

pub(super) fn bank_statement(income: f64, emi: f64, bounces: usize) -> BankStatementData {
    BankStatementData {
        salary_credits: vec![BankTransaction {
            date: "2024-03-01".to_string(),
            amount: Some(income),
            description: "NEFT SALARY KESTREL".to_string(),
        }],
        emi_debits: vec![BankTransaction {
            date: "2024-03-05".to_string(),
            amount: Some(emi),
            description: "HOME LOAN EMI".to_string(),
        }],
        bounces: (0..bounces).map(|_| bounce("2024-02-10")).collect(),
        summary: BankStatementSummary {
            avg_net_monthly_income: income,
            avg_monthly_emi: emi,
        },
    }
}

pub(super) fn pan() -> PanData {
    PanData {
        pan_number: "ABCDE1234F".to_string(),
        name: "Asha Rao".to_string(),
    }
}

pub(super) fn aadhaar() -> AadhaarData {
    AadhaarData {
        aadhaar_number: "123456789012".to_string(),
        name: "Asha Rao".to_string(),
        address: "14 Koregaon Park, Pune".to_string(),
    }
}

/// One slip of 30k, a 30k/10k bank statement without bounces, PAN and Aadhaar.
pub(super) fn baseline_profile() -> FinancialProfile {
    FinancialProfile {
        salary_slips: vec![salary_slip("2024-03", 30_000.0)],
        bank_statement: Some(bank_statement(30_000.0, 10_000.0, 0)),
        pan: Some(pan()),
        aadhaar: Some(aadhaar()),
        ..FinancialProfile::default()
    }
}

pub(super) fn months(count: usize, net_salary: f64) -> Vec<SalarySlipData> {
    (1..=count)
        .rev()
        .map(|month| salary_slip(&format!("2024-{month:02}"), net_salary))
        .collect()
}

pub(super) fn engine() -> RuleEngine {
    RuleEngine::new(RuleConfig::default())
}

pub(super) fn contributions(verdict: &RiskVerdict) -> u32 {
    verdict.findings.iter().map(|finding| finding.score).sum()
}

pub(super) fn payload(result: &ExtractionResult) -> String {
    let value = serde_json::to_value(result).expect("result serializes");
    value["data"].to_string()
}

pub(super) fn document(result: ExtractionResult) -> DocumentRecord {
    DocumentRecord::new(result.document_type(), payload(&result))
}

pub(super) fn complete_documents() -> Vec<DocumentRecord> {
    vec![
        document(ExtractionResult::SalarySlip(salary_slip("2024-03", 30_000.0))),
        document(ExtractionResult::BankStatement(bank_statement(
            30_000.0, 10_000.0, 0,
        ))),
        document(ExtractionResult::Pan(pan())),
        document(ExtractionResult::Aadhaar(aadhaar())),
    ]
}

pub(super) fn fast_options() -> ExtractionOptions {
    ExtractionOptions {
        max_concurrency: 4,
        call_timeout: Duration::from_millis(200),
    }
}

/// Behaviour switches keyed on the document text.
#[derive(Debug, Clone)]
pub(super) enum Script {
    Fail,
    Hang,
    Panic,
    Delay(Duration, String),
    Reply(ExtractionResult),
}

/// Extractor that decodes JSON payloads but can be scripted to misbehave per document.
#[derive(Default)]
pub(super) struct ScriptedExtractor {
    scripts: HashMap<String, Script>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedExtractor {
    pub(super) fn with_script(mut self, text: &str, script: Script) -> Self {
        self.scripts.insert(text.to_string(), script);
        self
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn run_script(
        &self,
        document_type: DocumentType,
        text: &str,
    ) -> Result<Option<ExtractionResult>, ExtractionError> {
        match self.scripts.get(text) {
            Some(Script::Fail) => Err(ExtractionError::Unavailable("model overloaded".to_string())),
            Some(Script::Hang) => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(None)
            }
            Some(Script::Panic) => panic!("extractor crashed on {text}"),
            Some(Script::Delay(delay, payload)) => {
                tokio::time::sleep(*delay).await;
                JsonPayloadExtractor.extract(document_type, payload).await
            }
            Some(Script::Reply(result)) => Ok(Some(result.clone())),
            None => JsonPayloadExtractor.extract(document_type, text).await,
        }
    }
}

#[async_trait]
impl DocumentExtractor for ScriptedExtractor {
    async fn extract(
        &self,
        document_type: DocumentType,
        text: &str,
    ) -> Result<Option<ExtractionResult>, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        let result = self.run_script(document_type, text).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<Vec<AnalysisRecord>>>,
}

impl AnalysisRepository for MemoryRepository {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard
            .iter()
            .any(|existing| existing.analysis_id == record.analysis_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| &record.analysis_id == id)
            .cloned())
    }

    fn for_applicant(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|record| &record.applicant_id == applicant_id)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl AnalysisRepository for UnavailableRepository {
    fn insert(&self, _record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_applicant(
        &self,
        _applicant_id: &ApplicantId,
    ) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Summarizer that records what it was shown and optionally fails.
#[derive(Default)]
pub(super) struct RecordingSummarizer {
    pub(super) fail: bool,
    pub(super) seen: Mutex<Vec<FinancialProfile>>,
}

#[async_trait]
impl NarrativeSummarizer for RecordingSummarizer {
    async fn summarize(
        &self,
        profile: &FinancialProfile,
        verdict: &RiskVerdict,
    ) -> Result<String, SummaryError> {
        self.seen
            .lock()
            .expect("summarizer mutex poisoned")
            .push(profile.clone());
        if self.fail {
            return Err(SummaryError::Unavailable("timeout".to_string()));
        }
        Ok(format!("risk {}", verdict.risk_level.label()))
    }
}

pub(super) type TestService =
    UnderwritingService<JsonPayloadExtractor, MemoryRepository, DigestSummarizer>;

pub(super) fn build_service() -> (TestService, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = UnderwritingService::new(
        Arc::new(JsonPayloadExtractor),
        repository.clone(),
        Arc::new(DigestSummarizer),
        RuleConfig::default(),
        fast_options(),
    );
    (service, repository)
}

pub(super) fn analysis_request(applicant_id: &str, documents: &[DocumentRecord]) -> Value {
    json!({
        "applicant_id": applicant_id,
        "documents": documents,
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
