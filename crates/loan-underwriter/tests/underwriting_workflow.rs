//! End-to-end scenarios through the public orchestrator and service facade.

mod common {
    use std::time::Duration;

    use serde_json::json;

    use loan_underwriter::underwriting::{DocumentRecord, DocumentType, ExtractionOptions};

    pub(super) fn options() -> ExtractionOptions {
        ExtractionOptions {
            max_concurrency: 3,
            call_timeout: Duration::from_secs(1),
        }
    }

    pub(super) fn salary_slip(month: &str, net_salary: u32) -> DocumentRecord {
        DocumentRecord::new(
            DocumentType::SalarySlip,
            json!({
                "employeeName": "Ravi Menon",
                "employerName": "Harbor Logistics",
                "month": month,
                "netSalary": net_salary,
                "grossSalary": null,
                "pf": null
            })
            .to_string(),
        )
    }

    pub(super) fn bank_statement(income: u32, emi: u32, bounces: usize) -> DocumentRecord {
        let bounce_rows: Vec<_> = (0..bounces)
            .map(|_| json!({"date": "2024-01-15", "description": "ECS RETURN"}))
            .collect();
        DocumentRecord::new(
            DocumentType::BankStatement,
            json!({
                "salaryCredits": [],
                "emiDebits": [],
                "bounces": bounce_rows,
                "summary": {"avgNetMonthlyIncome": income, "avgMonthlyEmi": emi}
            })
            .to_string(),
        )
    }

    pub(super) fn pan() -> DocumentRecord {
        DocumentRecord::new(
            DocumentType::Pan,
            json!({"panNumber": "ABCDE1234F", "name": "Ravi Menon"}).to_string(),
        )
    }

    pub(super) fn aadhaar() -> DocumentRecord {
        DocumentRecord::new(
            DocumentType::Aadhaar,
            json!({"aadhaarNumber": "9876 5432 1098", "name": "Ravi Menon", "address": "Kochi"})
                .to_string(),
        )
    }
}

use std::sync::Arc;

use common::*;
use loan_underwriter::underwriting::{
    AnalysisError, AnalysisOrchestrator, ApplicantId, DigestSummarizer, DocumentRecord,
    DocumentType, JsonPayloadExtractor, RiskLevel, RuleConfig, RuleEngine, RuleId, RuleStatus,
};

fn orchestrator() -> AnalysisOrchestrator<JsonPayloadExtractor> {
    AnalysisOrchestrator::new(
        Arc::new(JsonPayloadExtractor),
        Arc::new(RuleEngine::new(RuleConfig::default())),
        options(),
    )
}

#[tokio::test]
async fn salaried_applicant_with_clean_statement_scores_low() {
    let documents = vec![
        pan(),
        salary_slip("2024-02", 30_000),
        bank_statement(30_000, 10_000, 0),
        aadhaar(),
    ];

    let report = orchestrator()
        .run(&ApplicantId("ravi".to_string()), &documents)
        .await
        .expect("run succeeds");

    assert_eq!(report.verdict.risk_score, 20);
    assert_eq!(report.verdict.risk_level, RiskLevel::Low);
    let rules: Vec<_> = report
        .verdict
        .findings
        .iter()
        .map(|finding| finding.rule)
        .collect();
    assert_eq!(
        rules,
        vec![
            RuleId::FoirCheck,
            RuleId::MinSalaryCheck,
            RuleId::BounceCheck,
            RuleId::SalaryStability,
            RuleId::DocumentCompleteness,
        ]
    );
}

#[tokio::test]
async fn applicant_without_bank_statement_scores_high() {
    let documents = vec![salary_slip("2024-02", 20_000), pan(), aadhaar()];

    let report = orchestrator()
        .run(&ApplicantId("ravi".to_string()), &documents)
        .await
        .expect("run succeeds");

    assert_eq!(report.verdict.risk_score, 85);
    assert_eq!(report.verdict.risk_level, RiskLevel::High);
}

#[tokio::test]
async fn six_months_of_uneven_salary_raise_variance_warning() {
    let mut documents = vec![bank_statement(45_000, 9_000, 0), pan(), aadhaar()];
    for (month, salary) in [
        ("Jan 2024", 40_000),
        ("Feb 2024", 41_000),
        ("Mar 2024", 39_000),
        ("Apr 2024", 40_500),
        ("May 2024", 62_000),
        ("Jun 2024", 40_000),
    ] {
        documents.push(salary_slip(month, salary));
    }

    let report = orchestrator()
        .run(&ApplicantId("ravi".to_string()), &documents)
        .await
        .expect("run succeeds");

    assert_eq!(report.profile.salary_slips[0].month, "Jun 2024");
    let variance = report
        .verdict
        .finding(RuleId::SalaryVariance)
        .expect("variance finding emitted");
    assert_eq!(variance.status, RuleStatus::Warning);
    // FOIR 0.2 (+5) and variance (+10)
    assert_eq!(report.verdict.risk_score, 15);
}

#[tokio::test]
async fn zero_documents_is_a_precondition_failure() {
    let result = orchestrator()
        .run(&ApplicantId("nobody".to_string()), &[])
        .await;

    assert!(matches!(result, Err(AnalysisError::NoDocuments { .. })));
}

#[tokio::test]
async fn service_persists_only_masked_identity_numbers() {
    use loan_underwriter::underwriting::{
        AnalysisId, AnalysisRecord, AnalysisRepository, RepositoryError, UnderwritingService,
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct VecRepository(Mutex<Vec<AnalysisRecord>>);

    impl AnalysisRepository for VecRepository {
        fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
            self.0
                .lock()
                .expect("repository mutex poisoned")
                .push(record.clone());
            Ok(record)
        }

        fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
            Ok(self
                .0
                .lock()
                .expect("repository mutex poisoned")
                .iter()
                .find(|record| &record.analysis_id == id)
                .cloned())
        }

        fn for_applicant(
            &self,
            applicant_id: &ApplicantId,
        ) -> Result<Vec<AnalysisRecord>, RepositoryError> {
            Ok(self
                .0
                .lock()
                .expect("repository mutex poisoned")
                .iter()
                .filter(|record| &record.applicant_id == applicant_id)
                .cloned()
                .collect())
        }
    }

    let repository = Arc::new(VecRepository::default());
    let service = UnderwritingService::new(
        Arc::new(JsonPayloadExtractor),
        repository.clone(),
        Arc::new(DigestSummarizer),
        RuleConfig::default(),
        options(),
    );
    let documents = vec![
        pan(),
        aadhaar(),
        DocumentRecord::without_text(DocumentType::SalarySlip),
    ];

    let record = service
        .analyze(ApplicantId("ravi".to_string()), documents)
        .await
        .expect("analysis succeeds");

    let aadhaar = record.profile.aadhaar.expect("aadhaar kept");
    assert_eq!(aadhaar.aadhaar_number, "XXXX XXXX 1098");
    assert_eq!(record.extraction.skipped_no_text, 1);
    let stored = repository.0.lock().expect("repository mutex poisoned");
    assert_eq!(stored.len(), 1);
}
