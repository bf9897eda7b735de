use crate::infra::build_service;
use chrono::SecondsFormat;
use clap::Args;
use loan_underwriter::config::AppConfig;
use loan_underwriter::error::AppError;
use loan_underwriter::underwriting::{
    write_findings_csv, AnalysisRecord, AnalysisRequest, ApplicantId, DocumentRecord,
    DocumentType, ExtractionOptions, RuleStatus,
};
use serde_json::json;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// JSON file shaped like the POST /api/v1/analysis body
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Also write the rule findings to this CSV file
    #[arg(long)]
    pub(crate) findings_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Write the sample applicant's rule findings to this CSV file
    #[arg(long)]
    pub(crate) findings_csv: Option<PathBuf>,
    /// Drop the bank statement from the sample to show a degraded verdict
    #[arg(long)]
    pub(crate) without_bank_statement: bool,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        input,
        findings_csv,
    } = args;

    let raw = std::fs::read_to_string(&input)?;
    let request: AnalysisRequest = serde_json::from_str(&raw)?;
    let config = AppConfig::load()?;
    let service = build_service(ExtractionOptions::from(&config.extraction));

    let record = service
        .analyze(ApplicantId(request.applicant_id), request.documents)
        .await?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    if let Some(path) = findings_csv {
        export_findings(&record, &path)?;
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        findings_csv,
        without_bank_statement,
    } = args;

    let mut documents = sample_documents();
    if without_bank_statement {
        documents.retain(|document| document.document_type != DocumentType::BankStatement);
    }

    println!("Loan underwriting demo ({} documents)", documents.len());
    let service = build_service(ExtractionOptions::default());
    let record = service
        .analyze(ApplicantId("demo-applicant".to_string()), documents)
        .await?;

    render_record(&record);

    if let Some(path) = findings_csv {
        export_findings(&record, &path)?;
    }
    Ok(())
}

fn render_record(record: &AnalysisRecord) {
    println!(
        "- Analysis {} for {} at {}",
        record.analysis_id,
        record.applicant_id,
        record
            .created_at
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    println!(
        "- Extraction: {} documents | {} extracted | {} without text | {} unsupported | {} mismatched | {} failed | {} timed out",
        record.extraction.documents,
        record.extraction.extracted,
        record.extraction.skipped_no_text,
        record.extraction.unsupported,
        record.extraction.mismatched,
        record.extraction.failed,
        record.extraction.timed_out
    );
    println!(
        "- Risk score {}/100 -> {}",
        record.verdict.display_score(),
        record.verdict.risk_level.label()
    );
    if let Some(pan) = &record.profile.pan {
        println!("  PAN on file: {}", pan.pan_number);
    }
    if let Some(aadhaar) = &record.profile.aadhaar {
        println!("  Aadhaar on file: {}", aadhaar.aadhaar_number);
    }

    println!("  Findings:");
    for finding in &record.verdict.findings {
        let marker = match finding.status {
            RuleStatus::Pass => "ok",
            RuleStatus::Warning => "!!",
            RuleStatus::Fail => "XX",
        };
        println!(
            "    [{marker}] {} ({}): {}",
            finding.rule.label(),
            finding.severity.label(),
            finding.message
        );
    }

    println!("\nSummary\n{}", record.summary);
}

fn export_findings(record: &AnalysisRecord, path: &Path) -> Result<(), AppError> {
    let file = File::create(path)?;
    write_findings_csv(&record.verdict, file)?;
    println!("Findings written to {}", path.display());
    Ok(())
}

/// Extracted payloads for a salaried applicant with six months of steady pay.
pub(crate) fn sample_documents() -> Vec<DocumentRecord> {
    let mut documents = vec![
        DocumentRecord::new(
            DocumentType::Pan,
            json!({ "panNumber": "ABCDE1234F", "name": "Anita Rao" }).to_string(),
        ),
        DocumentRecord::new(
            DocumentType::Aadhaar,
            json!({
                "aadhaarNumber": "2345 6789 0123",
                "name": "Anita Rao",
                "address": "14 Lake View Road, Pune"
            })
            .to_string(),
        ),
        DocumentRecord::new(
            DocumentType::BankStatement,
            json!({
                "salaryCredits": [
                    { "date": "2024-06-01", "amount": 52000, "description": "SALARY JUN" },
                    { "date": "2024-05-01", "amount": 51500, "description": "SALARY MAY" }
                ],
                "emiDebits": [
                    { "date": "2024-06-05", "amount": 12000, "description": "HOME LOAN EMI" }
                ],
                "bounces": [],
                "summary": { "avgNetMonthlyIncome": 52000, "avgMonthlyEmi": 12000 }
            })
            .to_string(),
        ),
        DocumentRecord::new(
            DocumentType::OfficeId,
            json!({
                "employeeName": "Anita Rao",
                "employerName": "Northwind Analytics",
                "employeeId": "NW-4471"
            })
            .to_string(),
        ),
    ];

    for (month, net_salary) in [
        ("2024-01", 50_500),
        ("2024-02", 51_000),
        ("2024-03", 51_000),
        ("2024-04", 51_500),
        ("2024-05", 51_500),
        ("2024-06", 52_000),
    ] {
        documents.push(DocumentRecord::new(
            DocumentType::SalarySlip,
            json!({
                "employeeName": "Anita Rao",
                "employerName": "Northwind Analytics",
                "month": month,
                "netSalary": net_salary,
                "grossSalary": net_salary + 8_000,
                "pf": 1_800
            })
            .to_string(),
        ));
    }

    documents
}
