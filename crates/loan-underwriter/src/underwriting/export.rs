use std::io;

use serde::Serialize;

use super::evaluation::RiskVerdict;

#[derive(Serialize)]
struct FindingRow<'a> {
    rule: &'static str,
    status: &'static str,
    severity: &'static str,
    score: u32,
    value: Option<f64>,
    message: &'a str,
}

/// Write the findings audit trail as CSV, one row per finding in evaluation order.
pub fn write_findings_csv<W: io::Write>(verdict: &RiskVerdict, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for finding in &verdict.findings {
        csv_writer.serialize(FindingRow {
            rule: finding.rule.label(),
            status: finding.status.label(),
            severity: finding.severity.label(),
            score: finding.score,
            value: finding.value,
            message: &finding.message,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
