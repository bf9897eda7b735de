//! Boundary with the external classifier/extractor.
//!
//! The core never inspects raw files. It hands already-acquired text to a
//! [`DocumentExtractor`] and receives either a typed [`ExtractionResult`] or nothing.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::domain::{
    AadhaarData, AddressProofData, BankStatementData, DocumentType, ExtractionResult,
    IncomeCertificateData, OfficeIdData, PanData, SalarySlipData,
};

/// External text-to-facts collaborator. Called at most once per document per run.
///
/// `Ok(None)` signals that the document type is not supported by the extractor.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(
        &self,
        document_type: DocumentType,
        text: &str,
    ) -> Result<Option<ExtractionResult>, ExtractionError>;
}

/// Per-document extraction failure. Never escalates beyond the document it belongs to.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extractor returned an empty payload for {0:?}")]
    EmptyPayload(DocumentType),
    #[error("payload for {document_type:?} violates the expected schema: {source}")]
    Schema {
        document_type: DocumentType,
        #[source]
        source: serde_json::Error,
    },
    #[error("extraction service unavailable: {0}")]
    Unavailable(String),
}

/// Decode a JSON payload into the variant matching `document_type`.
///
/// Returns `Ok(None)` for [`DocumentType::Unknown`], which has no schema.
pub fn decode_payload(
    document_type: DocumentType,
    payload: &str,
) -> Result<Option<ExtractionResult>, ExtractionError> {
    if payload.trim().is_empty() {
        return Err(ExtractionError::EmptyPayload(document_type));
    }

    let result = match document_type {
        DocumentType::SalarySlip => {
            ExtractionResult::SalarySlip(parse::<SalarySlipData>(document_type, payload)?)
        }
        DocumentType::BankStatement => {
            ExtractionResult::BankStatement(parse::<BankStatementData>(document_type, payload)?)
        }
        DocumentType::Pan => ExtractionResult::Pan(parse::<PanData>(document_type, payload)?),
        DocumentType::Aadhaar => {
            ExtractionResult::Aadhaar(parse::<AadhaarData>(document_type, payload)?)
        }
        DocumentType::Form16 => {
            ExtractionResult::Form16(parse::<IncomeCertificateData>(document_type, payload)?)
        }
        DocumentType::AddressProof => {
            ExtractionResult::AddressProof(parse::<AddressProofData>(document_type, payload)?)
        }
        DocumentType::OfficeId => {
            ExtractionResult::OfficeId(parse::<OfficeIdData>(document_type, payload)?)
        }
        DocumentType::Unknown => return Ok(None),
    };

    Ok(Some(result))
}

fn parse<T: DeserializeOwned>(
    document_type: DocumentType,
    payload: &str,
) -> Result<T, ExtractionError> {
    serde_json::from_str(payload).map_err(|source| ExtractionError::Schema {
        document_type,
        source,
    })
}

/// Extractor for documents whose text already carries the structured JSON payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPayloadExtractor;

#[async_trait]
impl DocumentExtractor for JsonPayloadExtractor {
    async fn extract(
        &self,
        document_type: DocumentType,
        text: &str,
    ) -> Result<Option<ExtractionResult>, ExtractionError> {
        decode_payload(document_type, text)
    }
}
