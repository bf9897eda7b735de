use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AnalysisId, ApplicantId, DocumentRecord};
use super::extraction::DocumentExtractor;
use super::orchestrator::AnalysisError;
use super::repository::{AnalysisRepository, NarrativeSummarizer, RepositoryError};
use super::service::{UnderwritingService, UnderwritingServiceError};

/// Body accepted by the analysis endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub applicant_id: String,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
}

/// Router builder exposing HTTP endpoints for running and reading analyses.
pub fn analysis_router<X, R, S>(service: Arc<UnderwritingService<X, R, S>>) -> Router
where
    X: DocumentExtractor + 'static,
    R: AnalysisRepository + 'static,
    S: NarrativeSummarizer + 'static,
{
    Router::new()
        .route("/api/v1/analysis", post(analyze_handler::<X, R, S>))
        .route(
            "/api/v1/analysis/:analysis_id",
            get(analysis_handler::<X, R, S>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/analysis",
            get(history_handler::<X, R, S>),
        )
        .with_state(service)
}

pub(crate) async fn analyze_handler<X, R, S>(
    State(service): State<Arc<UnderwritingService<X, R, S>>>,
    axum::Json(request): axum::Json<AnalysisRequest>,
) -> Response
where
    X: DocumentExtractor + 'static,
    R: AnalysisRepository + 'static,
    S: NarrativeSummarizer + 'static,
{
    if request.applicant_id.trim().is_empty() {
        let payload = json!({ "error": "applicant_id is required" });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    }

    let applicant_id = ApplicantId(request.applicant_id);
    match service.analyze(applicant_id, request.documents).await {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(UnderwritingServiceError::Analysis(error @ AnalysisError::NoDocuments { .. })) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn analysis_handler<X, R, S>(
    State(service): State<Arc<UnderwritingService<X, R, S>>>,
    Path(analysis_id): Path<String>,
) -> Response
where
    X: DocumentExtractor + 'static,
    R: AnalysisRepository + 'static,
    S: NarrativeSummarizer + 'static,
{
    let id = AnalysisId(analysis_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(UnderwritingServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "analysis not found", "analysis_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn history_handler<X, R, S>(
    State(service): State<Arc<UnderwritingService<X, R, S>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    X: DocumentExtractor + 'static,
    R: AnalysisRepository + 'static,
    S: NarrativeSummarizer + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.history(&id) {
        Ok(records) => {
            let overviews: Vec<_> = records.iter().map(|record| record.overview()).collect();
            (StatusCode::OK, axum::Json(overviews)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

fn internal_error(error: UnderwritingServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
