//! Request handlers.
//!
//! Handlers only translate between HTTP and [`QaService`](plotbot_core::QaService);
//! the lookups themselves live in `plotbot-core`.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use plotbot_core::Dataset;
use serde::Deserialize;
use tracing::{debug, instrument};
use utoipa::{IntoParams, OpenApi};

use crate::AppState;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::types::{AnswerResponse, HealthResponse, HealthStatus, StatusResponse};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnswerQuery {
    /// Question text, matched exactly
    pub question: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "plotbot",
    responses((status = 200, description = "Service is running", body = StatusResponse))
)]
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse::running())
}

#[utoipa::path(
    get,
    path = "/menu",
    tag = "plotbot",
    responses(
        (status = 200, description = "Subjects in first-appearance order", body = [String]),
        (status = 500, description = "Data failed to load", body = ApiErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn menu(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let subjects = state.service.subjects()?;
    debug!(subjects = subjects.len(), "Serving main menu");
    Ok(Json(subjects.to_vec()))
}

#[utoipa::path(
    get,
    path = "/questions/{subject}",
    tag = "plotbot",
    params(("subject" = String, Path, description = "Subject name, matched exactly")),
    responses(
        (status = 200, description = "Questions of the subject in table order", body = [String]),
        (status = 404, description = "Unknown subject", body = ApiErrorResponse),
        (status = 500, description = "Data failed to load", body = ApiErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn questions(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    let questions = state.service.questions(&subject)?;
    Ok(Json(questions.to_vec()))
}

#[utoipa::path(
    get,
    path = "/answer",
    tag = "plotbot",
    params(AnswerQuery),
    responses(
        (
            status = 200,
            description = "Matched answer, or the fallback sentence",
            body = AnswerResponse
        ),
        (status = 500, description = "Data failed to load or lookup fault", body = ApiErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn answer(
    State(state): State<AppState>,
    Query(query): Query<AnswerQuery>,
) -> ApiResult<Json<AnswerResponse>> {
    let answer = state.service.answer(&query.question)?;
    debug!(fallback = answer.is_fallback(), "Answered question");
    Ok(Json(answer.into()))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "plotbot",
    responses((status = 200, description = "Service and data status", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, subjects, rows, reason) = match state.service.dataset() {
        Dataset::Loaded(index) => {
            (HealthStatus::Healthy, index.subject_count(), index.row_count(), None)
        }
        Dataset::Unavailable { reason } => (HealthStatus::Degraded, 0, 0, Some(reason.clone())),
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.elapsed().as_secs(),
        subjects,
        rows,
        reason,
    })
}

#[derive(OpenApi)]
#[openapi(
    info(title = "PlotBot API", description = "Read-only question/answer lookup"),
    paths(root, menu, questions, answer, health),
    components(schemas(
        StatusResponse,
        AnswerResponse,
        HealthResponse,
        HealthStatus,
        ApiErrorResponse
    )),
    tags((name = "plotbot", description = "Subject menu and answer lookup"))
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
