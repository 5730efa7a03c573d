use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::catalog::CatalogError;
use super::domain::{CompanyId, Criterion, SelectionMap};
use super::evaluation::EvaluationError;
use super::repository::{PersistenceError, SelectionStore};
use super::service::{ClassificationService, ClassificationServiceError};

/// Request body carrying criterion key to option label pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionsPayload {
    pub selections: SelectionMap,
}

#[derive(Debug, Serialize)]
struct CriteriaView<'a> {
    rubric_version: &'a str,
    maximum_score: u16,
    criteria: &'a [Criterion],
}

/// Router builder exposing the classification matrix endpoints.
pub fn classification_router<S>(service: Arc<ClassificationService<S>>) -> Router
where
    S: SelectionStore + 'static,
{
    Router::new()
        .route("/api/v1/classification/criteria", get(criteria_handler::<S>))
        .route(
            "/api/v1/classification/companies/:company_id",
            get(classification_handler::<S>),
        )
        .route(
            "/api/v1/classification/companies/:company_id/selections",
            patch(update_handler::<S>),
        )
        .route("/api/v1/classification/preview", post(preview_handler::<S>))
        .with_state(service)
}

pub(crate) async fn criteria_handler<S>(
    State(service): State<Arc<ClassificationService<S>>>,
) -> Response
where
    S: SelectionStore + 'static,
{
    let catalog = service.catalog();
    let view = CriteriaView {
        rubric_version: catalog.version(),
        maximum_score: catalog.maximum_possible_score(),
        criteria: catalog.list_criteria(),
    };
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn classification_handler<S>(
    State(service): State<Arc<ClassificationService<S>>>,
    Path(company_id): Path<String>,
) -> Response
where
    S: SelectionStore + 'static,
{
    match service.classification(&CompanyId(company_id)).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<S>(
    State(service): State<Arc<ClassificationService<S>>>,
    Path(company_id): Path<String>,
    axum::Json(payload): axum::Json<SelectionsPayload>,
) -> Response
where
    S: SelectionStore + 'static,
{
    let company_id = CompanyId(company_id);
    match service
        .update_selections(&company_id, &payload.selections)
        .await
    {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn preview_handler<S>(
    State(service): State<Arc<ClassificationService<S>>>,
    axum::Json(payload): axum::Json<SelectionsPayload>,
) -> Response
where
    S: SelectionStore + 'static,
{
    match service.preview(&payload.selections) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ClassificationServiceError) -> Response {
    let status = match &err {
        ClassificationServiceError::Catalog(
            CatalogError::UnknownCriterion(_) | CatalogError::UnknownOption { .. },
        )
        | ClassificationServiceError::Evaluation(
            EvaluationError::Incomplete { .. } | EvaluationError::UnexpectedCriterion { .. },
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        ClassificationServiceError::Persistence(PersistenceError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        ClassificationServiceError::Persistence(PersistenceError::Rejected(_)) => {
            StatusCode::CONFLICT
        }
        ClassificationServiceError::Persistence(PersistenceError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ClassificationServiceError::Catalog(_)
        | ClassificationServiceError::Evaluation(_)
        | ClassificationServiceError::NotLoaded => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
