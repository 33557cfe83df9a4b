//! HTTP adapter for collection listings.
//!
//! Mounts `GET /v2/:collection` over every registered collection and maps
//! render failures onto the control plane's error body.

pub mod state;

use crate::core::RenderError;
use crate::query::{QueryFilter, QueryParams};
use crate::render::{DEFAULT_API_PREFIX, RenderedDocument};
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, warn};

pub use state::{ApiState, MemoryCollection};

pub const CODE_NOT_FOUND: u32 = 10000;
pub const CODE_SERVER_ERROR: u32 = 10001;
pub const CODE_INVALID_REQUEST: u32 = 10004;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u32,
    pub description: String,
    pub error_code: String,
}

#[derive(Debug)]
pub enum WebError {
    Render(RenderError),
    NotFound(String),
}

impl From<RenderError> for WebError {
    fn from(err: RenderError) -> Self {
        WebError::Render(err)
    }
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Render(RenderError::InvalidRequest { .. }) => StatusCode::BAD_REQUEST,
            WebError::Render(RenderError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, description, error_code) = match self {
            WebError::Render(err @ RenderError::InvalidRequest { .. }) => {
                warn!(error = %err, "rejected collection request");
                (CODE_INVALID_REQUEST, err.to_string(), "CF-InvalidRequest")
            }
            WebError::Render(err @ RenderError::Storage(_)) => {
                error!(error = %err, "collection render failed");
                (
                    CODE_SERVER_ERROR,
                    "An unknown error occurred.".to_string(),
                    "CF-ServerError",
                )
            }
            WebError::NotFound(message) => (CODE_NOT_FOUND, message, "CF-NotFound"),
        };

        let body = Json(ErrorResponse {
            code,
            description,
            error_code: error_code.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WebError>;

pub fn collection_router(state: ApiState) -> Router {
    Router::new()
        .route(&format!("{DEFAULT_API_PREFIX}/:collection"), get(list_collection))
        .with_state(state)
}

async fn list_collection(
    State(state): State<ApiState>,
    Path(collection): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<RenderedDocument>> {
    let entry = state.collection(&collection).ok_or_else(|| {
        WebError::NotFound(format!("Unknown collection: {collection}"))
    })?;

    let params = QueryParams::parse(query.as_deref().unwrap_or_default());
    let filters = QueryFilter::from_params(&params, &entry.descriptor)?;

    let dataset = if filters.is_empty() {
        entry.dataset.clone()
    } else {
        entry
            .dataset
            .filtered(move |row| filters.iter().all(|filter| filter.matches(row)))
    };

    let document = state.renderer().render_query(
        &entry.descriptor,
        &dataset,
        &entry.descriptor.base_path(),
        &params,
    )?;

    Ok(Json(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invalid_request_maps_to_400() {
        let err = WebError::from(RenderError::invalid("results_per_page", "must be <= 100"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body["code"], 10004);
        assert_eq!(body["error_code"], "CF-InvalidRequest");
        assert!(
            body["description"]
                .as_str()
                .unwrap()
                .contains("results_per_page must be <= 100")
        );
    }

    #[tokio::test]
    async fn storage_error_hides_details() {
        let err = WebError::from(RenderError::Storage("lock poisoned".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body["error_code"], "CF-ServerError");
        assert!(!body["description"].as_str().unwrap().contains("poisoned"));
    }

    #[test]
    fn not_found_status() {
        assert_eq!(
            WebError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
    }
}
