use std::sync::Arc;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use serde::Deserialize;
use tracing::{info, warn};
use crate::core::error::Error;
use crate::index::SearchIndex;
use crate::search::service::{SearchResponse, SearchService, TypeaheadResponse};

#[derive(Debug, Deserialize)]
struct QueryParams {
    #[serde(default)]
    q: String,
}

/// Error body for failed requests. No partial results are ever returned.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_index_failure() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        warn!(status = status.as_u16(), error = %self.0, "Request failed");
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub fn router<I: SearchIndex + 'static>(service: Arc<SearchService<I>>) -> Router {
    Router::new()
        .route("/search/", get(search::<I>))
        .route("/typeahead/", get(typeahead::<I>))
        .with_state(service)
}

pub async fn serve<I: SearchIndex + 'static>(service: Arc<SearchService<I>>, bind_addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(service)).await
}

async fn search<I: SearchIndex + 'static>(
    State(service): State<Arc<SearchService<I>>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    Ok(Json(service.search(params.q.as_str()).await?))
}

async fn typeahead<I: SearchIndex + 'static>(
    State(service): State<Arc<SearchService<I>>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<TypeaheadResponse>, ApiError> {
    Ok(Json(service.typeahead(&params.q).await?))
}
