use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use nr_pipeline::{EventBody, HandlerResponse, IngestEvent, ResponseBody};
use serde_json::json;
use std::sync::Arc;
use crate::AppState;

/// Renders a workflow result as an HTTP response.
pub struct ApiResponse(pub HandlerResponse);

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match self.0.body {
            ResponseBody::Json(value) => (status, Json(value)).into_response(),
            ResponseBody::Text(text) => {
                (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response()
            }
        }
    }
}

pub async fn list_articles(State(state): State<Arc<AppState>>) -> ApiResponse {
    ApiResponse(state.listing.handle().await)
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// Headers and raw body are handed to the workflow unparsed so HTTP and
/// event-driven invocations go through the same normalization.
pub async fn ingest_article(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResponse {
    ApiResponse(state.ingest.handle(&to_event(&headers, &body)).await)
}

fn to_event(headers: &HeaderMap, body: &Bytes) -> IngestEvent {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    IngestEvent {
        headers,
        body: (!body.is_empty()).then(|| EventBody::Text(String::from_utf8_lossy(body).into_owned())),
    }
}
