//! Generation endpoint: one SSE stream per request

use axum::{
    body::Bytes,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};

use crate::error::AppError;
use crate::types::GenerateRequest;
use crate::AppState;

/// Each SSE `data:` line carries one serialized generation event. The stream
/// ends right after the terminal `complete` or `error` event.
pub(crate) async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let request: GenerateRequest = serde_json::from_slice(&body)?;
    let request = request.into_generation_request()?;

    let session = sitesmith_core::generate(request, state.deps.clone());
    tracing::info!(session_id = %session.id(), "Generation requested");

    let stream = session
        .into_stream()
        .map(|event| Event::default().json_data(&event));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
