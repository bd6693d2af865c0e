use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use workshop_mcp::jsonrpc::PARSE_ERROR;
use workshop_mcp::JsonRpcResponse;

use crate::app_state::AppState;

/// Handle one JSON-RPC request.
///
/// Routed requests answer 200 whether they succeeded or not; bodies that are
/// not JSON, or lack a `method`, answer 400.
pub async fn mcp_request(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<JsonRpcResponse>) {
    let request_id = Uuid::new_v4();

    let request: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(%request_id, error = %err, "rejected unparseable request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(Value::Null, PARSE_ERROR, "Parse error")),
            );
        }
    };

    let method = request
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let span = tracing::info_span!("mcp_request", %request_id, %method);

    let dispatch = state.dispatcher.dispatch(&request).instrument(span).await;
    if dispatch.is_rejected() {
        tracing::warn!(%request_id, "rejected invalid request envelope");
        return (StatusCode::BAD_REQUEST, Json(dispatch.into_response()));
    }

    (StatusCode::OK, Json(dispatch.into_response()))
}
