use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use crate::error::RelayResult;
use crate::services::{AuthExchangeResult, StreamRecord};
use crate::AppState;

/// Body of the authorization callback
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CallbackRequest {
    #[serde(default)]
    code: Option<String>,
}

/// `GET /api/twitch/streams`
pub(crate) async fn list_streams(
    State(state): State<AppState>,
) -> RelayResult<Json<Vec<StreamRecord>>> {
    let records = state.streams.list_streams().await?;
    Ok(Json(records))
}

/// `POST /auth/twitch/callback`
///
/// A missing or unparsable body is handled like a body without `code`.
pub(crate) async fn twitch_callback(
    State(state): State<AppState>,
    payload: Result<Json<CallbackRequest>, JsonRejection>,
) -> RelayResult<Json<AuthExchangeResult>> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(%rejection, "Callback body rejected");
            CallbackRequest::default()
        }
    };

    let result = state
        .authorization
        .exchange_code(request.code.as_deref())
        .await?;
    Ok(Json(result))
}
