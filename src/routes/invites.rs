use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/trips/:trip_id/invites", post(create_invite))
}

#[derive(Deserialize)]
struct CreateInviteRequest {
    email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateInviteResponse {
    participant_id: String,
}

async fn create_invite(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(body): Json<CreateInviteRequest>,
) -> Result<Json<CreateInviteResponse>, AppError> {
    let participant_id = state.trips.create_invite(trip_id, &body.email).await?;
    Ok(Json(CreateInviteResponse { participant_id }))
}
