use axum::{
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{participant::Participant, trip::Trip},
    services::trips::CreateTrip,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", post(create_trip))
        .route("/trips/:trip_id", get(trip_details))
        .route("/trips/:trip_id/confirm", get(confirm_trip))
        .route("/trips/:trip_id/participants", get(trip_participants))
}

#[derive(Deserialize)]
struct CreateTripRequest {
    destination: String,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    owner_name: String,
    owner_email: String,
    #[serde(default)]
    emails_to_invite: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTripResponse {
    trip_id: String,
}

async fn create_trip(
    State(state): State<AppState>,
    Json(body): Json<CreateTripRequest>,
) -> Result<Json<CreateTripResponse>, AppError> {
    let trip_id = state
        .trips
        .create_trip(CreateTrip {
            destination: body.destination,
            starts_at: body.starts_at,
            ends_at: body.ends_at,
            owner_name: body.owner_name,
            owner_email: body.owner_email,
            emails_to_invite: body.emails_to_invite,
        })
        .await?;
    Ok(Json(CreateTripResponse { trip_id }))
}

#[derive(Serialize)]
struct TripDetailsResponse {
    trip: Trip,
}

async fn trip_details(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripDetailsResponse>, AppError> {
    let trip = state
        .trips
        .repo()
        .find_trip(trip_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(TripDetailsResponse { trip }))
}

async fn confirm_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Redirect, AppError> {
    let target = state.trips.confirm_trip(trip_id).await?;
    Ok(Redirect::to(&target))
}

#[derive(Serialize)]
struct TripParticipantsResponse {
    participants: Vec<ParticipantView>,
}

#[derive(Serialize)]
struct ParticipantView {
    id: String,
    name: Option<String>,
    email: String,
    is_confirmed: bool,
}

impl From<Participant> for ParticipantView {
    fn from(participant: Participant) -> Self {
        Self {
            id: participant.id,
            name: participant.name,
            email: participant.email,
            is_confirmed: participant.is_confirmed,
        }
    }
}

async fn trip_participants(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripParticipantsResponse>, AppError> {
    let repo = state.trips.repo();
    let trip = repo.find_trip(trip_id).await?.ok_or(AppError::NotFound)?;
    let participants = repo
        .list_participants(&trip.id)
        .await?
        .into_iter()
        .map(ParticipantView::from)
        .collect();
    Ok(Json(TripParticipantsResponse { participants }))
}
