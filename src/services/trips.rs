use std::sync::Arc;

use chrono::{DateTime, Utc};
use lettre::Address;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::AppError,
    models::{participant::NewParticipant, trip::NewTrip},
    repo::TripRepository,
    services::mail::{self, Mailer, OutgoingEmail},
};

pub struct CreateTrip {
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
    pub emails_to_invite: Vec<String>,
}

/// Orchestrates the trip lifecycle: validate, write through the repository,
/// then notify by mail. Mail is best-effort in every flow; a failed send is
/// logged and never rolls back or fails the request.
#[derive(Clone)]
pub struct TripService {
    repo: TripRepository,
    mailer: Arc<dyn Mailer>,
    config: AppConfig,
}

impl TripService {
    pub fn new(repo: TripRepository, mailer: Arc<dyn Mailer>, config: AppConfig) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    pub fn repo(&self) -> &TripRepository {
        &self.repo
    }

    /// Creates the trip together with its owner and one pending participant
    /// per invited address, then mails the owner a confirmation link.
    /// Returns the new trip id.
    pub async fn create_trip(&self, input: CreateTrip) -> Result<String, AppError> {
        if input.destination.chars().count() < 4 {
            return Err(AppError::Validation(
                "destination must be at least 4 characters long".into(),
            ));
        }
        parse_email(&input.owner_email)?;
        for email in &input.emails_to_invite {
            parse_email(email)?;
        }
        if input.starts_at < Utc::now() {
            return Err(AppError::InvalidDate("trip cannot start in the past".into()));
        }
        if input.ends_at < input.starts_at {
            return Err(AppError::InvalidDate(
                "trip cannot end before it starts".into(),
            ));
        }

        let mut participants = vec![NewParticipant::owner(&input.owner_name, &input.owner_email)];
        participants.extend(
            input
                .emails_to_invite
                .iter()
                .map(|email| NewParticipant::invitee(email)),
        );

        let trip = self
            .repo
            .create_trip_with_participants(
                NewTrip {
                    destination: input.destination,
                    starts_at: input.starts_at,
                    ends_at: input.ends_at,
                },
                participants,
            )
            .await?;
        info!(trip_id = %trip.id, destination = %trip.destination, "trip created");

        let message =
            mail::trip_confirmation_request(&self.config, &trip, &input.owner_name, &input.owner_email);
        self.send_best_effort(message).await;

        Ok(trip.id)
    }

    /// Adds one pending participant to an existing trip and mails them their
    /// confirmation link. Duplicate invites to the same address are allowed.
    /// Returns the new participant id.
    pub async fn create_invite(&self, trip_id: Uuid, email: &str) -> Result<String, AppError> {
        parse_email(email)?;
        let trip = self.repo.find_trip(trip_id).await?.ok_or(AppError::NotFound)?;

        let participant = self.repo.create_participant(&trip.id, email).await?;
        info!(trip_id = %trip.id, participant_id = %participant.id, "participant invited");

        let message = mail::participant_confirmation(&self.config, &trip, &participant);
        self.send_best_effort(message).await;

        Ok(participant.id)
    }

    /// Marks the trip confirmed and mails every non-owner participant their
    /// confirmation link. Confirming an already confirmed trip writes and
    /// sends nothing. Returns the frontend page to redirect to.
    pub async fn confirm_trip(&self, trip_id: Uuid) -> Result<String, AppError> {
        let trip = self.repo.find_trip(trip_id).await?.ok_or(AppError::NotFound)?;
        let target = self.config.trip_page_link(&trip.id);
        if trip.is_confirmed {
            return Ok(target);
        }

        // The confirmed state is authoritative before any mail goes out.
        self.repo.set_trip_confirmed(&trip.id).await?;
        info!(trip_id = %trip.id, "trip confirmed");

        let participants = self.repo.list_non_owner_participants(&trip.id).await?;
        let mut sends = JoinSet::new();
        for participant in participants {
            let mailer = Arc::clone(&self.mailer);
            let message = mail::participant_confirmation(&self.config, &trip, &participant);
            sends.spawn(async move {
                let to = message.to_address.clone();
                (to, mailer.send(message).await)
            });
        }
        while let Some(joined) = sends.join_next().await {
            match joined {
                Ok((to, Ok(receipt))) => {
                    info!(%to, handle = %receipt.detail, "confirmation email sent")
                }
                Ok((to, Err(err))) => warn!(%to, "confirmation email failed: {err}"),
                Err(err) => warn!("confirmation email task failed: {err}"),
            }
        }

        Ok(target)
    }

    async fn send_best_effort(&self, message: OutgoingEmail) {
        let to = message.to_address.clone();
        match self.mailer.send(message).await {
            Ok(receipt) => info!(%to, handle = %receipt.detail, "confirmation email sent"),
            Err(err) => warn!(%to, "confirmation email failed: {err}"),
        }
    }
}

fn parse_email(raw: &str) -> Result<Address, AppError> {
    raw.parse::<Address>()
        .map_err(|_| AppError::Validation(format!("invalid email address: {raw}")))
}
