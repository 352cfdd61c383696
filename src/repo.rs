use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        participant::{NewParticipant, Participant},
        trip::{NewTrip, Trip},
    },
};

/// All persistence for trips and their participants. Ids are v4 uuids
/// stored as TEXT.
#[derive(Clone)]
pub struct TripRepository {
    db: DbPool,
}

impl TripRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>(
            "SELECT id, destination, starts_at, ends_at, is_confirmed FROM trips WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.db)
        .await?;
        Ok(trip)
    }

    /// Writes the trip and its full participant list in one transaction, so a
    /// failed insert never leaves a trip with a partial participant set.
    pub async fn create_trip_with_participants(
        &self,
        new_trip: NewTrip,
        participants: Vec<NewParticipant>,
    ) -> Result<Trip, AppError> {
        let trip = Trip {
            id: Uuid::new_v4().to_string(),
            destination: new_trip.destination,
            starts_at: new_trip.starts_at,
            ends_at: new_trip.ends_at,
            is_confirmed: false,
        };

        let mut tx = self.db.begin().await?;
        sqlx::query(
            "INSERT INTO trips (id, destination, starts_at, ends_at, is_confirmed) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&trip.id)
        .bind(&trip.destination)
        .bind(trip.starts_at)
        .bind(trip.ends_at)
        .bind(trip.is_confirmed)
        .execute(&mut *tx)
        .await?;

        for participant in &participants {
            sqlx::query(
                "INSERT INTO participants (id, trip_id, name, email, is_owner, is_confirmed) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&trip.id)
            .bind(&participant.name)
            .bind(&participant.email)
            .bind(participant.is_owner)
            .bind(participant.is_confirmed)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(trip)
    }

    pub async fn set_trip_confirmed(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE trips SET is_confirmed = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    pub async fn create_participant(
        &self,
        trip_id: &str,
        email: &str,
    ) -> Result<Participant, AppError> {
        let participant = Participant {
            id: Uuid::new_v4().to_string(),
            trip_id: trip_id.to_string(),
            name: None,
            email: email.to_string(),
            is_owner: false,
            is_confirmed: false,
        };
        sqlx::query(
            "INSERT INTO participants (id, trip_id, name, email, is_owner, is_confirmed) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&participant.id)
        .bind(&participant.trip_id)
        .bind(&participant.name)
        .bind(&participant.email)
        .bind(participant.is_owner)
        .bind(participant.is_confirmed)
        .execute(&self.db)
        .await?;
        Ok(participant)
    }

    pub async fn list_participants(&self, trip_id: &str) -> Result<Vec<Participant>, AppError> {
        let participants = sqlx::query_as::<_, Participant>(
            "SELECT id, trip_id, name, email, is_owner, is_confirmed FROM participants \
             WHERE trip_id = ?1 ORDER BY rowid",
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;
        Ok(participants)
    }

    pub async fn list_non_owner_participants(
        &self,
        trip_id: &str,
    ) -> Result<Vec<Participant>, AppError> {
        let participants = sqlx::query_as::<_, Participant>(
            "SELECT id, trip_id, name, email, is_owner, is_confirmed FROM participants \
             WHERE trip_id = ?1 AND is_owner = 0 ORDER BY rowid",
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;
        Ok(participants)
    }
}
