use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: String,
    pub trip_id: String,
    pub name: Option<String>,
    pub email: String,
    pub is_owner: bool,
    pub is_confirmed: bool,
}

#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub name: Option<String>,
    pub email: String,
    pub is_owner: bool,
    pub is_confirmed: bool,
}

impl NewParticipant {
    /// The trip owner is created confirmed; there is exactly one per trip.
    pub fn owner(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
            is_owner: true,
            is_confirmed: true,
        }
    }

    pub fn invitee(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
            is_owner: false,
            is_confirmed: false,
        }
    }
}
