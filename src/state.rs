use crate::{config::AppConfig, db::DbPool, services::trips::TripService};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    pub trips: TripService,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool, trips: TripService) -> Self {
        Self { config, db, trips }
    }
}
