pub mod invites;
pub mod trips;

use axum::Router;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(trips::router())
        .merge(invites::router())
        .with_state(state)
}
