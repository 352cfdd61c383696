use std::sync::Arc;

use planner::config::AppConfig;
use planner::db::init_pool;
use planner::error::AppError;
use planner::repo::TripRepository;
use planner::routes::create_router;
use planner::services::{mail::SmtpMailer, trips::TripService};
use planner::state::AppState;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let db = init_pool(&config.database_url).await?;

    if let Err(err) = sqlx::migrate!("./migrations").run(&db).await {
        error!("migration failed: {err:?}");
        return Err(AppError::Other(err.into()));
    }

    let mailer = Arc::new(SmtpMailer::new(&config.smtp)?);
    let repo = TripRepository::new(db.clone());
    let trips = TripService::new(repo, mailer, config.clone());

    let state = AppState::new(config.clone(), db, trips);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,planner=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
