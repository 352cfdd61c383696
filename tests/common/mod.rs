use std::{
    fmt,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use async_trait::async_trait;
use planner::{
    config::{AppConfig, SmtpConfig},
    db::init_pool,
    error::AppError,
    repo::TripRepository,
    services::{
        mail::{DeliveryReceipt, Mailer, OutgoingEmail},
        trips::TripService,
    },
    state::AppState,
};
use tempfile::TempDir;

/// Mailer double that records every message instead of delivering it.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().expect("outbox lock").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<DeliveryReceipt, AppError> {
        self.sent.lock().expect("outbox lock").push(email);
        Ok(DeliveryReceipt {
            detail: "250 recorded".into(),
        })
    }
}

/// Application state over a throwaway sqlite database and a recording outbox.
pub struct TestApp {
    pub state: AppState,
    pub outbox: RecordingMailer,
    _root: TempDir,
}

impl fmt::Debug for TestApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestApp").finish()
    }
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for test app")?;
        let db_path = root.path().join("planner.sqlite");
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());

        let config = AppConfig {
            database_url: database_url.clone(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            api_base_url: "http://localhost:3333".parse()?,
            web_base_url: "http://localhost:3000".parse()?,
            smtp: SmtpConfig {
                host: "localhost".into(),
                port: 1025,
                username: None,
                password: None,
                from_name: "plann.er team".into(),
                from_address: "hi@plann.er".into(),
            },
        };

        let db = init_pool(&config.database_url).await?;
        sqlx::migrate!("./migrations").run(&db).await?;

        let outbox = RecordingMailer::default();
        let repo = TripRepository::new(db.clone());
        let trips = TripService::new(repo, Arc::new(outbox.clone()), config.clone());
        let state = AppState::new(config, db, trips);

        Ok(Self {
            state,
            outbox,
            _root: root,
        })
    }
}
