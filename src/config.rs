use std::{env, net::SocketAddr};

use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    /// Base URL the confirmation links in outgoing mail point back to.
    pub api_base_url: Url,
    /// Base URL of the frontend, used as redirect target after confirmation.
    pub web_base_url: Url,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_name: String,
    pub from_address: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://planner.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3333".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let api_base_url = parse_base_url("API_BASE_URL", "http://localhost:3333")?;
        let web_base_url = parse_base_url("WEB_BASE_URL", "http://localhost:3000")?;

        let smtp = SmtpConfig {
            host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "1025".to_string())
                .parse()
                .map_err(|err| AppError::Config(format!("invalid SMTP_PORT: {err}")))?,
            username: env::var("SMTP_USERNAME").ok(),
            password: env::var("SMTP_PASSWORD").ok(),
            from_name: env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "plann.er team".to_string()),
            from_address: env::var("MAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| "hi@plann.er".to_string()),
        };

        Ok(Self {
            database_url,
            listen_addr,
            api_base_url,
            web_base_url,
            smtp,
        })
    }

    pub fn trip_confirmation_link(&self, trip_id: &str) -> String {
        format!("{}/trips/{trip_id}/confirm", base(&self.api_base_url))
    }

    pub fn participant_confirmation_link(&self, participant_id: &str) -> String {
        format!(
            "{}/participants/{participant_id}/confirm",
            base(&self.api_base_url)
        )
    }

    pub fn trip_page_link(&self, trip_id: &str) -> String {
        format!("{}/trips/{trip_id}", base(&self.web_base_url))
    }
}

fn parse_base_url(key: &str, default: &str) -> Result<Url, AppError> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|err| AppError::Config(format!("invalid {key}: {err}")))
}

fn base(url: &Url) -> &str {
    url.as_str().trim_end_matches('/')
}
