use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config::{AppConfig, SmtpConfig},
    error::AppError,
    models::{participant::Participant, trip::Trip},
};

/// A fully composed message, independent of the transport that will carry it.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to_name: Option<String>,
    pub to_address: String,
    pub subject: String,
    pub html_body: String,
}

/// Transport diagnostic for a delivered message, e.g. the SMTP response line.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub detail: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<DeliveryReceipt, AppError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> Result<Self, AppError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.host).port(cfg.port);
        if let (Some(username), Some(password)) = (&cfg.username, &cfg.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from_address: Address = cfg
            .from_address
            .parse()
            .map_err(|err| AppError::Config(format!("invalid MAIL_FROM_ADDRESS: {err}")))?;

        Ok(Self {
            transport: builder.build(),
            from: Mailbox::new(Some(cfg.from_name.clone()), from_address),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<DeliveryReceipt, AppError> {
        let OutgoingEmail {
            to_name,
            to_address,
            subject,
            html_body,
        } = email;

        let to_address: Address = to_address
            .parse()
            .map_err(|err| AppError::Validation(format!("invalid recipient address: {err}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(to_name, to_address))
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(|err| AppError::Mail(err.into()))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|err| AppError::Mail(err.into()))?;

        let detail = format!(
            "{} {}",
            response.code(),
            response.message().collect::<Vec<_>>().join(" ")
        );
        Ok(DeliveryReceipt { detail })
    }
}

/// Mail asking the owner to confirm the trip they just created.
pub fn trip_confirmation_request(
    config: &AppConfig,
    trip: &Trip,
    owner_name: &str,
    owner_email: &str,
) -> OutgoingEmail {
    let link = config.trip_confirmation_link(&trip.id);
    OutgoingEmail {
        to_name: Some(owner_name.to_string()),
        to_address: owner_email.to_string(),
        subject: format!("Confirm your trip to {}", trip.destination),
        html_body: confirmation_body(
            trip,
            &link,
            "You requested the creation of a trip to",
            "To confirm your trip, use the link below:",
        ),
    }
}

/// Mail asking an invitee to confirm their presence. Sent on invite creation
/// and again to every pending participant once the owner confirms the trip.
pub fn participant_confirmation(
    config: &AppConfig,
    trip: &Trip,
    participant: &Participant,
) -> OutgoingEmail {
    let link = config.participant_confirmation_link(&participant.id);
    OutgoingEmail {
        to_name: participant.name.clone(),
        to_address: participant.email.clone(),
        subject: format!("You are invited to a trip to {}", trip.destination),
        html_body: confirmation_body(
            trip,
            &link,
            "You have been invited to a trip to",
            "To confirm your presence on the trip, use the link below:",
        ),
    }
}

fn confirmation_body(trip: &Trip, link: &str, intro: &str, call_to_action: &str) -> String {
    let starts = format_long_date(trip.starts_at);
    let ends = format_long_date(trip.ends_at);
    format!(
        r#"<div>
  <p>{intro} <strong>{destination}</strong> from <strong>{starts}</strong> to <strong>{ends}</strong>.</p>
  <p>{call_to_action}</p>
  <p><a href="{link}">Confirm trip</a></p>
  <p>If you don't know what this email is about, just ignore it.</p>
</div>"#,
        destination = trip.destination,
    )
}

fn format_long_date(date: DateTime<Utc>) -> String {
    // "July 9, 2026"
    date.format("%B %-d, %Y").to_string()
}
