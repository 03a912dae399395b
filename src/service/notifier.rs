use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::webhook_client::{WebhookClient, WebhookResponse};
use crate::models::appointment::Appointment;
use crate::service::card_service::{CardMessage, CardOptions, CardService};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait CardSender: Send + Sync {
    async fn post_card(&self, card: &CardMessage) -> Result<WebhookResponse, NotifyError>;
}

#[async_trait]
impl CardSender for WebhookClient {
    async fn post_card(&self, card: &CardMessage) -> Result<WebhookResponse, NotifyError> {
        Ok(self.post_json(card).await?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { status: u16 },
    Rejected { status: u16, body: String },
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Builds the card for an appointment and posts it once.
/// Failures are reported through the log and the returned outcome only.
pub struct Notifier<S: ?Sized> {
    options: CardOptions,
    sender: Box<S>,
}

impl<S: CardSender + ?Sized> Notifier<S> {
    pub fn new(sender: Box<S>, options: CardOptions) -> Self {
        Self { options, sender }
    }

    pub fn options(&self) -> &CardOptions {
        &self.options
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    pub async fn send(&self, appointment: &Appointment, now: DateTime<Utc>) -> DeliveryOutcome {
        let strings = self.options.locale.strings();
        let card = CardService::build_card(appointment, &self.options, now);

        match self.sender.post_card(&card).await {
            Ok(response) if response.is_success() => {
                info!(status = response.status, "{}", strings.sent);
                DeliveryOutcome::Delivered {
                    status: response.status,
                }
            }
            Ok(response) => {
                match response.error_detail() {
                    Some(detail) => warn!(
                        status = response.status,
                        code = %detail.code,
                        detail = %detail.message,
                        "{} {}: '{}'",
                        strings.rejected,
                        response.status,
                        response.body
                    ),
                    None => warn!(
                        status = response.status,
                        "{} {}: '{}'",
                        strings.rejected,
                        response.status,
                        response.body
                    ),
                }
                DeliveryOutcome::Rejected {
                    status: response.status,
                    body: response.body,
                }
            }
            Err(err) => {
                warn!(error = %err, "{}: {}", strings.failed, err);
                DeliveryOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::locale::Locale;
    use chrono::TimeZone;
    use chrono_tz::Europe::Berlin;

    struct ScriptedSender {
        reply: Result<WebhookResponse, String>,
    }

    #[async_trait]
    impl CardSender for ScriptedSender {
        async fn post_card(&self, _card: &CardMessage) -> Result<WebhookResponse, NotifyError> {
            self.reply.clone().map_err(NotifyError::Other)
        }
    }

    fn notifier(reply: Result<WebhookResponse, String>) -> Notifier<ScriptedSender> {
        Notifier::new(
            Box::new(ScriptedSender { reply }),
            CardOptions {
                locale: Locale::De,
                timezone: Berlin,
                location: "Teams".to_string(),
            },
        )
    }

    fn appointment() -> Appointment {
        let begin = Utc.with_ymd_and_hms(2024, 10, 30, 13, 30, 0).unwrap();
        Appointment::new("Ressortmeeting", "", begin, begin, "https://example.com/channel").unwrap()
    }

    #[tokio::test]
    async fn reports_delivery_on_2xx() {
        let outcome = notifier(Ok(WebhookResponse { status: 202, body: String::new() }))
            .send(&appointment(), Utc::now())
            .await;
        assert_eq!(outcome, DeliveryOutcome::Delivered { status: 202 });
        assert!(outcome.is_delivered());
    }

    #[tokio::test]
    async fn keeps_status_and_body_on_rejection() {
        let body = r#"{"error":{"code":"Unauthorized","message":"sig invalid"}}"#;
        let outcome = notifier(Ok(WebhookResponse { status: 401, body: body.to_string() }))
            .send(&appointment(), Utc::now())
            .await;
        assert_eq!(
            outcome,
            DeliveryOutcome::Rejected {
                status: 401,
                body: body.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn transport_errors_become_failed_outcome() {
        let outcome = notifier(Err("connection refused".to_string()))
            .send(&appointment(), Utc::now())
            .await;
        assert_eq!(
            outcome,
            DeliveryOutcome::Failed {
                reason: "connection refused".to_string(),
            }
        );
    }
}
