use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::appointment::Appointment;
use crate::models::locale::Locale;
use crate::service::remaining_time::format_until;

pub const MESSAGE_TYPE: &str = "Message";
pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";
pub const ADAPTIVE_CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
pub const ADAPTIVE_CARD_VERSION: &str = "1.5";
pub const REMAINING_PLACEHOLDER: &str = "%t";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub attachments: Vec<CardAttachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardAttachment {
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub content: AdaptiveCard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveCard {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub body: Vec<CardElement>,
    pub actions: Vec<CardAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CardElement {
    TextBlock(TextBlock),
    FactSet { facts: Vec<Fact> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub text: String,
    pub wrap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CardAction {
    #[serde(rename = "Action.OpenUrl")]
    OpenUrl { title: String, url: String },
}

/// Presentation settings shared by every card of a run.
#[derive(Debug, Clone)]
pub struct CardOptions {
    pub locale: Locale,
    pub timezone: Tz,
    pub location: String,
}

pub struct CardService;

impl CardService {
    pub fn build_card(
        appointment: &Appointment,
        options: &CardOptions,
        now: DateTime<Utc>,
    ) -> CardMessage {
        let strings = options.locale.strings();
        let begin = appointment.begin.with_timezone(&options.timezone);
        let end = appointment.end.with_timezone(&options.timezone);
        let message = appointment.message.replace(
            REMAINING_PLACEHOLDER,
            &format_until(appointment.remaining(now), options.locale),
        );

        let facts = vec![
            fact(strings.fact_date, begin.format("%d.%m.%Y").to_string()),
            fact(strings.fact_begin, begin.format("%H:%M").to_string()),
            fact(strings.fact_end, end.format("%H:%M").to_string()),
            fact(strings.fact_location, options.location.clone()),
        ];

        CardMessage {
            kind: MESSAGE_TYPE.to_string(),
            attachments: vec![CardAttachment {
                content_type: ADAPTIVE_CARD_CONTENT_TYPE.to_string(),
                content: AdaptiveCard {
                    schema: ADAPTIVE_CARD_SCHEMA.to_string(),
                    version: ADAPTIVE_CARD_VERSION.to_string(),
                    kind: "AdaptiveCard".to_string(),
                    body: vec![
                        CardElement::TextBlock(TextBlock {
                            size: Some("large".to_string()),
                            weight: Some("bolder".to_string()),
                            style: Some("heading".to_string()),
                            text: appointment.title.clone(),
                            wrap: true,
                        }),
                        CardElement::TextBlock(TextBlock {
                            size: None,
                            weight: None,
                            style: None,
                            text: message,
                            wrap: true,
                        }),
                        CardElement::FactSet { facts },
                    ],
                    actions: vec![CardAction::OpenUrl {
                        title: strings.open_link.to_string(),
                        url: appointment.link.clone(),
                    }],
                },
            }],
        }
    }
}

fn fact(title: &str, value: String) -> Fact {
    Fact {
        title: title.to_string(),
        value,
    }
}
