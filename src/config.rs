use chrono_tz::Tz;
use reqwest::Url;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use thiserror::Error;

use crate::models::appointment::{Appointment, parse_timestamp, validate_http_url};
use crate::models::lead_time::{DEFAULT_LEAD_TIMES, LeadTimes};
use crate::models::locale::Locale;
use crate::service::card_service::CardOptions;

pub const WEBHOOK_URL: &str = "WEBHOOK_URL";
pub const APPOINTMENT_TITLE: &str = "APPOINTMENT_TITLE";
pub const APPOINTMENT_MESSAGE: &str = "APPOINTMENT_MESSAGE";
pub const APPOINTMENT_BEGIN: &str = "APPOINTMENT_BEGIN";
pub const APPOINTMENT_END: &str = "APPOINTMENT_END";
pub const APPOINTMENT_LINK: &str = "APPOINTMENT_LINK";
pub const REMINDER_LEAD_TIMES: &str = "REMINDER_LEAD_TIMES";
pub const REMINDER_LOCALE: &str = "REMINDER_LOCALE";
pub const TIMEZONE: &str = "TIMEZONE";
pub const POLL_INTERVAL_SECS: &str = "POLL_INTERVAL_SECS";
pub const LOCATION_LABEL: &str = "LOCATION_LABEL";

const DEFAULT_TIMEZONE: &str = "Europe/Berlin";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_LOCATION_LABEL: &str = "Teams";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },
    #[error("{0} must be set")]
    Missing(String),
    #[error("not a valid http(s) URL: {0}")]
    InvalidUrl(String),
    #[error("not a valid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("local time does not exist in the configured timezone: {0}")]
    NonexistentLocalTime(String),
    #[error("appointment ends before it begins")]
    EndBeforeBegin,
    #[error("invalid lead time: {0}")]
    InvalidLeadTime(String),
    #[error("unknown locale: {0}")]
    UnknownLocale(String),
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("invalid poll interval: {0}")]
    InvalidPollInterval(String),
}

/// `KEY=value` pairs read from the file named by `CONFIG_FILE`.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Everything one run needs, resolved and validated.
#[derive(Debug, Clone)]
pub struct ReminderSettings {
    pub webhook_url: Url,
    pub appointment: Appointment,
    pub lead_times: LeadTimes,
    pub card: CardOptions,
    pub poll_interval: Duration,
}

impl ReminderSettings {
    /// Builds settings from a key lookup; the caller decides precedence.
    pub fn resolve<F>(get_prop: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get_prop(key).filter(|value| !value.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| ConfigError::Missing(key.to_string()));

        let timezone_name = get(TIMEZONE).unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone: Tz = timezone_name
            .trim()
            .parse()
            .map_err(|_| ConfigError::UnknownTimezone(timezone_name.clone()))?;
        let locale: Locale = match get(REMINDER_LOCALE) {
            Some(code) => code.parse()?,
            None => Locale::default(),
        };

        let webhook_url = validate_http_url(&require(WEBHOOK_URL)?)?;
        let begin = parse_timestamp(&require(APPOINTMENT_BEGIN)?, timezone)?;
        let end = parse_timestamp(&require(APPOINTMENT_END)?, timezone)?;
        let appointment = Appointment::new(
            &require(APPOINTMENT_TITLE)?,
            &get(APPOINTMENT_MESSAGE).unwrap_or_default(),
            begin,
            end,
            &require(APPOINTMENT_LINK)?,
        )?;

        let lead_times =
            LeadTimes::parse(&get(REMINDER_LEAD_TIMES).unwrap_or_else(|| DEFAULT_LEAD_TIMES.to_string()))?;
        let poll_interval = match get(POLL_INTERVAL_SECS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidPollInterval(raw)),
            },
            None => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };
        let location = get(LOCATION_LABEL).unwrap_or_else(|| DEFAULT_LOCATION_LABEL.to_string());

        Ok(Self {
            webhook_url,
            appointment,
            lead_times,
            card: CardOptions {
                locale,
                timezone,
                location,
            },
            poll_interval,
        })
    }
}
