use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ConfigError;

const LOCAL_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Appointment {
    pub title: String,
    pub message: String,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub link: String,
}

impl Appointment {
    pub fn new(
        title: &str,
        message: &str,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
        link: &str,
    ) -> Result<Self, ConfigError> {
        if title.trim().is_empty() {
            return Err(ConfigError::Missing("APPOINTMENT_TITLE".to_string()));
        }
        if end < begin {
            return Err(ConfigError::EndBeforeBegin);
        }
        validate_http_url(link)?;
        Ok(Self {
            title: title.to_string(),
            message: message.to_string(),
            begin,
            end,
            link: link.to_string(),
        })
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.begin - now
    }

    /// Stable id for the reminder firing `lead_time` before the start.
    /// Lead times reaching past the representable range use the start itself.
    pub fn reminder_id(&self, lead_time: Duration) -> Uuid {
        let fire_at = self.begin.checked_sub_signed(lead_time).unwrap_or(self.begin);
        let name = format!(
            "{}-{}-{}",
            fire_at.to_rfc3339(),
            self.begin.to_rfc3339(),
            self.title
        );
        Uuid::new_v5(&Uuid::nil(), name.as_bytes())
    }
}

/// Accepts RFC 3339, or a local wall-clock time interpreted in `tz`.
pub fn parse_timestamp(input: &str, tz: Tz) -> Result<DateTime<Utc>, ConfigError> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .ok_or_else(|| ConfigError::InvalidTimestamp(input.to_string()))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ConfigError::NonexistentLocalTime(input.to_string()))
}

pub fn validate_http_url(input: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl(input.to_string());
    let url = Url::parse(input).map_err(|_| invalid())?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid());
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid());
    }
    Ok(url)
}
