use chrono::Duration;
use std::collections::VecDeque;

use crate::config::ConfigError;

pub const DEFAULT_LEAD_TIMES: &str = "1d,1h,10m,30s";

/// Outstanding reminder thresholds, largest first.
///
/// The list is sorted once on construction and afterwards only shrinks from
/// the front, so it stays non-increasing for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadTimes {
    remaining: VecDeque<Duration>,
}

impl LeadTimes {
    pub fn new(mut lead_times: Vec<Duration>) -> Self {
        lead_times.sort_by(|a, b| b.cmp(a));
        Self {
            remaining: lead_times.into(),
        }
    }

    /// Parses a comma separated list such as `1d,1h,10m,30s`.
    /// A bare number is taken as seconds.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut lead_times = Vec::new();
        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            lead_times.push(parse_lead_time(part)?);
        }
        if lead_times.is_empty() {
            return Err(ConfigError::InvalidLeadTime(input.to_string()));
        }
        Ok(Self::new(lead_times))
    }

    pub fn current(&self) -> Option<Duration> {
        self.remaining.front().copied()
    }

    pub fn advance(&mut self) -> Option<Duration> {
        self.remaining.pop_front()
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Duration> {
        self.remaining.iter()
    }
}

impl Default for LeadTimes {
    fn default() -> Self {
        Self::new(vec![
            Duration::seconds(30),
            Duration::minutes(10),
            Duration::hours(1),
            Duration::days(1),
        ])
    }
}

fn parse_lead_time(part: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidLeadTime(part.to_string());
    let split_at = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    let (digits, unit) = part.split_at(split_at);
    let value: i64 = digits.parse().map_err(|_| invalid())?;
    let lead_time = match unit.trim() {
        "" | "s" => Duration::try_seconds(value),
        "m" => Duration::try_minutes(value),
        "h" => Duration::try_hours(value),
        "d" => Duration::try_days(value),
        _ => None,
    };
    lead_time.ok_or_else(invalid)
}

/// Short form used in log lines, e.g. `1d`, `10m`, `90s`.
pub fn describe_lead_time(lead_time: Duration) -> String {
    let secs = lead_time.num_seconds();
    if secs != 0 && secs % 86_400 == 0 {
        format!("{}d", secs / 86_400)
    } else if secs != 0 && secs % 3_600 == 0 {
        format!("{}h", secs / 3_600)
    } else if secs != 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sorts_descending_regardless_of_input_order() {
        let lead_times = LeadTimes::new(vec![
            Duration::seconds(30),
            Duration::hours(1),
            Duration::days(1),
            Duration::minutes(10),
        ]);
        let order: Vec<Duration> = lead_times.iter().copied().collect();
        assert_eq!(
            order,
            vec![
                Duration::days(1),
                Duration::hours(1),
                Duration::minutes(10),
                Duration::seconds(30),
            ]
        );
    }

    #[test]
    fn advance_only_shrinks_from_the_front() {
        let mut lead_times = LeadTimes::parse("10m,1h").unwrap();
        assert_eq!(lead_times.current(), Some(Duration::hours(1)));
        assert_eq!(lead_times.advance(), Some(Duration::hours(1)));
        assert_eq!(lead_times.current(), Some(Duration::minutes(10)));
        assert_eq!(lead_times.advance(), Some(Duration::minutes(10)));
        assert!(lead_times.is_empty());
        assert_eq!(lead_times.advance(), None);
    }

    #[test]
    fn parse_keeps_duplicates() {
        let lead_times = LeadTimes::parse("5m, 5m ,300").unwrap();
        assert_eq!(lead_times.len(), 3);
        assert!(lead_times.iter().all(|d| *d == Duration::minutes(5)));
    }

    #[test]
    fn default_matches_default_string() {
        assert_eq!(LeadTimes::default(), LeadTimes::parse(DEFAULT_LEAD_TIMES).unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(LeadTimes::parse("").is_err());
        assert!(LeadTimes::parse("1w").is_err());
        assert!(LeadTimes::parse("-5m").is_err());
        assert!(LeadTimes::parse("m").is_err());
    }

    #[test]
    fn parse_rejects_out_of_range_values() {
        assert!(matches!(
            LeadTimes::parse("9999999999999999d"),
            Err(ConfigError::InvalidLeadTime(part)) if part == "9999999999999999d"
        ));
        assert!(LeadTimes::parse("1h,9223372036854775807m").is_err());
        assert!(LeadTimes::parse("99999999999999999999s").is_err());
    }

    #[test]
    fn describe_picks_largest_whole_unit() {
        assert_eq!(describe_lead_time(Duration::days(1)), "1d");
        assert_eq!(describe_lead_time(Duration::hours(2)), "2h");
        assert_eq!(describe_lead_time(Duration::minutes(10)), "10m");
        assert_eq!(describe_lead_time(Duration::seconds(90)), "90s");
        assert_eq!(describe_lead_time(Duration::zero()), "0s");
    }
}
