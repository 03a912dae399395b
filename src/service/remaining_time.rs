use chrono::Duration;

use crate::models::locale::Locale;

const SECS_PER_DAY: i64 = 24 * 60 * 60;
const SECS_PER_HOUR: i64 = 60 * 60;
const SECS_PER_MINUTE: i64 = 60;

/// Renders `remaining` as e.g. `1 Tag, 1 Stunde`. Zero-valued units are
/// left out, seconds are dropped and negative values count as zero.
pub fn format_remaining(remaining: Duration, locale: Locale) -> String {
    let strings = locale.strings();
    let total = remaining.num_seconds().max(0);
    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;

    let mut segments: Vec<String> = Vec::new();
    for (value, unit) in [
        (days, strings.day),
        (hours, strings.hour),
        (minutes, strings.minute),
    ] {
        if value != 0 {
            segments.push(format!("{} {}", value, unit.for_value(value)));
        }
    }
    if segments.is_empty() {
        return format!("0 {}", strings.minute.plural);
    }
    segments.join(", ")
}

/// Single-unit, rounded rendering used inside reminder messages, so a
/// reminder that fires a few seconds late still reads `1 Stunde`.
/// Below a minute it counts seconds, below 12 hours minutes or hours,
/// beyond that whole days.
pub fn format_until(remaining: Duration, locale: Locale) -> String {
    let strings = locale.strings();
    let millis = remaining.num_milliseconds().max(0);
    let seconds = (millis + 500) / 1_000;
    if seconds < SECS_PER_MINUTE {
        return format!("{} {}", seconds, strings.second.for_value(seconds));
    }
    let minutes = (seconds + 30) / 60;
    if minutes < 60 {
        return format!("{} {}", minutes, strings.minute.for_value(minutes));
    }
    let hours = (minutes + 30) / 60;
    if hours < 12 {
        return format!("{} {}", hours, strings.hour.for_value(hours));
    }
    let days = (hours + 12) / 24;
    format!("{} {}", days, strings.day.for_value(days))
}

/// The console status line, e.g. `2 Stunden, 5 Minuten bis zum Termin`.
pub fn status_line(remaining: Duration, locale: Locale) -> String {
    format!(
        "{} {}",
        format_remaining(remaining, locale),
        locale.strings().until_appointment
    )
}
