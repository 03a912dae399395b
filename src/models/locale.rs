use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitName {
    pub singular: &'static str,
    pub plural: &'static str,
}

impl UnitName {
    pub fn for_value(&self, value: i64) -> &'static str {
        if value == 1 { self.singular } else { self.plural }
    }
}

/// Fixed text for one language.
#[derive(Debug, Clone, Copy)]
pub struct Strings {
    pub day: UnitName,
    pub hour: UnitName,
    pub minute: UnitName,
    pub second: UnitName,
    pub until_appointment: &'static str,
    pub fact_date: &'static str,
    pub fact_begin: &'static str,
    pub fact_end: &'static str,
    pub fact_location: &'static str,
    pub open_link: &'static str,
    pub sent: &'static str,
    pub rejected: &'static str,
    pub failed: &'static str,
}

const GERMAN: Strings = Strings {
    day: UnitName { singular: "Tag", plural: "Tage" },
    hour: UnitName { singular: "Stunde", plural: "Stunden" },
    minute: UnitName { singular: "Minute", plural: "Minuten" },
    second: UnitName { singular: "Sekunde", plural: "Sekunden" },
    until_appointment: "bis zum Termin",
    fact_date: "Datum",
    fact_begin: "Beginn",
    fact_end: "Ende",
    fact_location: "Ort",
    open_link: "Meeting-Kanal öffnen",
    sent: "Erinnerung erfolgreich gesendet.",
    rejected: "Senden der Erinnerung fehlgeschlagen mit dem HTTP-Status-Code",
    failed: "Senden der Erinnerung fehlgeschlagen",
};

const DUTCH: Strings = Strings {
    day: UnitName { singular: "dag", plural: "dagen" },
    hour: UnitName { singular: "uur", plural: "uren" },
    minute: UnitName { singular: "minuut", plural: "minuten" },
    second: UnitName { singular: "seconde", plural: "seconden" },
    until_appointment: "tot de afspraak",
    fact_date: "Datum",
    fact_begin: "Begin",
    fact_end: "Einde",
    fact_location: "Locatie",
    open_link: "Meeting-kanaal openen",
    sent: "Herinnering verzenden geslaagd.",
    rejected: "Herinnering verzenden mislukt met HTTP-status-code",
    failed: "Herinnering verzenden mislukt",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    De,
    Nl,
}

impl Locale {
    pub fn strings(&self) -> &'static Strings {
        match self {
            Locale::De => &GERMAN,
            Locale::Nl => &DUTCH,
        }
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "de" | "de-de" | "german" => Ok(Locale::De),
            "nl" | "nl-nl" | "dutch" => Ok(Locale::Nl),
            other => Err(ConfigError::UnknownLocale(other.to_string())),
        }
    }
}
