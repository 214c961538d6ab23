//! Calendar month of a budget year
//!
//! Months are keyed by their Spanish names in every persisted document
//! ("Enero" .. "Diciembre"). Parsing also accepts English names and the
//! month number so the CLI stays forgiving.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// One of the twelve months of a budget year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    Enero,
    Febrero,
    Marzo,
    Abril,
    Mayo,
    Junio,
    Julio,
    Agosto,
    Septiembre,
    Octubre,
    Noviembre,
    Diciembre,
}

const ENGLISH: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

impl Month {
    /// All months in calendar order
    pub const ALL: [Month; 12] = [
        Month::Enero,
        Month::Febrero,
        Month::Marzo,
        Month::Abril,
        Month::Mayo,
        Month::Junio,
        Month::Julio,
        Month::Agosto,
        Month::Septiembre,
        Month::Octubre,
        Month::Noviembre,
        Month::Diciembre,
    ];

    /// Month number, 1 = Enero
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Build from a month number (1..=12)
    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.get(number.checked_sub(1)? as usize).copied()
    }

    /// The month a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self::ALL[date.month0() as usize]
    }

    /// Persisted name
    pub fn name(self) -> &'static str {
        match self {
            Month::Enero => "Enero",
            Month::Febrero => "Febrero",
            Month::Marzo => "Marzo",
            Month::Abril => "Abril",
            Month::Mayo => "Mayo",
            Month::Junio => "Junio",
            Month::Julio => "Julio",
            Month::Agosto => "Agosto",
            Month::Septiembre => "Septiembre",
            Month::Octubre => "Octubre",
            Month::Noviembre => "Noviembre",
            Month::Diciembre => "Diciembre",
        }
    }

    /// Check whether a date falls in this month of the given year
    pub fn contains(self, year: i32, date: NaiveDate) -> bool {
        date.year() == year && date.month() == self.number()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();

        if let Ok(number) = input.parse::<u32>() {
            return Self::from_number(number).ok_or_else(|| {
                LedgerError::Validation(format!("Month number out of range: {}", number))
            });
        }

        let lower = input.to_lowercase();
        Self::ALL
            .iter()
            .zip(ENGLISH.iter())
            .find(|(month, english)| month.name().to_lowercase() == lower || **english == lower)
            .map(|(month, _)| *month)
            .ok_or_else(|| LedgerError::Validation(format!("Unknown month: {}", input)))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_number_round_trip() {
        for month in Month::ALL {
            assert_eq!(Month::from_number(month.number()), Some(month));
        }
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(13), None);
    }

    #[test]
    fn test_parse_accepts_spanish_english_and_numbers() {
        assert_eq!("Enero".parse::<Month>().unwrap(), Month::Enero);
        assert_eq!("septiembre".parse::<Month>().unwrap(), Month::Septiembre);
        assert_eq!("March".parse::<Month>().unwrap(), Month::Marzo);
        assert_eq!("12".parse::<Month>().unwrap(), Month::Diciembre);
        assert!("Smarch".parse::<Month>().is_err());
    }

    #[test]
    fn test_of_date() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert_eq!(Month::of(date), Month::Julio);
        assert!(Month::Julio.contains(2024, date));
        assert!(!Month::Julio.contains(2023, date));
    }

    #[test]
    fn test_map_keys_use_spanish_names_in_calendar_order() {
        let mut map = BTreeMap::new();
        map.insert(Month::Marzo, 3);
        map.insert(Month::Enero, 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Enero":1,"Marzo":3}"#);

        let back: BTreeMap<Month, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
