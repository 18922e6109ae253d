//! Serde helpers for the Portuguese wire contract
//!
//! Dates travel as `dd/mm/YYYY` strings and percentages as `"NN.NN%"`
//! strings; these formats are consumed by templates and must not
//! change.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

pub const FORMATO_DATA: &str = "%d/%m/%Y";
pub const FORMATO_DATA_HORA: &str = "%d/%m/%Y %H:%M";

/// `NaiveDate` as `dd/mm/YYYY`
pub mod data_br {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMATO_DATA).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMATO_DATA).map_err(serde::de::Error::custom)
    }
}

/// `Option<NaiveDate>` as `dd/mm/YYYY` or null
pub mod data_br_opt {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMATO_DATA).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let s: Option<String> = Option::deserialize(deserializer)?;
        match s {
            Some(s) => NaiveDate::parse_from_str(&s, FORMATO_DATA)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// `Option<NaiveDateTime>` as `dd/mm/YYYY HH:MM` or null
pub mod data_hora_br_opt {
    use super::*;

    pub fn serialize<S: Serializer>(
        dt: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => serializer.serialize_str(&dt.format(FORMATO_DATA_HORA).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let s: Option<String> = Option::deserialize(deserializer)?;
        match s {
            Some(s) => NaiveDateTime::parse_from_str(&s, FORMATO_DATA_HORA)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// `f64` as `"NN.NN%"`
pub mod porcentagem {
    use super::*;

    pub fn serialize<S: Serializer>(valor: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:.2}%", valor))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.trim_end_matches('%')
            .parse::<f64>()
            .map_err(serde::de::Error::custom)
    }
}
