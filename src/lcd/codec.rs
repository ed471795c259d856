//! Serde helpers for the LCD's JSON conventions.
//!
//! The LCD encodes 64-bit integers and decimals as strings and durations as
//! `"<seconds>s"`.

use serde::{de, Deserialize, Deserializer};

pub fn from_f64_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.parse::<f64>().map_err(|error| {
        de::Error::invalid_value(
            de::Unexpected::Str(&format!("unexpected value: {}, error: {}", s, error)),
            &"a decimal as string e.g. \"0.050000000000000000\"",
        )
    })
}

pub fn from_u64_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.parse::<u64>().map_err(|error| {
        de::Error::invalid_value(
            de::Unexpected::Str(&format!("unexpected value: {}, error: {}", s, error)),
            &"a number as string e.g. \"11750378\", which fits within u64",
        )
    })
}

/// Parse a protobuf JSON duration such as `"1814400s"` or `"0.5s"` into seconds.
pub fn from_duration_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    parse_duration_secs(&s).ok_or_else(|| {
        de::Error::invalid_value(
            de::Unexpected::Str(&s),
            &"a duration as string e.g. \"1814400s\"",
        )
    })
}

pub fn parse_duration_secs(s: &str) -> Option<f64> {
    s.strip_suffix('s')?.parse::<f64>().ok()
}
