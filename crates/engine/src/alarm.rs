//! The module contains the alarm record.
//!
//! Hour and minute are kept as integers in memory and written to storage as
//! two-digit strings, e.g. `{"hour": "07", "minute": "05", "onlyWeekdays": true}`.
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

use super::error::ValidationError;

pub(crate) const MAX_HOUR: u8 = 23;
pub(crate) const MAX_MINUTE: u8 = 59;

/// A saved alarm: a time of day and whether it only applies to weekdays.
///
/// An `Alarm` always holds an hour in `0..=23` and a minute in `0..=59`, the
/// constructor and the deserializer both reject anything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    #[serde(serialize_with = "encode_two_digits", deserialize_with = "decode_hour")]
    hour: u8,
    #[serde(
        serialize_with = "encode_two_digits",
        deserialize_with = "decode_minute"
    )]
    minute: u8,
    only_weekdays: bool,
}

impl Alarm {
    pub fn new(hour: u8, minute: u8, only_weekdays: bool) -> Result<Self, ValidationError> {
        if hour > MAX_HOUR || minute > MAX_MINUTE {
            return Err(ValidationError::InvalidNumber);
        }

        Ok(Self {
            hour,
            minute,
            only_weekdays,
        })
    }

    pub fn only_weekdays(&self) -> bool {
        self.only_weekdays
    }

    /// Zero-padded hour, as stored.
    pub fn hour_text(&self) -> String {
        format!("{:02}", self.hour)
    }

    /// Zero-padded minute, as stored.
    pub fn minute_text(&self) -> String {
        format!("{:02}", self.minute)
    }

    /// `HH:MM`.
    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

fn encode_two_digits<S: Serializer>(value: &u8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{value:02}"))
}

fn decode_hour<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    decode_bounded(deserializer, MAX_HOUR, "hour")
}

fn decode_minute<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    decode_bounded(deserializer, MAX_MINUTE, "minute")
}

fn decode_bounded<'de, D: Deserializer<'de>>(
    deserializer: D,
    max: u8,
    field: &str,
) -> Result<u8, D::Error> {
    let text = String::deserialize(deserializer)?;
    text.trim()
        .parse::<u8>()
        .ok()
        .filter(|value| *value <= max)
        .ok_or_else(|| D::Error::custom(format!("invalid {field} \"{text}\"")))
}
