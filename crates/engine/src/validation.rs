use chrono::NaiveDate;

use super::{
    alarm::{Alarm, MAX_HOUR, MAX_MINUTE},
    calendar,
    error::ValidationError,
};

/// Checks the raw form input and builds the alarm to save.
///
/// `reference` is the day the alarm is being created on. A weekday-only alarm
/// is refused when that day is a weekend or a fixed holiday; the next
/// occurrence of the chosen time is not considered.
pub fn validate(
    hour_text: &str,
    minute_text: &str,
    only_weekdays: bool,
    reference: NaiveDate,
) -> Result<Alarm, ValidationError> {
    if hour_text.is_empty() || minute_text.is_empty() {
        return Err(ValidationError::MissingField);
    }

    let hour = parse_component(hour_text, MAX_HOUR)?;
    let minute = parse_component(minute_text, MAX_MINUTE)?;

    if only_weekdays {
        if calendar::is_weekend(reference) {
            return Err(ValidationError::WeekendRejected);
        }
        if calendar::is_fixed_holiday(reference) {
            return Err(ValidationError::HolidayRejected);
        }
    }

    Alarm::new(hour, minute, only_weekdays)
}

fn parse_component(text: &str, max: u8) -> Result<u8, ValidationError> {
    let value = text
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumber)?;
    if !(0..=i64::from(max)).contains(&value) {
        return Err(ValidationError::InvalidNumber);
    }
    u8::try_from(value).map_err(|_| ValidationError::InvalidNumber)
}
