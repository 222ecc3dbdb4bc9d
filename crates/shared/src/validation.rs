//! Common validation utilities.

use chrono::NaiveDate;
use validator::ValidationError;

/// Wire format for calendar dates (`YYYY-MM-DD`).
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).map_err(|_| {
        let mut err = ValidationError::new("iso_date");
        err.message = Some("Date must be formatted as YYYY-MM-DD".into());
        err
    })
}

/// Validator hook for optional date strings.
pub fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    parse_iso_date(value).map(|_| ())
}

/// Rejects strings that are empty or whitespace only.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
