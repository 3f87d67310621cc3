//! Request validation.
//!
//! Field presence and JSON shape are enforced once per request by the
//! [`AppJson`] extractor; the numeric-range and allow-list checks that the
//! typed request structs cannot express live here as free functions so that
//! every endpoint rejects bad input with the same `validation_error` body.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON extractor whose rejection is a uniform [`AppError::Validation`].
///
/// Handlers take `AppJson<Request>` instead of `axum::Json<Request>`; a
/// missing field, wrong type or malformed body then produces the same
/// 400 JSON error envelope as the explicit checks below.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Valid hanger identifiers are 16-bit and non-zero.
pub const HANGER_ID_MIN: i64 = 1;
pub const HANGER_ID_MAX: i64 = u16::MAX as i64;

/// Validate a hanger identifier (16-bit unsigned, zero reserved).
///
/// The id arrives as a plain JSON number; anything fractional was already
/// rejected by the extractor, so only the range is checked here.
pub fn hanger_id(raw: i64) -> Result<u16, AppError> {
    if !(HANGER_ID_MIN..=HANGER_ID_MAX).contains(&raw) {
        return Err(AppError::Validation(format!(
            "Hanger ID out of 16-bit range ({HANGER_ID_MIN}-{HANGER_ID_MAX})"
        )));
    }
    // Range check above makes this lossless
    Ok(raw as u16)
}

/// Validate a hanger status against the configured allow-list.
///
/// Matching is case-insensitive; the stored value is always lowercase.
pub fn hanger_status(raw: &str, allowed: &[String]) -> Result<String, AppError> {
    let status = raw.to_lowercase();
    if allowed.iter().any(|s| *s == status) {
        Ok(status)
    } else {
        Err(AppError::Validation(format!(
            "Invalid status '{raw}'. Allowed: {allowed:?}"
        )))
    }
}

/// Plausibility bounds for a sensor reading.
///
/// The hardware reports in °C and %RH; values outside these windows are
/// sensor faults, not weather.
pub fn sensor_reading(temp: f64, hum: f64) -> Result<(), AppError> {
    if !temp.is_finite() || !(-40.0..=125.0).contains(&temp) {
        return Err(AppError::Validation(format!(
            "Temperature {temp} outside plausible range (-40 to 125 °C)"
        )));
    }
    if !hum.is_finite() || !(0.0..=100.0).contains(&hum) {
        return Err(AppError::Validation(format!(
            "Humidity {hum} outside plausible range (0 to 100 %)"
        )));
    }
    Ok(())
}

/// Reject empty (or whitespace-only) required string fields.
pub fn non_empty(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "Field '{field}' must not be empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hanger_id_accepts_full_16_bit_range() {
        assert_eq!(hanger_id(1).unwrap(), 1);
        assert_eq!(hanger_id(1024).unwrap(), 1024);
        assert_eq!(hanger_id(65535).unwrap(), 65535);
    }

    #[test]
    fn hanger_id_rejects_zero_negative_and_overflow() {
        for raw in [0, -1, 65536, i64::MAX, i64::MIN] {
            assert!(hanger_id(raw).is_err(), "expected {raw} to be rejected");
        }
    }

    #[test]
    fn hanger_status_is_case_insensitive_and_normalizes() {
        let allowed = ["off", "on", "heating", "drying"].map(String::from);
        assert_eq!(hanger_status("Drying", &allowed).unwrap(), "drying");
        assert_eq!(hanger_status("OFF", &allowed).unwrap(), "off");
    }

    #[test]
    fn hanger_status_rejects_values_outside_the_allow_list() {
        let allowed = ["off", "on"].map(String::from);
        assert!(hanger_status("heating", &allowed).is_err());
        assert!(hanger_status("", &allowed).is_err());
    }

    #[test]
    fn extended_allow_list_admits_extra_states() {
        // The variant with active/inactive is plain configuration
        let allowed = ["off", "on", "heating", "drying", "active", "inactive"].map(String::from);
        assert_eq!(hanger_status("active", &allowed).unwrap(), "active");
    }

    #[test]
    fn sensor_reading_bounds() {
        assert!(sensor_reading(21.5, 40.0).is_ok());
        assert!(sensor_reading(-40.0, 0.0).is_ok());
        assert!(sensor_reading(125.0, 100.0).is_ok());
        assert!(sensor_reading(-41.0, 50.0).is_err());
        assert!(sensor_reading(126.0, 50.0).is_err());
        assert!(sensor_reading(20.0, -0.1).is_err());
        assert!(sensor_reading(20.0, 101.0).is_err());
        assert!(sensor_reading(f64::NAN, 50.0).is_err());
        assert!(sensor_reading(20.0, f64::INFINITY).is_err());
    }

    #[test]
    fn non_empty_rejects_blank_fields() {
        assert!(non_empty("Ann", "first_name").is_ok());
        assert!(non_empty("", "first_name").is_err());
        assert!(non_empty("   ", "email").is_err());
    }
}
