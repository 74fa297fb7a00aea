use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::FieldErrors;
use crate::models::{Home, NewBooking};

const REQUIRED: &str = "This field is required.";
const NOT_A_STRING: &str = "Not a valid string.";
const MAX_NAME_LEN: usize = 50;
const MAX_PHONE_LEN: usize = 17;

/// Raw booking payload. Fields are kept as loose JSON so that a wrongly typed
/// value is reported against its field together with every other problem.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BookingRequest {
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
    pub email: Option<Value>,
    pub phone_number: Option<Value>,
    pub preferred_home: Option<Value>,
    pub preferred_date: Option<Value>,
    pub preferred_time: Option<Value>,
    pub notes: Option<Value>,
}

/// A request field after type coercion.
enum Field {
    Missing,
    Invalid,
    Text(String),
}

impl Field {
    /// Strings are trimmed, numbers are taken as their decimal text. Blank
    /// strings and `null` count as missing.
    fn decode(errors: &mut FieldErrors, name: &str, value: &Option<Value>) -> Self {
        let text = match value {
            None | Some(Value::Null) => return Field::Missing,
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                errors.add(name, NOT_A_STRING);
                return Field::Invalid;
            }
        };
        if text.is_empty() {
            Field::Missing
        } else {
            Field::Text(text)
        }
    }
}

/// Checks a booking request against `today`. Dates strictly before `today`
/// are rejected; `today` itself is accepted.
pub fn validate_booking(
    request: &BookingRequest,
    today: NaiveDate,
) -> Result<NewBooking, FieldErrors> {
    let mut errors = FieldErrors::new();

    let first_name = required(&mut errors, "first_name", &request.first_name);
    if let Some(name) = &first_name {
        check_max_len(&mut errors, "first_name", name, MAX_NAME_LEN);
    }

    let last_name = optional(&mut errors, "last_name", &request.last_name);
    if let Some(name) = &last_name {
        check_max_len(&mut errors, "last_name", name, MAX_NAME_LEN);
    }

    let email = required(&mut errors, "email", &request.email).and_then(|email| {
        if email.contains('@') {
            Some(email.to_lowercase())
        } else {
            errors.add("email", "Please provide a valid email address.");
            None
        }
    });

    let phone_number = required(&mut errors, "phone_number", &request.phone_number);
    if let Some(phone) = &phone_number {
        check_max_len(&mut errors, "phone_number", phone, MAX_PHONE_LEN);
    }

    let preferred_home = required(&mut errors, "preferred_home", &request.preferred_home)
        .and_then(|key| {
            let home = Home::parse(&key);
            if home.is_none() {
                errors.add(
                    "preferred_home",
                    format!("\"{key}\" is not a valid choice."),
                );
            }
            home
        });

    let preferred_date = required(&mut errors, "preferred_date", &request.preferred_date)
        .and_then(|raw| match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) if date < today => {
                errors.add("preferred_date", "Tour date cannot be in the past.");
                None
            }
            Ok(date) => Some(date),
            Err(_) => {
                errors.add(
                    "preferred_date",
                    "Date has wrong format. Use YYYY-MM-DD.",
                );
                None
            }
        });

    let preferred_time = required(&mut errors, "preferred_time", &request.preferred_time)
        .and_then(|raw| {
            let time = parse_time_of_day(&raw);
            if time.is_none() {
                errors.add("preferred_time", "Time has wrong format. Use HH:MM.");
            }
            time
        });

    let notes = optional(&mut errors, "notes", &request.notes);

    match (
        first_name,
        email,
        phone_number,
        preferred_home,
        preferred_date,
        preferred_time,
    ) {
        (Some(first_name), Some(email), Some(phone_number), Some(home), Some(date), Some(time))
            if errors.is_empty() =>
        {
            Ok(NewBooking {
                first_name,
                last_name,
                email,
                phone_number,
                preferred_home: home,
                preferred_date: date,
                preferred_time: time,
                notes,
            })
        }
        _ => Err(errors),
    }
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

fn required(errors: &mut FieldErrors, field: &str, value: &Option<Value>) -> Option<String> {
    match Field::decode(errors, field, value) {
        Field::Text(text) => Some(text),
        Field::Missing => {
            errors.add(field, REQUIRED);
            None
        }
        Field::Invalid => None,
    }
}

fn optional(errors: &mut FieldErrors, field: &str, value: &Option<Value>) -> Option<String> {
    match Field::decode(errors, field, value) {
        Field::Text(text) => Some(text),
        Field::Missing | Field::Invalid => None,
    }
}

fn check_max_len(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("Ensure this field has no more than {max} characters."),
        );
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, 15).unwrap()
    }

    fn valid_request() -> BookingRequest {
        BookingRequest {
            first_name: Some(json!("John")),
            last_name: Some(json!("Doe")),
            email: Some(json!("john.doe@example.com")),
            phone_number: Some(json!("+1234567890")),
            preferred_home: Some(json!("cardiff")),
            preferred_date: Some(json!("2030-06-16")),
            preferred_time: Some(json!("10:00")),
            notes: Some(json!("Test booking")),
        }
    }

    #[test]
    fn test_valid_request() {
        let booking = validate_booking(&valid_request(), today()).unwrap();
        assert_eq!(booking.first_name, "John");
        assert_eq!(booking.last_name.as_deref(), Some("Doe"));
        assert_eq!(booking.preferred_home, Home::Cardiff);
        assert_eq!(booking.preferred_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn test_email_is_lowercased() {
        let mut request = valid_request();
        request.email = Some(json!("JOHN.DOE@EXAMPLE.COM"));
        let booking = validate_booking(&request, today()).unwrap();
        assert_eq!(booking.email, "john.doe@example.com");
    }

    #[test]
    fn test_email_without_at_rejected() {
        let mut request = valid_request();
        request.email = Some(json!("invalid-email"));
        let errors = validate_booking(&request, today()).unwrap_err();
        assert!(errors.contains("email"));
        assert!(!errors.contains("first_name"));
    }

    #[test]
    fn test_date_today_accepted() {
        let mut request = valid_request();
        request.preferred_date = Some(json!("2030-06-15"));
        assert!(validate_booking(&request, today()).is_ok());
    }

    #[test]
    fn test_date_yesterday_rejected() {
        let mut request = valid_request();
        request.preferred_date = Some(json!("2030-06-14"));
        let errors = validate_booking(&request, today()).unwrap_err();
        assert_eq!(
            errors.get("preferred_date").unwrap(),
            ["Tour date cannot be in the past."]
        );
    }

    #[test]
    fn test_malformed_date_and_time() {
        let mut request = valid_request();
        request.preferred_date = Some(json!("15/06/2030"));
        request.preferred_time = Some(json!("ten"));
        let errors = validate_booking(&request, today()).unwrap_err();
        assert!(errors.contains("preferred_date"));
        assert!(errors.contains("preferred_time"));
    }

    #[test]
    fn test_time_with_seconds_accepted() {
        let mut request = valid_request();
        request.preferred_time = Some(json!("14:00:00"));
        let booking = validate_booking(&request, today()).unwrap();
        assert_eq!(booking.preferred_time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
    }

    #[test]
    fn test_unknown_home_rejected() {
        let mut request = valid_request();
        request.preferred_home = Some(json!("swansea"));
        let errors = validate_booking(&request, today()).unwrap_err();
        assert!(errors.contains("preferred_home"));
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let errors = validate_booking(&BookingRequest::default(), today()).unwrap_err();
        for field in [
            "first_name",
            "email",
            "phone_number",
            "preferred_home",
            "preferred_date",
            "preferred_time",
        ] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert!(!errors.contains("last_name"));
        assert!(!errors.contains("notes"));
    }

    #[test]
    fn test_blank_strings_count_as_missing() {
        let mut request = valid_request();
        request.first_name = Some(json!("   "));
        let errors = validate_booking(&request, today()).unwrap_err();
        assert_eq!(errors.get("first_name").unwrap(), [REQUIRED]);
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let mut request = valid_request();
        request.last_name = Some(json!(""));
        request.notes = Some(json!("  "));
        let booking = validate_booking(&request, today()).unwrap();
        assert_eq!(booking.last_name, None);
        assert_eq!(booking.notes, None);
    }

    #[test]
    fn test_length_limits() {
        let mut request = valid_request();
        request.first_name = Some(json!("x".repeat(51)));
        request.phone_number = Some(json!("1".repeat(18)));
        let errors = validate_booking(&request, today()).unwrap_err();
        assert!(errors.contains("first_name"));
        assert!(errors.contains("phone_number"));
    }

    #[test]
    fn test_numeric_phone_accepted() {
        let mut request = valid_request();
        request.phone_number = Some(json!(447700900123u64));
        let booking = validate_booking(&request, today()).unwrap();
        assert_eq!(booking.phone_number, "447700900123");
    }

    #[test]
    fn test_wrong_type_reported_with_other_errors() {
        let mut request = valid_request();
        request.first_name = Some(json!(["John"]));
        request.notes = Some(json!({ "text": "hi" }));
        request.email = Some(json!("no-at-sign"));
        let errors = validate_booking(&request, today()).unwrap_err();
        assert_eq!(errors.get("first_name").unwrap(), [NOT_A_STRING]);
        assert_eq!(errors.get("notes").unwrap(), [NOT_A_STRING]);
        assert!(errors.contains("email"));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut request = valid_request();
        request.email = Some(Value::Null);
        request.last_name = Some(Value::Null);
        let errors = validate_booking(&request, today()).unwrap_err();
        assert_eq!(errors.get("email").unwrap(), [REQUIRED]);
        assert!(!errors.contains("last_name"));
    }
}
