//! Decoding of write request bodies.
//!
//! The body is decoded by hand rather than through a typed extractor so that
//! a missing field, a wrong-typed field and an undecodable body each land in
//! their own error class.

use std::collections::HashMap;

use serde_json::Value;
use serde_json::value::RawValue;

use crate::domain::DelayCandidate;
use crate::usecases::DelayWriteInput;
use crate::usecases::ports::DelayServiceError;

pub const DELAY_FIELD: &str = "delay";

const OUT_OF_RANGE_KIND: &str = "out-of-range number";

pub fn decode_write_body(body: &[u8]) -> Result<DelayWriteInput, DelayServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(DelayWriteInput { candidate: None });
    }
    // Syntax is checked without materialising numbers, so only the field's
    // own value can fail the range check.
    let document: &RawValue =
        serde_json::from_slice(body).map_err(|err| DelayServiceError::Decode(err.to_string()))?;
    let Some(field) = delay_field(document) else {
        return Ok(DelayWriteInput { candidate: None });
    };
    let candidate = match serde_json::from_str::<Value>(field.get()) {
        Ok(value) => candidate_from_value(&value),
        Err(_) => Some(DelayCandidate::Unsupported {
            kind: OUT_OF_RANGE_KIND,
        }),
    };
    Ok(DelayWriteInput { candidate })
}

/// Finds the raw `delay` member. Non-object documents have none.
fn delay_field(document: &RawValue) -> Option<&RawValue> {
    let mut members: HashMap<String, &RawValue> = serde_json::from_str(document.get()).ok()?;
    members.remove(DELAY_FIELD)
}

/// Converts the `delay` member. `null` counts as absent.
pub fn candidate_from_value(field: &Value) -> Option<DelayCandidate> {
    match field {
        Value::Null => None,
        Value::Number(n) => Some(match n.as_f64() {
            Some(n) => DelayCandidate::Number(n),
            None => DelayCandidate::Unsupported { kind: "number" },
        }),
        Value::String(s) => Some(DelayCandidate::Text(s.clone())),
        Value::Bool(_) => Some(DelayCandidate::Unsupported { kind: "boolean" }),
        Value::Array(_) => Some(DelayCandidate::Unsupported { kind: "array" }),
        Value::Object(_) => Some(DelayCandidate::Unsupported { kind: "object" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DelayValidationError;

    #[test]
    fn test_empty_body_is_missing() {
        assert_eq!(decode_write_body(b"").unwrap().candidate, None);
        assert_eq!(decode_write_body(b"  \n").unwrap().candidate, None);
    }

    #[test]
    fn test_object_without_delay_is_missing() {
        assert_eq!(decode_write_body(b"{}").unwrap().candidate, None);
        assert_eq!(
            decode_write_body(br#"{"value": 10}"#).unwrap().candidate,
            None
        );
        assert_eq!(
            decode_write_body(br#"{"delay": null}"#).unwrap().candidate,
            None
        );
    }

    #[test]
    fn test_non_object_json_is_missing() {
        assert_eq!(decode_write_body(b"500").unwrap().candidate, None);
        assert_eq!(decode_write_body(br#""500""#).unwrap().candidate, None);
        assert_eq!(decode_write_body(b"[1e400]").unwrap().candidate, None);
    }

    #[test]
    fn test_number_and_string_fields() {
        assert_eq!(
            decode_write_body(br#"{"delay": 120}"#).unwrap().candidate,
            Some(DelayCandidate::Number(120.0))
        );
        assert_eq!(
            decode_write_body(br#"{"delay": "75.9"}"#).unwrap().candidate,
            Some(DelayCandidate::Text("75.9".into()))
        );
    }

    #[test]
    fn test_wrong_typed_field_is_unsupported() {
        assert_eq!(
            decode_write_body(br#"{"delay": true}"#).unwrap().candidate,
            Some(DelayCandidate::Unsupported { kind: "boolean" })
        );
        assert_eq!(
            decode_write_body(br#"{"delay": [1]}"#).unwrap().candidate,
            Some(DelayCandidate::Unsupported { kind: "array" })
        );
    }

    #[test]
    fn test_out_of_range_number_is_invalid_value() {
        let candidate = decode_write_body(br#"{"delay": 1e400}"#)
            .unwrap()
            .candidate
            .unwrap();
        assert_eq!(
            candidate,
            DelayCandidate::Unsupported {
                kind: OUT_OF_RANGE_KIND
            }
        );
        assert!(matches!(
            candidate.parse(),
            Err(DelayValidationError::Invalid { .. })
        ));
    }

    #[test]
    fn test_out_of_range_sibling_field_is_ignored() {
        assert_eq!(
            decode_write_body(br#"{"other": -1e999, "delay": 300}"#)
                .unwrap()
                .candidate,
            Some(DelayCandidate::Number(300.0))
        );
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = decode_write_body(b"{delay: 5").unwrap_err();
        assert!(matches!(err, DelayServiceError::Decode(_)));

        let err = decode_write_body(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, DelayServiceError::Decode(_)));
    }
}
