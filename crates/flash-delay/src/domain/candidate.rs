//! Candidate delay parsing.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelayValidationError {
    #[error("Request body must contain a \"delay\" field")]
    Missing,
    #[error("Delay must be a valid number, got {raw}")]
    Invalid { raw: String },
}

impl DelayValidationError {
    /// Short tag sent as the `error` field on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            DelayValidationError::Missing => "Missing delay value",
            DelayValidationError::Invalid { .. } => "Invalid delay value",
        }
    }
}

/// The `delay` field of a write request before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DelayCandidate {
    Number(f64),
    Text(String),
    /// A value that can never be a delay: bool, array, object or a number
    /// outside the range of `f64`.
    Unsupported { kind: &'static str },
}

impl DelayCandidate {
    /// Coerces to a finite number. Strings are trimmed before parsing.
    pub fn parse(&self) -> Result<f64, DelayValidationError> {
        let parsed = match self {
            DelayCandidate::Number(n) => Some(*n),
            DelayCandidate::Text(text) => text.trim().parse::<f64>().ok(),
            DelayCandidate::Unsupported { .. } => None,
        };
        match parsed {
            Some(n) if n.is_finite() => Ok(n),
            _ => Err(DelayValidationError::Invalid { raw: self.describe() }),
        }
    }

    fn describe(&self) -> String {
        match self {
            DelayCandidate::Number(n) => n.to_string(),
            DelayCandidate::Text(text) => format!("{text:?}"),
            DelayCandidate::Unsupported { kind } => (*kind).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_passes_through() {
        assert_eq!(DelayCandidate::Number(120.0).parse(), Ok(120.0));
    }

    #[test]
    fn test_text_is_coerced() {
        assert_eq!(DelayCandidate::Text("75.9".into()).parse(), Ok(75.9));
        assert_eq!(DelayCandidate::Text(" 120 ".into()).parse(), Ok(120.0));
        assert_eq!(DelayCandidate::Text("-5".into()).parse(), Ok(-5.0));
    }

    #[test]
    fn test_non_numeric_text_is_invalid() {
        for raw in ["", "   ", "not-a-number", "12ms"] {
            let err = DelayCandidate::Text(raw.into()).parse().unwrap_err();
            assert_eq!(err.tag(), "Invalid delay value", "input {raw:?}");
        }
    }

    #[test]
    fn test_non_finite_text_is_invalid() {
        for raw in ["NaN", "inf", "-infinity"] {
            assert!(DelayCandidate::Text(raw.into()).parse().is_err(), "input {raw:?}");
        }
    }

    #[test]
    fn test_unsupported_kind_is_invalid() {
        let err = DelayCandidate::Unsupported { kind: "boolean" }
            .parse()
            .unwrap_err();
        assert_eq!(
            err,
            DelayValidationError::Invalid {
                raw: "boolean".into()
            }
        );
    }

    #[test]
    fn test_missing_message_names_field() {
        assert!(DelayValidationError::Missing.to_string().contains("delay"));
    }
}
