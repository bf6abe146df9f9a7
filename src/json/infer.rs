//! Type inference for stringly-typed form input.

use crate::json::JsonValue;

/// Convert a raw form token into the richest primitive it represents.
///
/// First match wins:
/// 1. `"true"` / `"false"` → bool
/// 2. base-10 integer (optional sign, leading zeros allowed) → int
/// 3. contains `.` and parses as a finite float → float
/// 4. anything else, including `""`, → the string unchanged
pub fn infer_type(token: &str) -> JsonValue {
    match token {
        "true" => return JsonValue::Bool(true),
        "false" => return JsonValue::Bool(false),
        _ => {}
    }

    if let Ok(int) = token.parse::<i64>() {
        return JsonValue::Int(int);
    }

    if token.contains('.') {
        if let Ok(float) = token.parse::<f64>() {
            // Out-of-range literals overflow to infinity, which JSON cannot carry.
            if float.is_finite() {
                return JsonValue::Float(float);
            }
        }
    }

    JsonValue::String(token.to_string())
}

#[cfg(test)]
#[allow(clippy::approx_constant)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_type() {
        let cases = [
            ("true", JsonValue::Bool(true)),
            ("false", JsonValue::Bool(false)),
            ("123", JsonValue::Int(123)),
            ("-456", JsonValue::Int(-456)),
            ("3.14", JsonValue::Float(3.14)),
            ("hello", JsonValue::from("hello")),
            ("", JsonValue::from("")),
            ("0", JsonValue::Int(0)),
            ("1", JsonValue::Int(1)),
        ];

        for (input, expected) in cases {
            assert_eq!(infer_type(input), expected, "infer_type({input:?})");
        }
    }

    #[test]
    fn test_precedence_edges() {
        assert_eq!(infer_type("01"), JsonValue::Int(1));
        assert_eq!(infer_type("1.0"), JsonValue::Float(1.0));
        assert_eq!(infer_type("True"), JsonValue::from("True"));
        // No decimal point, so never a float even though it parses as one.
        assert_eq!(infer_type("1e5"), JsonValue::from("1e5"));
        assert_eq!(infer_type("NaN"), JsonValue::from("NaN"));
        assert_eq!(infer_type("1.5e400"), JsonValue::from("1.5e400"));
        assert_eq!(infer_type("9223372036854775808"), JsonValue::from("9223372036854775808"));
        assert_eq!(infer_type("1.2.3"), JsonValue::from("1.2.3"));
        assert_eq!(infer_type(" 7"), JsonValue::from(" 7"));
    }
}
