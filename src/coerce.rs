//! Scalar coercion and decimal rounding for property values.

use serde_json::Value;

/// Interpret a JSON value as a finite float.
///
/// Accepts numbers, booleans (`1.0` / `0.0`) and strings holding a decimal literal (surrounding
/// whitespace allowed). Non-finite results are rejected since they have no JSON encoding.
pub fn to_float(v: &Value) -> Option<f64> {
    let x = match v {
        Value::Number(n) => n.as_f64()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    x.is_finite().then_some(x)
}

/// Interpret a JSON value as an integer, truncating floats toward zero.
pub fn to_integer(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            if n.is_u64() {
                return None;
            }
            let x = n.as_f64()?.trunc();
            // i64::MAX is not representable; the exclusive bound is 2^63.
            if x.is_finite() && x >= i64::MIN as f64 && x < 9_223_372_036_854_775_808.0 {
                Some(x as i64)
            } else {
                None
            }
        }
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Truthiness: `null` and zero are false, empty strings/arrays/objects are false.
pub fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Round to `decimals` places, half-to-even on the exact binary value.
///
/// Goes through the formatter, which rounds the exact decimal expansion, so `2.675` (stored as
/// `2.67499999...`) rounds down and `0.125` rounds to `0.12`.
pub fn round_to(x: f64, decimals: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    format!("{:.*}", decimals as usize, x)
        .parse::<f64>()
        .unwrap_or(x)
}

/// Short rendering of an offending value for diagnostics.
pub fn describe(v: &Value) -> String {
    const MAX: usize = 64;
    let s = v.to_string();
    if s.chars().count() <= MAX {
        return s;
    }
    let mut out: String = s.chars().take(MAX).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn float_accepts_numbers_bools_and_numeric_strings() {
        assert_eq!(to_float(&json!(87.456)), Some(87.456));
        assert_eq!(to_float(&json!(1200)), Some(1200.0));
        assert_eq!(to_float(&json!(true)), Some(1.0));
        assert_eq!(to_float(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(to_float(&json!("-3e2")), Some(-300.0));
    }

    #[test]
    fn float_rejects_non_numeric() {
        assert_eq!(to_float(&json!("high")), None);
        assert_eq!(to_float(&json!("")), None);
        assert_eq!(to_float(&json!("nan")), None);
        assert_eq!(to_float(&json!("inf")), None);
        assert_eq!(to_float(&Value::Null), None);
        assert_eq!(to_float(&json!([1.0])), None);
        assert_eq!(to_float(&json!({ "v": 1 })), None);
    }

    #[test]
    fn integer_truncates_toward_zero() {
        assert_eq!(to_integer(&json!(1200)), Some(1200));
        assert_eq!(to_integer(&json!(1200.9)), Some(1200));
        assert_eq!(to_integer(&json!(-7.9)), Some(-7));
        assert_eq!(to_integer(&json!(false)), Some(0));
        assert_eq!(to_integer(&json!(" 42 ")), Some(42));
    }

    #[test]
    fn integer_rejects_fractional_strings_and_overflow() {
        assert_eq!(to_integer(&json!("12.5")), None);
        assert_eq!(to_integer(&json!("many")), None);
        assert_eq!(to_integer(&json!(u64::MAX)), None);
        assert_eq!(to_integer(&json!(1e300)), None);
        assert_eq!(to_integer(&Value::Null), None);
    }

    #[test]
    fn truthiness() {
        assert!(truthy(&json!(true)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(0.0)));
        assert!(truthy(&json!(2)));
        assert!(truthy(&json!("no")));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!([])));
        assert!(truthy(&json!({ "a": 1 })));
    }

    #[test]
    fn rounding_is_half_even_on_exact_value() {
        assert_eq!(round_to(87.456, 2), 87.46);
        assert_eq!(round_to(29.123456789, 6), 29.123457);
        assert_eq!(round_to(-110.987654321, 6), -110.987654);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(1e20, 2), 1e20);
    }

    #[test]
    fn describe_truncates_long_values() {
        assert_eq!(describe(&json!("abc")), "\"abc\"");
        let long = json!("x".repeat(200));
        let d = describe(&long);
        assert!(d.ends_with("..."));
        assert_eq!(d.chars().count(), 67);
    }
}
