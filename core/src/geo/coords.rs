use serde_json::Value;

pub const LATITUDE_LIMIT: f64 = 90.0;
pub const LONGITUDE_LIMIT: f64 = 180.0;

/// Converts a raw coordinate value into a finite `f64`.
///
/// JSON numbers and strings holding a decimal number qualify. Anything else
/// (booleans, null, nested arrays/objects, `NaN`/`inf` spellings) yields `None`.
pub fn coerce_coordinate(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_decimal(s.trim())?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn parse_decimal(text: &str) -> Option<f64> {
    // f64::from_str also accepts "inf" and "NaN"; only digits count here
    let has_digit = text.bytes().any(|b| b.is_ascii_digit());
    if !has_digit {
        return None;
    }
    text.parse::<f64>().ok()
}

pub fn latitude_in_range(latitude: f64) -> bool {
    (-LATITUDE_LIMIT..=LATITUDE_LIMIT).contains(&latitude)
}

pub fn longitude_in_range(longitude: f64) -> bool {
    (-LONGITUDE_LIMIT..=LONGITUDE_LIMIT).contains(&longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_and_numeric_strings_coerce() {
        assert_eq!(coerce_coordinate(&json!(-34.9285)), Some(-34.9285));
        assert_eq!(coerce_coordinate(&json!(138)), Some(138.0));
        assert_eq!(coerce_coordinate(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(coerce_coordinate(&json!("-1e1")), Some(-10.0));
    }

    #[test]
    fn non_scalar_and_non_finite_values_are_refused() {
        assert_eq!(coerce_coordinate(&json!(null)), None);
        assert_eq!(coerce_coordinate(&json!(true)), None);
        assert_eq!(coerce_coordinate(&json!([1.0, 2.0])), None);
        assert_eq!(coerce_coordinate(&json!({"value": 1.0})), None);
        assert_eq!(coerce_coordinate(&json!("north")), None);
        assert_eq!(coerce_coordinate(&json!("NaN")), None);
        assert_eq!(coerce_coordinate(&json!("inf")), None);
        assert_eq!(coerce_coordinate(&json!("")), None);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(latitude_in_range(90.0));
        assert!(latitude_in_range(-90.0));
        assert!(!latitude_in_range(95.0));
        assert!(longitude_in_range(-180.0));
        assert!(!longitude_in_range(180.5));
    }
}
