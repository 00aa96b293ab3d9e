//! Field-level coercions from scraped JSON values.
//!
//! Scrapers emit numbers as display strings (`"2,49 €"`), booleans as
//! `"True"`, and nested structures as Python `repr` text. Every function here
//! returns `Option` so the caller decides whether a failure is a default or a
//! rejection.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::literal::parse_literal;

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9,.]").expect("valid non-numeric regex"));

/// Coerces a JSON value to a finite `f64`.
///
/// Numbers are taken as-is. Strings keep an optional leading `+`/`-`, drop
/// every other character that is not a digit, comma or period, and read
/// commas as decimal points: `"-12,53"` → `-12.53`, `"€ 2,49"` → `2.49`.
#[must_use]
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_number_str(s),
        _ => None,
    }
}

/// String half of [`parse_number`].
#[must_use]
pub fn parse_number_str(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let cleaned = NON_NUMERIC.replace_all(rest, "").replace(',', ".");
    if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let parsed = cleaned.parse::<f64>().ok().filter(|f| f.is_finite())?;
    Some(if negative { -parsed } else { parsed })
}

/// Coerces a JSON value to a boolean.
///
/// Strings are `true` only for `"true"`, `"1"` or `"yes"` (any case, trimmed);
/// every other string is `false`. Numbers are `true` when non-zero. Returns
/// `None` for `null`, arrays and objects.
#[must_use]
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let lowered = s.trim().to_lowercase();
            Some(matches!(lowered.as_str(), "true" | "1" | "yes"))
        }
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerces a JSON value to a trimmed, non-empty string. Numbers are
/// stringified (zip codes often arrive as integers).
#[must_use]
pub fn optional_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolves a nested-object field that may have been flattened to Python
/// `repr` text, e.g. `"{'grocery': 'Tigre', 'lat': 41.9}"`.
#[must_use]
pub fn nested_object(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::String(s) => match parse_literal(s.trim())? {
            Value::Object(map) => Some(map),
            _ => None,
        },
        _ => None,
    }
}

/// Result of normalizing a `working_hours` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkingHours {
    /// A list or dict, re-serialized as compact JSON.
    Structured(String),
    /// Text that is not a list or dict literal, kept verbatim.
    Raw(String),
}

impl WorkingHours {
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            WorkingHours::Structured(s) | WorkingHours::Raw(s) => s,
        }
    }
}

/// Normalizes opening hours into a JSON string when they are a list or dict
/// (native or Python-literal text), otherwise keeps the raw text. Returns
/// `None` for `null` and blank strings.
#[must_use]
pub fn working_hours(value: &Value) -> Option<WorkingHours> {
    match value {
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => Some(WorkingHours::Structured(value.to_string())),
        Value::String(s) => {
            if s.trim().is_empty() {
                return None;
            }
            match parse_literal(s.trim()) {
                Some(parsed @ (Value::Array(_) | Value::Object(_))) => {
                    Some(WorkingHours::Structured(parsed.to_string()))
                }
                _ => Some(WorkingHours::Raw(s.clone())),
            }
        }
        Value::Bool(_) | Value::Number(_) => Some(WorkingHours::Raw(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn parse_number_accepts_json_numbers() {
        assert!(approx(parse_number(&json!(41.89)), 41.89));
        assert!(approx(parse_number(&json!(3)), 3.0));
    }

    #[test]
    fn parse_number_reads_decimal_comma() {
        assert!(approx(parse_number(&json!("2,49")), 2.49));
    }

    #[test]
    fn parse_number_keeps_leading_sign() {
        assert!(approx(parse_number(&json!("-12,53")), -12.53));
        assert!(approx(parse_number(&json!("+41.96")), 41.96));
        assert!(approx(parse_number(&json!("  -0.5 ")), -0.5));
    }

    #[test]
    fn parse_number_strips_currency_and_units() {
        assert!(approx(parse_number(&json!("€ 1,29")), 1.29));
        assert!(approx(parse_number(&json!("3.98 €/kg")), 3.98));
    }

    #[test]
    fn parse_number_rejects_text_without_digits() {
        assert_eq!(parse_number(&json!("n/a")), None);
        assert_eq!(parse_number(&json!("")), None);
        assert_eq!(parse_number(&json!("-")), None);
    }

    #[test]
    fn parse_number_rejects_ambiguous_separators() {
        // "1.234,56" becomes "1.234.56", which is not a number.
        assert_eq!(parse_number(&json!("1.234,56")), None);
    }

    #[test]
    fn parse_number_rejects_non_scalars() {
        assert_eq!(parse_number(&json!(null)), None);
        assert_eq!(parse_number(&json!(true)), None);
        assert_eq!(parse_number(&json!([1])), None);
    }

    #[test]
    fn coerce_bool_string_forms() {
        assert_eq!(coerce_bool(&json!("True")), Some(true));
        assert_eq!(coerce_bool(&json!("true")), Some(true));
        assert_eq!(coerce_bool(&json!(" 1 ")), Some(true));
        assert_eq!(coerce_bool(&json!("YES")), Some(true));
        assert_eq!(coerce_bool(&json!("False")), Some(false));
        assert_eq!(coerce_bool(&json!("no")), Some(false));
    }

    #[test]
    fn coerce_bool_other_forms() {
        assert_eq!(coerce_bool(&json!(true)), Some(true));
        assert_eq!(coerce_bool(&json!(0)), Some(false));
        assert_eq!(coerce_bool(&json!(2)), Some(true));
        assert_eq!(coerce_bool(&json!(null)), None);
    }

    #[test]
    fn optional_string_trims_and_drops_blank() {
        assert_eq!(optional_string(&json!("  Roma ")), Some("Roma".to_owned()));
        assert_eq!(optional_string(&json!("   ")), None);
        assert_eq!(optional_string(&json!(null)), None);
        assert_eq!(optional_string(&json!(139)), Some("139".to_owned()));
    }

    #[test]
    fn nested_object_from_python_repr() {
        let map = nested_object(&json!("{'grocery': 'Tigre', 'long': '12.53'}")).unwrap();
        assert_eq!(map["grocery"], json!("Tigre"));
        assert_eq!(map["long"], json!("12.53"));
    }

    #[test]
    fn nested_object_rejects_non_objects() {
        assert_eq!(nested_object(&json!("['a']")), None);
        assert_eq!(nested_object(&json!(4)), None);
    }

    #[test]
    fn working_hours_python_list() {
        assert_eq!(
            working_hours(&json!("['7:00 - 22:00']")),
            Some(WorkingHours::Structured(r#"["7:00 - 22:00"]"#.to_owned()))
        );
    }

    #[test]
    fn working_hours_native_object() {
        assert_eq!(
            working_hours(&json!({"lun": "8-20"})),
            Some(WorkingHours::Structured(r#"{"lun":"8-20"}"#.to_owned()))
        );
    }

    #[test]
    fn working_hours_free_text_is_kept() {
        assert_eq!(
            working_hours(&json!("Aperto la domenica8:30 - 13:00")),
            Some(WorkingHours::Raw("Aperto la domenica8:30 - 13:00".to_owned()))
        );
    }

    #[test]
    fn working_hours_structured_output_is_stable() {
        let once = working_hours(&json!("['7:00 - 22:00', \"Dom 9:00 - 13:00\"]"))
            .unwrap()
            .into_string();
        let twice = working_hours(&Value::String(once.clone()))
            .unwrap()
            .into_string();
        assert_eq!(once, twice);
    }

    #[test]
    fn working_hours_blank_is_none() {
        assert_eq!(working_hours(&json!("  ")), None);
        assert_eq!(working_hours(&json!(null)), None);
    }
}
