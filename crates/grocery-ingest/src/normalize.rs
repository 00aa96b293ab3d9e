//! Normalization from raw scraped JSON to [`grocery_core::Product`] and
//! [`grocery_core::Store`].
//!
//! Field coercion is delegated to [`crate::coerce`]; this module decides which
//! fields are load-bearing. `price`, `lat` and `lng` reject the record when
//! they cannot be read. Everything else falls back to a default and logs a
//! warning.

use grocery_core::{Localization, Product, RecordKind, ScrapedRecord, Store};
use serde_json::{Map, Value};

use crate::classify::classify;
use crate::coerce::{
    coerce_bool, nested_object, optional_string, parse_number, working_hours, WorkingHours,
};
use crate::error::Rejection;

/// Normalizes one raw record into its canonical shape.
///
/// `kind` forces the shape; `None` classifies with [`classify`].
///
/// # Errors
///
/// - [`Rejection::NotAnObject`] if `raw` is not a JSON object.
/// - [`Rejection::Unclassified`] if `kind` is `None` and classification fails.
/// - [`Rejection::MissingField`] / [`Rejection::InvalidField`] if a
///   load-bearing field is absent or unparsable.
pub fn normalize_record(
    raw: &Value,
    kind: Option<RecordKind>,
) -> Result<ScrapedRecord, Rejection> {
    let record = raw.as_object().ok_or(Rejection::NotAnObject)?;
    let kind = match kind {
        Some(kind) => kind,
        None => classify(record)?,
    };

    match kind {
        RecordKind::Product => normalize_product(record).map(ScrapedRecord::Product),
        RecordKind::Store => normalize_store(record).map(ScrapedRecord::Store),
    }
}

/// Normalizes a raw product.
///
/// `name` and `full_name` fill each other when only one is present. A
/// `localization` given as Python `repr` text is parsed; its legacy `long` key
/// is read as `lng`. `discount` is clamped to `[0.0, 1.0]`.
///
/// # Errors
///
/// Returns a [`Rejection`] when `price`, `localization`, `localization.lat`
/// or `localization.lng` is missing or unparsable.
pub fn normalize_product(record: &Map<String, Value>) -> Result<Product, Rejection> {
    let name = string_field(record, "name");
    let full_name = string_field(record, "full_name");
    let (name, full_name) = match (name, full_name) {
        (Some(name), Some(full_name)) => (name, full_name),
        (Some(name), None) => (name.clone(), name),
        (None, Some(full_name)) => (full_name.clone(), full_name),
        (None, None) => (String::new(), String::new()),
    };

    let price = required_number(record, "price", "price")?;

    let localization = present(record, "localization")
        .ok_or(Rejection::MissingField("localization"))?;
    let localization = nested_object(localization).ok_or_else(|| Rejection::InvalidField {
        field: "localization",
        value: localization.to_string(),
    })?;
    let localization = normalize_localization(&localization)?;

    let discount = lenient_number(record, "discount");
    let clamped = discount.clamp(0.0, 1.0);
    if clamped != discount {
        tracing::warn!(
            name = %name,
            discount,
            clamped,
            "discount outside [0, 1], clamped"
        );
    }

    Ok(Product {
        price_for_kg: lenient_number(record, "price_for_kg"),
        description: string_field(record, "description"),
        img_url: string_field(record, "img_url"),
        quantity: string_field(record, "quantity"),
        name,
        full_name,
        price,
        discount: clamped,
        localization,
    })
}

fn normalize_localization(loc: &Map<String, Value>) -> Result<Localization, Rejection> {
    Ok(Localization {
        grocery: string_field(loc, "grocery").unwrap_or_default(),
        lat: required_number(loc, "lat", "localization.lat")?,
        lng: required_longitude(loc, "localization.lng")?,
        street: string_field(loc, "street"),
    })
}

/// Normalizes a raw store.
///
/// The legacy `long` key is read as `lng`. `working_hours` becomes a compact
/// JSON string when it is a list or dict; `picks_up_in_shop` is coerced from
/// its string forms and defaults to `false`.
///
/// # Errors
///
/// Returns a [`Rejection`] when `lat` or `lng` is missing or unparsable.
pub fn normalize_store(record: &Map<String, Value>) -> Result<Store, Rejection> {
    let name = string_field(record, "name").unwrap_or_default();
    let lat = required_number(record, "lat", "lat")?;
    let lng = required_longitude(record, "lng")?;

    let picks_up_in_shop = match present(record, "picks_up_in_shop") {
        None => false,
        Some(raw) => coerce_bool(raw).unwrap_or_else(|| {
            tracing::warn!(
                store = %name,
                value = %raw,
                "picks_up_in_shop is not a boolean, defaulting to false"
            );
            false
        }),
    };

    let working_hours = record.get("working_hours").and_then(working_hours).map(|wh| {
        if let WorkingHours::Raw(text) = &wh {
            if text.trim_start().starts_with(['[', '{']) {
                tracing::warn!(
                    store = %name,
                    working_hours = %text,
                    "unparsable working_hours kept as text"
                );
            }
        }
        wh.into_string()
    });

    Ok(Store {
        street: string_field(record, "street"),
        city: string_field(record, "city"),
        zip_code: string_field(record, "zip_code"),
        name,
        lat,
        lng,
        working_hours,
        picks_up_in_shop,
    })
}

/// Returns the value under `key` unless it is absent or `null`.
fn present<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| !v.is_null())
}

fn string_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    present(record, key).and_then(optional_string)
}

/// Reads a load-bearing numeric field. `label` names the field in the
/// rejection, including its parent for nested fields.
fn required_number(
    record: &Map<String, Value>,
    key: &str,
    label: &'static str,
) -> Result<f64, Rejection> {
    let raw = present(record, key).ok_or(Rejection::MissingField(label))?;
    parse_number(raw).ok_or_else(|| Rejection::InvalidField {
        field: label,
        value: raw.to_string(),
    })
}

/// Reads `lng`, falling back to the legacy `long` spelling.
fn required_longitude(
    record: &Map<String, Value>,
    label: &'static str,
) -> Result<f64, Rejection> {
    let key = if present(record, "lng").is_some() {
        "lng"
    } else {
        "long"
    };
    required_number(record, key, label)
}

/// Reads an optional numeric field, defaulting to `0.0` when absent or
/// unparsable.
fn lenient_number(record: &Map<String, Value>, key: &str) -> f64 {
    match present(record, key) {
        None => 0.0,
        Some(raw) => parse_number(raw).unwrap_or_else(|| {
            tracing::warn!(field = key, value = %raw, "unparsable number, defaulting to 0.0");
            0.0
        }),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
