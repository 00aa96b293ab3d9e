//! Pre-submission gate for canonical records.
//!
//! The receiving API re-validates everything; these checks exist so that
//! records it would refuse with a 400 are counted as skipped locally instead
//! of costing a request.

use grocery_core::{Product, ScrapedRecord, Store};

use crate::error::ValidationError;

/// Validates a canonical record of either kind.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate(record: &ScrapedRecord) -> Result<(), ValidationError> {
    match record {
        ScrapedRecord::Product(p) => validate_product(p),
        ScrapedRecord::Store(s) => validate_store(s),
    }
}

/// Boolean form of [`validate`].
#[must_use]
pub fn is_valid(record: &ScrapedRecord) -> bool {
    validate(record).is_ok()
}

/// # Errors
///
/// - [`ValidationError::MissingName`] if both `name` and `full_name` are empty.
/// - [`ValidationError::NonFinite`] / [`ValidationError::NegativePrice`] for a
///   bad `price`.
/// - [`ValidationError::EmptyGrocery`] if `localization.grocery` is empty.
/// - coordinate errors from the localization.
pub fn validate_product(product: &Product) -> Result<(), ValidationError> {
    if product.name.trim().is_empty() && product.full_name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if !product.price.is_finite() {
        return Err(ValidationError::NonFinite("price"));
    }
    if product.price < 0.0 {
        return Err(ValidationError::NegativePrice(product.price));
    }
    if product.localization.grocery.trim().is_empty() {
        return Err(ValidationError::EmptyGrocery);
    }
    validate_coordinates(product.localization.lat, product.localization.lng)
}

/// # Errors
///
/// - [`ValidationError::EmptyStoreName`] if `name` is empty.
/// - coordinate errors.
pub fn validate_store(store: &Store) -> Result<(), ValidationError> {
    if store.name.trim().is_empty() {
        return Err(ValidationError::EmptyStoreName);
    }
    validate_coordinates(store.lat, store.lng)
}

fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() {
        return Err(ValidationError::NonFinite("lat"));
    }
    if !lng.is_finite() {
        return Err(ValidationError::NonFinite("lng"));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::LatitudeOutOfRange(lat));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(ValidationError::LongitudeOutOfRange(lng));
    }
    Ok(())
}
