pub mod classify;
pub mod coerce;
pub mod error;
mod literal;
pub mod normalize;
pub mod validate;

pub use classify::classify;
pub use error::{IngestError, Rejection, ValidationError};
pub use normalize::{normalize_product, normalize_record, normalize_store};
pub use validate::{is_valid, validate, validate_product, validate_store};

use grocery_core::{RecordKind, ScrapedRecord};

/// Normalizes and validates one raw record, yielding a record ready for
/// submission.
///
/// `kind` forces the record shape for homogeneous batches; `None` classifies
/// by key presence.
///
/// # Errors
///
/// Returns [`IngestError::Rejected`] when the record cannot be normalized and
/// [`IngestError::Invalid`] when the normalized record fails validation.
pub fn ingest_record(
    raw: &serde_json::Value,
    kind: Option<RecordKind>,
) -> Result<ScrapedRecord, IngestError> {
    let record = normalize_record(raw, kind)?;
    validate(&record)?;
    Ok(record)
}
