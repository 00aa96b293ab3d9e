use thiserror::Error;

/// Why a raw record could not be turned into a canonical record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record is neither a store (street + picks_up_in_shop) nor a product (price + localization)")]
    Unclassified,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not numeric: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Why a canonical record was refused before submission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("product has neither name nor full_name")]
    MissingName,

    #[error("store name is empty")]
    EmptyStoreName,

    #[error("localization.grocery is empty")]
    EmptyGrocery,

    #[error("price must be non-negative (got {0})")]
    NegativePrice(f64),

    #[error("field `{0}` is not a finite number")]
    NonFinite(&'static str),

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Either stage of local ingestion failing. Both count as a skipped record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    #[error("rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("invalid: {0}")]
    Invalid(#[from] ValidationError),
}
