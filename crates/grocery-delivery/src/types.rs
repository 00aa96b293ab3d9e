//! Receiving-service response types.
//!
//! The receiver answers writes with `201 {"message", "<kind>", "action"}` and
//! reads with a `{"stores": [...]}` envelope.

use grocery_core::RecordKind;
use serde::Deserialize;

/// A record the receiver accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub kind: RecordKind,
    /// Number of HTTP attempts it took, starting at 1.
    pub attempts: u32,
    pub status: u16,
    /// `"created"` or `"updated"` when the receiver reports it.
    pub action: Option<String>,
}

/// Body of a successful `POST /api/{product|store}`. Only `action` is read.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct WriteResponse {
    #[serde(default)]
    pub action: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /api/store
// ---------------------------------------------------------------------------

/// Envelope for both store listing endpoints: `{ "stores": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct StoresResponse {
    #[serde(default)]
    pub stores: Vec<StoreListing>,
}

/// A store location as persisted by the receiver.
///
/// The receiver keys stores by chain name, so the store's `name` comes back
/// as `grocery`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoreListing {
    #[serde(default)]
    pub id: Option<i64>,
    pub grocery: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub working_hours: Option<String>,
    #[serde(default, alias = "picks_up_in_shop")]
    pub picks_up_in_store: Option<bool>,
}
