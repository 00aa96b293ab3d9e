use serde::{Deserialize, Serialize};

/// Which canonical shape a record has, and therefore which receiving
/// endpoint it is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Product,
    Store,
}

impl RecordKind {
    /// Path segment of the receiving endpoint (`/api/{segment}`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Product => "product",
            RecordKind::Store => "store",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a product was scraped: the store name plus its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    pub grocery: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
}

/// One catalog item at one store, in the shape the receiving API expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub full_name: String,
    pub price: f64,
    /// Fraction in `[0.0, 1.0]`.
    pub discount: f64,
    pub price_for_kg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
    /// Pack size as printed on the shelf, e.g. `"400 gr"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    pub localization: Localization,
}

/// A physical retail location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Always serialized (as `null` when unknown); its presence is what marks
    /// a raw record as a store.
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    /// Opening hours as a compact JSON string, or raw text when the scraped
    /// value could not be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<String>,
    #[serde(default)]
    pub picks_up_in_shop: bool,
}

/// A record after classification and normalization.
///
/// Serializes as the inner record, which is exactly the request body sent to
/// the receiving API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScrapedRecord {
    Product(Product),
    Store(Store),
}

impl ScrapedRecord {
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            ScrapedRecord::Product(_) => RecordKind::Product,
            ScrapedRecord::Store(_) => RecordKind::Store,
        }
    }

    /// Human-readable identifier used in log lines.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            ScrapedRecord::Product(p) if !p.name.is_empty() => &p.name,
            ScrapedRecord::Product(p) => &p.full_name,
            ScrapedRecord::Store(s) => &s.name,
        }
    }

    /// Store the record belongs to: the localization grocery for products,
    /// the store's own name for stores.
    #[must_use]
    pub fn grocery(&self) -> &str {
        match self {
            ScrapedRecord::Product(p) => &p.localization.grocery,
            ScrapedRecord::Store(s) => &s.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            name: "Banane 1kg".to_owned(),
            full_name: "Banane 1kg".to_owned(),
            price: 2.49,
            discount: 0.0,
            price_for_kg: 0.0,
            description: None,
            img_url: None,
            quantity: None,
            localization: Localization {
                grocery: "Tigre".to_owned(),
                lat: 41.96,
                lng: 12.53,
                street: None,
            },
        }
    }

    fn store() -> Store {
        Store {
            name: "pim".to_owned(),
            lat: 41.89,
            lng: 12.48,
            street: None,
            city: Some("Roma".to_owned()),
            zip_code: None,
            working_hours: None,
            picks_up_in_shop: true,
        }
    }

    #[test]
    fn record_kind_paths() {
        assert_eq!(RecordKind::Product.as_str(), "product");
        assert_eq!(RecordKind::Store.to_string(), "store");
    }

    #[test]
    fn product_serializes_without_absent_optionals() {
        let json = serde_json::to_value(ScrapedRecord::Product(product())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Banane 1kg",
                "full_name": "Banane 1kg",
                "price": 2.49,
                "discount": 0.0,
                "price_for_kg": 0.0,
                "localization": { "grocery": "Tigre", "lat": 41.96, "lng": 12.53 }
            })
        );
    }

    #[test]
    fn store_serializes_street_as_null() {
        let json = serde_json::to_value(ScrapedRecord::Store(store())).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("street"));
        assert!(obj["street"].is_null());
        assert!(!obj.contains_key("long"));
        assert!(!obj.contains_key("zip_code"));
        assert_eq!(obj["picks_up_in_shop"], serde_json::json!(true));
    }

    #[test]
    fn display_name_falls_back_to_full_name() {
        let mut p = product();
        p.name = String::new();
        p.full_name = "Pasta Barilla 500g".to_owned();
        assert_eq!(ScrapedRecord::Product(p).display_name(), "Pasta Barilla 500g");
    }

    #[test]
    fn grocery_of_store_is_its_name() {
        assert_eq!(ScrapedRecord::Store(store()).grocery(), "pim");
        assert_eq!(ScrapedRecord::Product(product()).grocery(), "Tigre");
    }
}
