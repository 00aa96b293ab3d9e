//! `stores` command: read back what the receiver has stored.

use anyhow::Context;
use grocery_delivery::{DeliveryClient, StoreListing};

pub(crate) async fn run_stores(
    client: &DeliveryClient,
    grocery: Option<&str>,
    city: Option<&str>,
) -> anyhow::Result<()> {
    let stores = match (grocery, city) {
        (Some(grocery), Some(city)) => client
            .find_stores(grocery, city)
            .await
            .with_context(|| format!("failed to list {grocery} stores in {city}"))?,
        _ => client.list_stores().await.context("failed to list stores")?,
    };

    if stores.is_empty() {
        println!("No stores found.");
        return Ok(());
    }

    println!(
        "{:<24} {:<16} {:<36} {:>20}  PICKUP",
        "GROCERY", "CITY", "STREET", "LAT,LNG"
    );
    for store in &stores {
        println!("{}", format_row(store));
    }
    println!("\n{} store(s)", stores.len());
    Ok(())
}

fn format_row(store: &StoreListing) -> String {
    let coords = match (store.lat, store.lng) {
        (Some(lat), Some(lng)) => format!("{lat:.5},{lng:.5}"),
        _ => "-".to_owned(),
    };
    let pickup = match store.picks_up_in_store {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    };
    format!(
        "{:<24} {:<16} {:<36} {:>20}  {pickup}",
        store.grocery,
        store.city.as_deref().unwrap_or("-"),
        store.street.as_deref().filter(|s| !s.is_empty()).unwrap_or("-"),
        coords,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_row_fills_missing_columns() {
        let store = StoreListing {
            id: None,
            grocery: "Oasi".to_owned(),
            lat: None,
            lng: None,
            street: Some(String::new()),
            city: None,
            zip_code: None,
            working_hours: None,
            picks_up_in_store: None,
        };
        let row = format_row(&store);
        assert!(row.starts_with("Oasi "));
        assert!(row.ends_with("  -"));
        assert!(!row.contains("yes"));
    }

    #[test]
    fn format_row_prints_coordinates() {
        let store = StoreListing {
            id: Some(1),
            grocery: "pim".to_owned(),
            lat: Some(41.89),
            lng: Some(12.48),
            street: Some("Via di Casal Marmo, 329".to_owned()),
            city: Some("Roma".to_owned()),
            zip_code: Some("00135".to_owned()),
            working_hours: None,
            picks_up_in_store: Some(true),
        };
        let row = format_row(&store);
        assert!(row.contains("41.89000,12.48000"));
        assert!(row.contains("Via di Casal Marmo, 329"));
        assert!(row.ends_with("yes"));
    }
}
