//! # Catalog Client Module
//!
//! Read-only client for the catalog service. Every call maps a non-success
//! status or transport failure to an empty list or absent value; the
//! dispatcher never sees an error from this module.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One level of the catalog hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Category,
    Subcategory,
    Brand,
    Model,
    Item,
}

impl Tier {
    /// The tier reached by selecting an entry at this tier, if any
    pub fn child(self) -> Option<Tier> {
        match self {
            Tier::Category => Some(Tier::Subcategory),
            Tier::Subcategory => Some(Tier::Brand),
            Tier::Brand => Some(Tier::Model),
            Tier::Model => Some(Tier::Item),
            Tier::Item => None,
        }
    }

    /// Stable tag used in button payloads
    pub fn tag(self) -> &'static str {
        match self {
            Tier::Category => "category",
            Tier::Subcategory => "subcategory",
            Tier::Brand => "brand",
            Tier::Model => "model",
            Tier::Item => "item",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Tier> {
        match tag {
            "category" => Some(Tier::Category),
            "subcategory" => Some(Tier::Subcategory),
            "brand" => Some(Tier::Brand),
            "model" => Some(Tier::Model),
            "item" => Some(Tier::Item),
            _ => None,
        }
    }
}

/// One entry of a catalog tier listing (category, subcategory, brand, model
/// or item). Ids are opaque to the bot and only echoed back to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
}

/// Full detail record for a single item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Stock levels for a single item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default)]
    pub item: Option<String>,
    pub quantity: i64,
    pub is_available: bool,
}

/// One full-text search hit. Brand and model are present only when the
/// search endpoint embeds them; otherwise they are filled in from a
/// per-item detail fetch before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Read-only interface to the catalog service
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_categories(&self) -> Vec<CatalogEntry>;
    async fn list_subcategories(&self, category_id: i64) -> Vec<CatalogEntry>;
    async fn list_brands(&self, subcategory_id: i64) -> Vec<CatalogEntry>;
    async fn list_models(&self, brand_id: i64) -> Vec<CatalogEntry>;
    async fn list_items(&self, model_id: i64) -> Vec<CatalogEntry>;
    async fn get_item(&self, item_id: i64) -> Option<ItemDetail>;
    async fn get_stock(&self, item_id: i64) -> Option<Stock>;
    async fn search(&self, query: &str) -> Vec<ItemSummary>;
}

/// HTTP implementation of [`CatalogApi`]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Run one GET and decode the JSON body. Non-2xx and transport errors
    /// are logged and collapse to `None`.
    async fn fetch<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder, what: &str) -> Option<T> {
        match req.send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<T>().await {
                    Ok(value) => Some(value),
                    Err(e) => {
                        warn!(what, error = %e, "Failed to decode catalog response");
                        None
                    }
                }
            }
            Ok(response) => {
                warn!(what, status = %response.status(), "Catalog returned non-success status");
                None
            }
            Err(e) => {
                warn!(what, error = %e, "Catalog request failed");
                None
            }
        }
    }

    async fn fetch_list(&self, path: &str, what: &str) -> Vec<CatalogEntry> {
        self.fetch(self.http.get(self.url(path)), what)
            .await
            .unwrap_or_default()
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn list_categories(&self) -> Vec<CatalogEntry> {
        self.fetch_list("/categories/", "categories").await
    }

    async fn list_subcategories(&self, category_id: i64) -> Vec<CatalogEntry> {
        self.fetch_list(
            &format!("/categories/{}/subcategories/", category_id),
            "subcategories",
        )
        .await
    }

    async fn list_brands(&self, subcategory_id: i64) -> Vec<CatalogEntry> {
        self.fetch_list(&format!("/subcategories/{}/brands/", subcategory_id), "brands")
            .await
    }

    async fn list_models(&self, brand_id: i64) -> Vec<CatalogEntry> {
        self.fetch_list(&format!("/brands/{}/models/", brand_id), "models")
            .await
    }

    async fn list_items(&self, model_id: i64) -> Vec<CatalogEntry> {
        self.fetch_list(&format!("/models/{}/items/", model_id), "items")
            .await
    }

    async fn get_item(&self, item_id: i64) -> Option<ItemDetail> {
        self.fetch(self.http.get(self.url(&format!("/items/{}/", item_id))), "item detail")
            .await
    }

    async fn get_stock(&self, item_id: i64) -> Option<Stock> {
        self.fetch(
            self.http.get(self.url(&format!("/items/{}/stocks/", item_id))),
            "stock",
        )
        .await
    }

    async fn search(&self, query: &str) -> Vec<ItemSummary> {
        self.fetch(
            self.http
                .get(self.url("/items/search/"))
                .query(&[("q", query)]),
            "search",
        )
        .await
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = CatalogClient::new("https://store.example.com/");
        assert_eq!(
            client.url("/categories/"),
            "https://store.example.com/categories/"
        );
    }

    #[test]
    fn test_entry_deserialization() {
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(r#"[{"id": 5, "name": "Phones"}, {"id": 9, "name": "Tablets"}]"#)
                .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 5);
        assert_eq!(entries[1].name, "Tablets");
    }

    #[test]
    fn test_item_detail_tolerates_missing_fields() {
        let detail: ItemDetail =
            serde_json::from_str(r#"{"id": 42, "name": "Galaxy S24"}"#).unwrap();
        assert_eq!(detail.id, 42);
        assert!(detail.description.is_none());
        assert!(detail.price.is_none());
    }

    #[test]
    fn test_stock_deserialization() {
        let stock: Stock =
            serde_json::from_str(r#"{"item": "Galaxy S24", "quantity": 3, "is_available": true}"#)
                .unwrap();
        assert_eq!(stock.quantity, 3);
        assert!(stock.is_available);
    }
}
