//! In-memory fakes for the two external collaborators, used by the engine
//! integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use storebot::catalog::{CatalogApi, CatalogEntry, ItemDetail, ItemSummary, Stock};
use storebot::config::Config;
use storebot::requests::{NewRequest, Request, RequestMessage, RequestStoreApi, StoreError};

pub fn entry(id: i64, name: &str) -> CatalogEntry {
    CatalogEntry {
        id,
        name: name.to_string(),
    }
}

pub fn test_config(admin_chat_id: i64) -> Config {
    Config {
        bot_token: "test-token".to_string(),
        catalog_base_url: "http://catalog.test".to_string(),
        store_base_url: "http://store.test".to_string(),
        admin_chat_id,
    }
}

/// Catalog fake backed by plain maps; absent keys behave like the real
/// client's empty-on-failure contract.
#[derive(Default)]
pub struct FakeCatalog {
    pub categories: Vec<CatalogEntry>,
    pub subcategories: HashMap<i64, Vec<CatalogEntry>>,
    pub brands: HashMap<i64, Vec<CatalogEntry>>,
    pub models: HashMap<i64, Vec<CatalogEntry>>,
    pub items: HashMap<i64, Vec<CatalogEntry>>,
    pub details: HashMap<i64, ItemDetail>,
    pub stocks: HashMap<i64, Stock>,
    pub search_hits: Vec<ItemSummary>,
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_categories(&self) -> Vec<CatalogEntry> {
        self.categories.clone()
    }

    async fn list_subcategories(&self, category_id: i64) -> Vec<CatalogEntry> {
        self.subcategories.get(&category_id).cloned().unwrap_or_default()
    }

    async fn list_brands(&self, subcategory_id: i64) -> Vec<CatalogEntry> {
        self.brands.get(&subcategory_id).cloned().unwrap_or_default()
    }

    async fn list_models(&self, brand_id: i64) -> Vec<CatalogEntry> {
        self.models.get(&brand_id).cloned().unwrap_or_default()
    }

    async fn list_items(&self, model_id: i64) -> Vec<CatalogEntry> {
        self.items.get(&model_id).cloned().unwrap_or_default()
    }

    async fn get_item(&self, item_id: i64) -> Option<ItemDetail> {
        self.details.get(&item_id).cloned()
    }

    async fn get_stock(&self, item_id: i64) -> Option<Stock> {
        self.stocks.get(&item_id).cloned()
    }

    async fn search(&self, _query: &str) -> Vec<ItemSummary> {
        self.search_hits.clone()
    }
}

/// Request store fake that records every call so tests can assert exactly
/// what reached the collaborator.
#[derive(Default)]
pub struct FakeStore {
    pub seeded: Vec<Request>,
    pub created: Mutex<Vec<NewRequest>>,
    pub messages: Mutex<Vec<(i64, i64, String)>>,
    pub fail_writes: bool,
    pub calls: AtomicUsize,
}

impl FakeStore {
    pub fn with_seeded(seeded: Vec<Request>) -> Self {
        Self {
            seeded,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn created_requests(&self) -> Vec<NewRequest> {
        self.created.lock().unwrap().clone()
    }

    pub fn logged_messages(&self) -> Vec<(i64, i64, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestStoreApi for FakeStore {
    async fn create_request(&self, new: NewRequest) -> Result<Request, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.created.lock().unwrap().push(new.clone());
        if self.fail_writes {
            return Err(StoreError::Status(503));
        }
        Ok(Request {
            id: 100 + self.created.lock().unwrap().len() as i64,
            user_id: new.user_id,
            username: new.username,
            name: new.name,
            phone: new.phone,
            address: new.address,
            additional_text: new.additional_text,
            item_id: new.item_id,
            is_responded: false,
        })
    }

    async fn create_message(
        &self,
        request_id: i64,
        sender_id: i64,
        content: &str,
    ) -> Result<RequestMessage, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(StoreError::Status(503));
        }
        self.messages
            .lock()
            .unwrap()
            .push((request_id, sender_id, content.to_string()));
        Ok(RequestMessage {
            id: self.messages.lock().unwrap().len() as i64,
            request_id,
            sender_id,
            content: content.to_string(),
        })
    }

    async fn list_requests(&self) -> Vec<Request> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seeded.clone()
    }

    async fn get_request(&self, request_id: i64) -> Option<Request> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seeded.iter().find(|r| r.id == request_id).cloned()
    }
}

pub fn seeded_request(id: i64, user_id: i64, is_responded: bool) -> Request {
    Request {
        id,
        user_id,
        username: Some(format!("user{}", user_id)),
        name: format!("User {}", user_id),
        phone: "555-0000".to_string(),
        address: "1 Main St".to_string(),
        additional_text: None,
        item_id: None,
        is_responded,
    }
}
