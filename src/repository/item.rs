//! Item repository

use std::sync::Arc;
use uuid::Uuid;

use crate::core::domain::Item;
use crate::core::error::ShopError;
use crate::core::store::ShopStore;

/// Data access for catalog items.
#[derive(Clone)]
pub struct ItemRepository {
    store: Arc<dyn ShopStore>,
}

impl ItemRepository {
    pub fn new(store: Arc<dyn ShopStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, item: Item) -> Result<Item, ShopError> {
        Ok(self.store.insert_item(item).await?)
    }

    pub async fn find_one(&self, id: &Uuid) -> Result<Option<Item>, ShopError> {
        Ok(self.store.find_item(id).await?)
    }

    pub async fn find_all(&self) -> Result<Vec<Item>, ShopError> {
        Ok(self.store.list_items().await?)
    }

    /// Explicit write of an already-loaded, transformed item.
    pub async fn update(&self, item: Item) -> Result<Item, ShopError> {
        Ok(self.store.update_item(item).await?)
    }
}
