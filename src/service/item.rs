//! Item service: catalog maintenance

use uuid::Uuid;

use crate::core::domain::Item;
use crate::core::error::{ItemError, ShopError};
use crate::repository::ItemRepository;

/// Business operations on catalog items.
#[derive(Clone)]
pub struct ItemService {
    items: ItemRepository,
}

impl ItemService {
    pub fn new(items: ItemRepository) -> Self {
        Self { items }
    }

    pub async fn save(&self, item: Item) -> Result<Uuid, ShopError> {
        let item = self.items.save(item).await?;
        tracing::info!(item_id = %item.id, name = %item.name, "item saved");
        Ok(item.id)
    }

    /// Update an item's fields: load, transform, explicit save.
    ///
    /// The caller passes the new values; there is no implicit diff of a
    /// mutated entity at some later commit point.
    pub async fn update(
        &self,
        id: &Uuid,
        name: &str,
        price: i64,
        stock_quantity: u32,
    ) -> Result<(), ShopError> {
        let mut item = self
            .items
            .find_one(id)
            .await?
            .ok_or(ItemError::NotFound { id: *id })?;
        item.name = name.to_string();
        item.price = price;
        item.stock_quantity = stock_quantity;
        self.items.update(item).await?;
        Ok(())
    }

    pub async fn find_items(&self) -> Result<Vec<Item>, ShopError> {
        self.items.find_all().await
    }

    pub async fn find_one(&self, id: &Uuid) -> Result<Item, ShopError> {
        self.items
            .find_one(id)
            .await?
            .ok_or_else(|| ItemError::NotFound { id: *id }.into())
    }
}
