//! Domain model: members, items, deliveries and the order aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::{ItemError, ShopError};

/// Lifecycle of an order.
///
/// The only legal transition is `Order` → `Cancelled`; nothing moves back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Order,
    Cancelled,
}

/// Lifecycle of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Ready,
    InProgress,
    Complete,
}

/// Postal address value object.
///
/// Embedded by value in both `Member` and `Delivery`; a delivery keeps the
/// copy taken at order time, not a live reference to the member's address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub street: String,
    pub zipcode: String,
}

impl Address {
    pub fn new(
        city: impl Into<String>,
        street: impl Into<String>,
        zipcode: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            street: street.into(),
            zipcode: zipcode.into(),
        }
    }
}

/// A registered member.
///
/// The name is unique by business rule, enforced with a pre-insert existence
/// check rather than a storage constraint (see `MemberService::join`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub address: Address,
}

impl Member {
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address,
        }
    }
}

/// Shipment record for a single order, owned one-to-one by the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: Uuid,
    pub address: Address,
    pub status: DeliveryStatus,
}

impl Delivery {
    /// Create a delivery bound for `address`, initially `Ready`.
    pub fn new(address: Address) -> Self {
        Self {
            id: Uuid::new_v4(),
            address,
            status: DeliveryStatus::Ready,
        }
    }
}

/// Catalog item subtype, discriminated by a kind tag.
///
/// All kinds share the same row shape (name, price, stock); only the
/// kind-specific attributes differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemKind {
    Book { author: String, isbn: String },
    Album { artist: String, etc: String },
    Movie { director: String, actor: String },
}

/// A sellable catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub stock_quantity: u32,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(name: impl Into<String>, price: i64, stock_quantity: u32, kind: ItemKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            stock_quantity,
            kind,
        }
    }

    /// Convenience constructor for the most common kind.
    pub fn book(
        name: impl Into<String>,
        price: i64,
        stock_quantity: u32,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            price,
            stock_quantity,
            ItemKind::Book {
                author: author.into(),
                isbn: isbn.into(),
            },
        )
    }

    /// Increase stock, e.g. when an order line is cancelled.
    ///
    /// Fails with `StockOverflow` when the sum would not fit in a `u32`,
    /// leaving the current stock untouched.
    pub fn add_stock(&mut self, quantity: u32) -> Result<(), ShopError> {
        self.stock_quantity = self.stock_quantity.checked_add(quantity).ok_or(
            ItemError::StockOverflow {
                item_id: self.id,
                current: self.stock_quantity,
                added: quantity,
            },
        )?;
        Ok(())
    }

    /// Decrease stock by an ordered quantity.
    ///
    /// Fails with `NotEnoughStock` when `quantity` exceeds what is on hand,
    /// leaving the current stock untouched. Stock never goes negative.
    pub fn remove_stock(&mut self, quantity: u32) -> Result<(), ShopError> {
        if quantity > self.stock_quantity {
            return Err(ItemError::NotEnoughStock {
                item_id: self.id,
                requested: quantity,
                available: self.stock_quantity,
            }
            .into());
        }
        self.stock_quantity -= quantity;
        Ok(())
    }
}

/// One line of an order: an item reference, the unit price frozen at order
/// time, and the ordered quantity.
///
/// `order_id` is set at creation and never reassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub order_price: i64,
    pub count: u32,
}

impl OrderItem {
    /// Create an order line. Zero-quantity lines are rejected.
    pub fn new(
        order_id: Uuid,
        item_id: Uuid,
        order_price: i64,
        count: u32,
    ) -> Result<Self, ShopError> {
        if count == 0 {
            return Err(ItemError::InvalidQuantity { count }.into());
        }
        Ok(Self {
            id: Uuid::new_v4(),
            order_id,
            item_id,
            order_price,
            count,
        })
    }

    /// Line total: unit price at order time times quantity.
    pub fn total_price(&self) -> i64 {
        self.order_price * i64::from(self.count)
    }
}

/// The order row itself.
///
/// Relations are carried as plain identity fields; the item collection and
/// the total price are derived by query, never stored on the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub member_id: Uuid,
    pub delivery_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Create a new order in status `Order`, stamped with the current time.
    pub fn new(member_id: Uuid, delivery_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            delivery_id,
            order_date: Utc::now(),
            status: OrderStatus::Order,
        }
    }
}
