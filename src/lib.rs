//! # Ordershop
//!
//! An order-management data-access core: a small shop domain (members,
//! items, orders, deliveries) with a query layer built around three
//! interchangeable search strategies and collection-fetch patterns that
//! avoid the N+1 round-trip trap.
//!
//! ## Features
//!
//! - **Domain Model**: Orders, order lines, members, deliveries and a
//!   tagged item hierarchy (book / album / movie)
//! - **Three Search Strategies**: Text query, criteria list and a typed
//!   builder, all compiling to the same query plan
//! - **Eager Association Fetch**: Joined to-one loading with de-dup and a
//!   guard that rejects paginating across collection joins
//! - **Batched Collections**: Load N order item lists in one `IN` query
//!   and regroup in memory
//! - **Flat Regrouping**: Fold a single fully-joined result set back into
//!   per-order trees
//! - **Query Counting**: Every store round trip is counted, so fetch
//!   strategies are testable
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ordershop::prelude::*;
//!
//! let store: Arc<dyn ShopStore> = Arc::new(InMemoryShopStore::new());
//! let members = MemberService::new(MemberRepository::new(store.clone()));
//! let items = ItemService::new(ItemRepository::new(store.clone()));
//! let orders = OrderService::new(
//!     OrderRepository::new(store.clone()),
//!     MemberRepository::new(store.clone()),
//!     ItemRepository::new(store.clone()),
//! );
//!
//! let member_id = members
//!     .join("userA", Address::new("Seoul", "1", "12345"))
//!     .await?;
//! let book_id = items
//!     .save(Item::book("JPA BOOK", 10_000, 100, "kim", "1111"))
//!     .await?;
//!
//! let order_id = orders
//!     .place_order(&member_id, &[OrderLineRequest { item_id: book_id, count: 2 }])
//!     .await?;
//! orders.cancel_order(&order_id).await?;
//! ```

pub mod config;
pub mod core;
pub mod repository;
pub mod service;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Domain ===
    pub use crate::core::domain::{
        Address, Delivery, DeliveryStatus, Item, ItemKind, Member, Order, OrderItem, OrderStatus,
    };

    // === Errors ===
    pub use crate::core::error::{
        ErrorResponse, ItemError, MemberError, OrderError, QueryError, ShopError, StorageError,
    };

    // === Query layer ===
    pub use crate::core::filter::{OrderFilter, Page};
    pub use crate::core::projection::{
        FlatOrderRow, ItemLineProjection, OrderGraph, OrderLineRow, OrderProjection, OrderSummary,
        OrderToOneRow,
    };
    pub use crate::core::query::{OrderPredicate, OrderQueryBuilder, OrderQueryPlan, TextQuery};
    pub use crate::core::store::ShopStore;

    // === Repositories ===
    pub use crate::repository::{
        FetchDepth, ItemRepository, MemberRepository, OrderQueryRepository, OrderRepository,
    };

    // === Services ===
    pub use crate::service::{ItemService, MemberService, OrderLineRequest, OrderService};

    // === Storage ===
    pub use crate::storage::InMemoryShopStore;

    // === Config ===
    pub use crate::config::ShopConfig;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
