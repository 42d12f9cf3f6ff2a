//! Storage contract for the order shop
//!
//! Repositories talk to storage only through [`ShopStore`]; the core is
//! agnostic to the backend. Every method is one storage round trip, and
//! implementations count those round trips so tests can assert how many
//! queries a fetch strategy really issues.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::core::domain::{Delivery, Item, Member, Order, OrderItem};
use crate::core::projection::{FlatOrderRow, OrderJoinRow, OrderLineRow, OrderToOneRow};
use crate::core::query::OrderQueryPlan;

/// Storage backend for members, items, deliveries and orders.
///
/// Lookups return `Ok(None)` for missing rows; absence is the service
/// layer's call. Errors are backend failures only and are never retried.
#[async_trait]
pub trait ShopStore: Send + Sync {
    // === Members ===

    async fn insert_member(&self, member: Member) -> Result<Member>;

    async fn find_member(&self, id: &Uuid) -> Result<Option<Member>>;

    /// Members with exactly the given name (the duplicate pre-check).
    async fn find_members_by_name(&self, name: &str) -> Result<Vec<Member>>;

    async fn list_members(&self) -> Result<Vec<Member>>;

    async fn update_member(&self, member: Member) -> Result<Member>;

    // === Items ===

    async fn insert_item(&self, item: Item) -> Result<Item>;

    async fn find_item(&self, id: &Uuid) -> Result<Option<Item>>;

    async fn list_items(&self) -> Result<Vec<Item>>;

    async fn update_item(&self, item: Item) -> Result<Item>;

    // === Deliveries ===

    async fn find_delivery(&self, id: &Uuid) -> Result<Option<Delivery>>;

    async fn update_delivery(&self, delivery: Delivery) -> Result<Delivery>;

    // === Orders ===

    /// Persist an order with its delivery and lines in one round trip
    /// (cascade semantics: the order owns both).
    async fn insert_order(
        &self,
        order: Order,
        delivery: Delivery,
        lines: Vec<OrderItem>,
    ) -> Result<Order>;

    async fn find_order(&self, id: &Uuid) -> Result<Option<Order>>;

    async fn update_order(&self, order: Order) -> Result<Order>;

    /// Execute a compiled search plan over order joined to member.
    async fn execute_order_search(&self, plan: &OrderQueryPlan) -> Result<Vec<Order>>;

    /// All order rows in storage order (no associations).
    async fn list_orders(&self) -> Result<Vec<Order>>;

    // === Join reads ===

    /// Join order→member→delivery, one row per order, optionally windowed
    /// by offset/limit over the order rows.
    async fn join_orders_to_one(
        &self,
        offset: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Vec<OrderToOneRow>>;

    /// Join order→member→delivery→order_items→item, one row per
    /// (order, item) pair. Orders without items do not appear.
    async fn join_orders_full(&self) -> Result<Vec<OrderJoinRow>>;

    /// Raw order-item rows of one order (no item join); used by writes
    /// like cancellation that need item ids and counts.
    async fn order_items_for_order(&self, order_id: &Uuid) -> Result<Vec<OrderItem>>;

    /// Child rows for a single order (the per-parent lazy query).
    async fn order_lines_for_order(&self, order_id: &Uuid) -> Result<Vec<OrderLineRow>>;

    /// Child rows for a batch of orders, the `IN (…)` query.
    async fn order_lines_for_orders(&self, order_ids: &[Uuid]) -> Result<Vec<OrderLineRow>>;

    /// The fully joined flat projection, one row per (order, item) pair.
    async fn flat_order_rows(&self) -> Result<Vec<FlatOrderRow>>;

    // === Instrumentation ===

    /// Number of storage round trips since construction or the last reset.
    fn query_count(&self) -> u64;

    fn reset_query_count(&self);
}
