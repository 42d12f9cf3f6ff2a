//! Flat query-result shapes and the tree-shaped projections built from them
//!
//! The store hands back row-oriented results (one struct per joined row);
//! this module owns the result-shape transforms that fold those rows into
//! the tree the presentation layer consumes: an order header with a nested
//! list of item lines.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::domain::{Address, Delivery, Item, Member, Order, OrderItem, OrderStatus};

/// Order aggregate returned by the eager-join fetcher.
///
/// Association fields reflect the requested fetch depth: `None` / empty
/// means "not loaded", not "does not exist".
#[derive(Debug, Clone, Serialize)]
pub struct OrderGraph {
    pub order: Order,
    pub member: Option<Member>,
    pub delivery: Option<Delivery>,
    /// Order lines paired with their items; empty when the fetch depth did
    /// not include the collection.
    pub lines: Vec<(OrderItem, Item)>,
}

impl OrderGraph {
    /// Derived order total: the sum of line totals, never stored.
    pub fn total_price(&self) -> i64 {
        self.lines.iter().map(|(line, _)| line.total_price()).sum()
    }
}

/// One row of the order→member→delivery join (to-one associations only).
#[derive(Debug, Clone)]
pub struct OrderToOneRow {
    pub order: Order,
    pub member: Member,
    pub delivery: Delivery,
}

/// One row of the full join down to items.
///
/// The join produces one row per (order, item) pair, so the same order
/// appears once per line; de-duplication is the fetcher's job.
#[derive(Debug, Clone)]
pub struct OrderJoinRow {
    pub order: Order,
    pub member: Member,
    pub delivery: Delivery,
    pub line: OrderItem,
    pub item: Item,
}

/// One child row from the order-item table joined to item, keyed by its
/// parent order.
#[derive(Debug, Clone)]
pub struct OrderLineRow {
    pub order_id: Uuid,
    pub item_name: String,
    pub order_price: i64,
    pub count: u32,
}

/// One flat row carrying every scalar for both the order header and one
/// item line.
#[derive(Debug, Clone)]
pub struct FlatOrderRow {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub address: Address,
    pub item_name: String,
    pub order_price: i64,
    pub count: u32,
}

/// Order header with its nested item lines, ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProjection {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub address: Address,
    pub items: Vec<ItemLineProjection>,
}

impl OrderProjection {
    /// Header-only projection from a to-one join row; items attached later.
    pub fn from_row(row: &OrderToOneRow) -> Self {
        Self {
            order_id: row.order.id,
            member_name: row.member.name.clone(),
            order_date: row.order.order_date,
            status: row.order.status,
            address: row.delivery.address.clone(),
            items: Vec::new(),
        }
    }
}

/// One item line of an order projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemLineProjection {
    pub item_name: String,
    pub order_price: i64,
    pub count: u32,
}

impl ItemLineProjection {
    pub fn from_row(row: &OrderLineRow) -> Self {
        Self {
            item_name: row.item_name.clone(),
            order_price: row.order_price,
            count: row.count,
        }
    }
}

/// Header-only order view without the item collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub address: Address,
}

impl OrderSummary {
    pub fn from_row(row: &OrderToOneRow) -> Self {
        Self {
            order_id: row.order.id,
            member_name: row.member.name.clone(),
            order_date: row.order.order_date,
            status: row.order.status,
            address: row.delivery.address.clone(),
        }
    }
}

/// Group child rows by their parent order id, preserving both the order in
/// which parents first appear and the row order within each group.
pub fn group_lines_by_order(rows: Vec<OrderLineRow>) -> IndexMap<Uuid, Vec<ItemLineProjection>> {
    let mut grouped: IndexMap<Uuid, Vec<ItemLineProjection>> = IndexMap::new();
    for row in rows {
        grouped
            .entry(row.order_id)
            .or_default()
            .push(ItemLineProjection::from_row(&row));
    }
    grouped
}

/// Fold flat (order, item) rows back into one projection per order.
///
/// The grouping key is the order id alone: within one result set the
/// header scalars are stable per id, so two rows with the same id always
/// belong to the same header. First-seen order is preserved, which removes
/// the duplication the join introduced without reordering anything.
pub fn regroup_flat_rows(rows: Vec<FlatOrderRow>) -> Vec<OrderProjection> {
    let mut grouped: IndexMap<Uuid, OrderProjection> = IndexMap::new();
    for row in rows {
        let projection = grouped.entry(row.order_id).or_insert_with(|| OrderProjection {
            order_id: row.order_id,
            member_name: row.member_name.clone(),
            order_date: row.order_date,
            status: row.status,
            address: row.address.clone(),
            items: Vec::new(),
        });
        projection.items.push(ItemLineProjection {
            item_name: row.item_name,
            order_price: row.order_price,
            count: row.count,
        });
    }
    grouped.into_values().collect()
}
