//! In-memory implementation of ShopStore for testing and development

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::core::domain::{Delivery, Item, Member, Order, OrderItem};
use crate::core::projection::{FlatOrderRow, OrderJoinRow, OrderLineRow, OrderToOneRow};
use crate::core::query::OrderQueryPlan;
use crate::core::store::ShopStore;

/// Relational in-memory tables.
///
/// `IndexMap` keeps insertion order, so iteration is storage order and
/// every read is stable for a fixed table.
#[derive(Default)]
struct Tables {
    members: IndexMap<Uuid, Member>,
    items: IndexMap<Uuid, Item>,
    deliveries: IndexMap<Uuid, Delivery>,
    orders: IndexMap<Uuid, Order>,
    order_items: IndexMap<Uuid, OrderItem>,
}

/// In-memory shop store.
///
/// Uses RwLock for thread-safe access. Every trait method counts as one
/// storage round trip toward `query_count()`, the hook the N+1 tests use.
#[derive(Clone)]
pub struct InMemoryShopStore {
    tables: Arc<RwLock<Tables>>,
    queries: Arc<AtomicU64>,
}

impl InMemoryShopStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            queries: Arc::new(AtomicU64::new(0)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))
    }
}

impl Default for InMemoryShopStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Inner join of one order row to its member and delivery rows.
///
/// Orders whose member or delivery row is missing are dropped, exactly as
/// an inner join would drop them.
fn join_to_one(tables: &Tables, order: &Order) -> Option<OrderToOneRow> {
    let member = tables.members.get(&order.member_id)?;
    let delivery = tables.deliveries.get(&order.delivery_id)?;
    Some(OrderToOneRow {
        order: order.clone(),
        member: member.clone(),
        delivery: delivery.clone(),
    })
}

/// Child (order_item, item) pairs of one order, in storage order.
fn lines_of(tables: &Tables, order_id: &Uuid) -> Vec<(OrderItem, Item)> {
    tables
        .order_items
        .values()
        .filter(|line| &line.order_id == order_id)
        .filter_map(|line| {
            tables
                .items
                .get(&line.item_id)
                .map(|item| (line.clone(), item.clone()))
        })
        .collect()
}

fn line_row(line: &OrderItem, item: &Item) -> OrderLineRow {
    OrderLineRow {
        order_id: line.order_id,
        item_name: item.name.clone(),
        order_price: line.order_price,
        count: line.count,
    }
}

#[async_trait]
impl ShopStore for InMemoryShopStore {
    async fn insert_member(&self, member: Member) -> Result<Member> {
        let mut tables = self.write()?;
        tables.members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn find_member(&self, id: &Uuid) -> Result<Option<Member>> {
        let tables = self.read()?;
        Ok(tables.members.get(id).cloned())
    }

    async fn find_members_by_name(&self, name: &str) -> Result<Vec<Member>> {
        let tables = self.read()?;
        Ok(tables
            .members
            .values()
            .filter(|m| m.name == name)
            .cloned()
            .collect())
    }

    async fn list_members(&self) -> Result<Vec<Member>> {
        let tables = self.read()?;
        Ok(tables.members.values().cloned().collect())
    }

    async fn update_member(&self, member: Member) -> Result<Member> {
        let mut tables = self.write()?;
        tables
            .members
            .get_mut(&member.id)
            .ok_or_else(|| anyhow!("member not found"))?;
        tables.members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn insert_item(&self, item: Item) -> Result<Item> {
        let mut tables = self.write()?;
        tables.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_item(&self, id: &Uuid) -> Result<Option<Item>> {
        let tables = self.read()?;
        Ok(tables.items.get(id).cloned())
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let tables = self.read()?;
        Ok(tables.items.values().cloned().collect())
    }

    async fn update_item(&self, item: Item) -> Result<Item> {
        let mut tables = self.write()?;
        tables
            .items
            .get_mut(&item.id)
            .ok_or_else(|| anyhow!("item not found"))?;
        tables.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_delivery(&self, id: &Uuid) -> Result<Option<Delivery>> {
        let tables = self.read()?;
        Ok(tables.deliveries.get(id).cloned())
    }

    async fn update_delivery(&self, delivery: Delivery) -> Result<Delivery> {
        let mut tables = self.write()?;
        tables
            .deliveries
            .get_mut(&delivery.id)
            .ok_or_else(|| anyhow!("delivery not found"))?;
        tables.deliveries.insert(delivery.id, delivery.clone());
        Ok(delivery)
    }

    async fn insert_order(
        &self,
        order: Order,
        delivery: Delivery,
        lines: Vec<OrderItem>,
    ) -> Result<Order> {
        let mut tables = self.write()?;
        tables.deliveries.insert(delivery.id, delivery);
        for line in lines {
            tables.order_items.insert(line.id, line);
        }
        tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_order(&self, id: &Uuid) -> Result<Option<Order>> {
        let tables = self.read()?;
        Ok(tables.orders.get(id).cloned())
    }

    async fn update_order(&self, order: Order) -> Result<Order> {
        let mut tables = self.write()?;
        tables
            .orders
            .get_mut(&order.id)
            .ok_or_else(|| anyhow!("order not found"))?;
        tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn execute_order_search(&self, plan: &OrderQueryPlan) -> Result<Vec<Order>> {
        let tables = self.read()?;
        Ok(tables
            .orders
            .values()
            .filter(|order| {
                // Unconditional inner join to member; unmatched orders drop out.
                tables
                    .members
                    .get(&order.member_id)
                    .is_some_and(|member| plan.accepts(order, member))
            })
            .skip(plan.offset)
            .take(plan.limit)
            .cloned()
            .collect())
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let tables = self.read()?;
        Ok(tables.orders.values().cloned().collect())
    }

    async fn join_orders_to_one(
        &self,
        offset: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Vec<OrderToOneRow>> {
        let tables = self.read()?;
        Ok(tables
            .orders
            .values()
            .filter_map(|order| join_to_one(&tables, order))
            .skip(offset.unwrap_or(0))
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn join_orders_full(&self) -> Result<Vec<OrderJoinRow>> {
        let tables = self.read()?;
        let mut rows = Vec::new();
        for order in tables.orders.values() {
            let Some(to_one) = join_to_one(&tables, order) else {
                continue;
            };
            for (line, item) in lines_of(&tables, &order.id) {
                rows.push(OrderJoinRow {
                    order: to_one.order.clone(),
                    member: to_one.member.clone(),
                    delivery: to_one.delivery.clone(),
                    line,
                    item,
                });
            }
        }
        Ok(rows)
    }

    async fn order_items_for_order(&self, order_id: &Uuid) -> Result<Vec<OrderItem>> {
        let tables = self.read()?;
        Ok(tables
            .order_items
            .values()
            .filter(|line| &line.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn order_lines_for_order(&self, order_id: &Uuid) -> Result<Vec<OrderLineRow>> {
        let tables = self.read()?;
        Ok(lines_of(&tables, order_id)
            .iter()
            .map(|(line, item)| line_row(line, item))
            .collect())
    }

    async fn order_lines_for_orders(&self, order_ids: &[Uuid]) -> Result<Vec<OrderLineRow>> {
        let tables = self.read()?;
        Ok(tables
            .order_items
            .values()
            .filter(|line| order_ids.contains(&line.order_id))
            .filter_map(|line| tables.items.get(&line.item_id).map(|item| line_row(line, item)))
            .collect())
    }

    async fn flat_order_rows(&self) -> Result<Vec<FlatOrderRow>> {
        let tables = self.read()?;
        let mut rows = Vec::new();
        for order in tables.orders.values() {
            let Some(to_one) = join_to_one(&tables, order) else {
                continue;
            };
            for (line, item) in lines_of(&tables, &order.id) {
                rows.push(FlatOrderRow {
                    order_id: order.id,
                    member_name: to_one.member.name.clone(),
                    order_date: order.order_date,
                    status: order.status,
                    address: to_one.delivery.address.clone(),
                    item_name: item.name,
                    order_price: line.order_price,
                    count: line.count,
                });
            }
        }
        Ok(rows)
    }

    fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    fn reset_query_count(&self) {
        self.queries.store(0, Ordering::Relaxed);
    }
}
