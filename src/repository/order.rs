//! Order repository: dynamic search and association fetching
//!
//! The three `search_by_*` methods are deliberately interchangeable: each
//! builds the same executable plan a different way (concatenated query
//! text, a criteria list, a typed builder) and must return the same result
//! set for the same filter.

use indexmap::IndexMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::domain::{Delivery, Order, OrderItem};
use crate::core::error::{QueryError, ShopError};
use crate::core::filter::{OrderFilter, Page};
use crate::core::projection::OrderGraph;
use crate::core::query::{
    BASE_QUERY, OrderPredicate, OrderQueryBuilder, OrderQueryPlan, SEARCH_CAP, TextQuery,
    member_name_contains, status_eq,
};
use crate::config::ShopConfig;
use crate::core::store::ShopStore;

/// Which associations an order fetch hydrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDepth {
    /// Order rows only; nothing hydrated
    OrdersOnly,

    /// Join-fetch the to-one associations (member, delivery)
    MemberDelivery,

    /// Join-fetch everything down to items (to-many: multiplies rows)
    WithItems,
}

/// Data access for the order aggregate.
#[derive(Clone)]
pub struct OrderRepository {
    store: Arc<dyn ShopStore>,
    search_cap: usize,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn ShopStore>) -> Self {
        Self {
            store,
            search_cap: SEARCH_CAP,
        }
    }

    /// Like `new`, but with the search ceiling taken from configuration.
    pub fn with_config(store: Arc<dyn ShopStore>, config: &ShopConfig) -> Self {
        Self {
            store,
            search_cap: config.search_cap,
        }
    }

    /// Persist an order together with its delivery and lines (the order
    /// owns both; they never exist without it).
    pub async fn save(
        &self,
        order: Order,
        delivery: Delivery,
        lines: Vec<OrderItem>,
    ) -> Result<Order, ShopError> {
        Ok(self.store.insert_order(order, delivery, lines).await?)
    }

    pub async fn find_one(&self, id: &Uuid) -> Result<Option<Order>, ShopError> {
        Ok(self.store.find_order(id).await?)
    }

    /// The delivery owned by an order.
    pub async fn find_delivery(&self, id: &Uuid) -> Result<Option<Delivery>, ShopError> {
        Ok(self.store.find_delivery(id).await?)
    }

    /// Explicit write of an already-loaded, transformed order.
    pub async fn update(&self, order: Order) -> Result<Order, ShopError> {
        Ok(self.store.update_order(order).await?)
    }

    /// Raw order-item rows of one order.
    pub async fn lines_of(&self, order_id: &Uuid) -> Result<Vec<OrderItem>, ShopError> {
        Ok(self.store.order_items_for_order(order_id).await?)
    }

    // =========================================================================
    // Dynamic search, three ways
    // =========================================================================

    /// Search via concatenated query text.
    ///
    /// Grows the text clause by clause with a first-condition flag, then
    /// binds the parameters each appended clause references. Compilation
    /// catches a clause/binding mismatch before anything executes.
    pub async fn search_by_text(&self, filter: &OrderFilter) -> Result<Vec<Order>, ShopError> {
        let mut text = String::from(BASE_QUERY);
        let mut is_first_condition = true;

        if filter.status.is_some() {
            text.push_str(if is_first_condition { " where" } else { " and" });
            is_first_condition = false;
            text.push_str(" o.status = :status");
        }
        if filter.member_name_condition().is_some() {
            text.push_str(if is_first_condition { " where" } else { " and" });
            text.push_str(" m.name like :name");
        }

        let mut query = TextQuery::new(text).set_max_results(self.search_cap);
        if let Some(status) = filter.status {
            query = query.bind_status("status", status);
        }
        if let Some(name) = filter.member_name_condition() {
            query = query.bind_text("name", name);
        }

        let plan = query.compile()?;
        tracing::debug!(predicates = plan.predicates.len(), "order search (text)");
        Ok(self.store.execute_order_search(&plan).await?)
    }

    /// Search via a criteria list: push each present condition into a
    /// predicate vec, AND-combined.
    pub async fn search_by_criteria(&self, filter: &OrderFilter) -> Result<Vec<Order>, ShopError> {
        let mut criteria: Vec<OrderPredicate> = Vec::new();

        if let Some(status) = filter.status {
            criteria.push(OrderPredicate::StatusEq(status));
        }
        if let Some(name) = filter.member_name_condition() {
            criteria.push(OrderPredicate::MemberNameContains(name.to_string()));
        }

        let mut plan = OrderQueryPlan::new(criteria);
        plan.limit = self.search_cap;
        tracing::debug!(predicates = plan.predicates.len(), "order search (criteria)");
        Ok(self.store.execute_order_search(&plan).await?)
    }

    /// Search via the typed builder; absent conditions collapse to `None`
    /// and are skipped by `filter()`.
    pub async fn search_by_builder(&self, filter: &OrderFilter) -> Result<Vec<Order>, ShopError> {
        let plan = OrderQueryBuilder::select_orders()
            .filter(status_eq(filter.status))
            .filter(member_name_contains(filter.member_name_condition()))
            .limit(self.search_cap)
            .build();
        tracing::debug!(predicates = plan.predicates.len(), "order search (builder)");
        Ok(self.store.execute_order_search(&plan).await?)
    }

    // =========================================================================
    // Eager-join fetching
    // =========================================================================

    /// Fetch orders with associations hydrated to the requested depth.
    ///
    /// `WithItems` joins through the to-many collection, which multiplies
    /// each order row by its line count; rows are de-duplicated by order id
    /// here, preserving first-seen order. Combining `WithItems` with a page
    /// is rejected before any query runs: a row-level window over
    /// multiplied rows would cut orders in half. Page windows apply to the
    /// *order* rows of the to-one join only.
    pub async fn find_all_with_associations(
        &self,
        depth: FetchDepth,
        page: Option<Page>,
    ) -> Result<Vec<OrderGraph>, ShopError> {
        if depth == FetchDepth::WithItems && page.is_some() {
            return Err(QueryError::PaginatedCollectionFetch.into());
        }

        match depth {
            FetchDepth::OrdersOnly => {
                let orders = self.store.list_orders().await?;
                let windowed = match page {
                    Some(page) => orders
                        .into_iter()
                        .skip(page.offset)
                        .take(page.limit)
                        .collect(),
                    None => orders,
                };
                Ok(windowed
                    .into_iter()
                    .map(|order| OrderGraph {
                        order,
                        member: None,
                        delivery: None,
                        lines: Vec::new(),
                    })
                    .collect())
            }
            FetchDepth::MemberDelivery => {
                let rows = self
                    .store
                    .join_orders_to_one(page.map(|p| p.offset), page.map(|p| p.limit))
                    .await?;
                Ok(rows
                    .into_iter()
                    .map(|row| OrderGraph {
                        order: row.order,
                        member: Some(row.member),
                        delivery: Some(row.delivery),
                        lines: Vec::new(),
                    })
                    .collect())
            }
            FetchDepth::WithItems => {
                let rows = self.store.join_orders_full().await?;
                tracing::debug!(rows = rows.len(), "full join fetched");

                // De-duplicate the multiplied order rows by identity,
                // folding each row's line into its first-seen order.
                let mut graphs: IndexMap<Uuid, OrderGraph> = IndexMap::new();
                for row in rows {
                    graphs
                        .entry(row.order.id)
                        .or_insert_with(|| OrderGraph {
                            order: row.order,
                            member: Some(row.member),
                            delivery: Some(row.delivery),
                            lines: Vec::new(),
                        })
                        .lines
                        .push((row.line, row.item));
                }
                Ok(graphs.into_values().collect())
            }
        }
    }
}
