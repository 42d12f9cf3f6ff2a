//! Projection queries over orders: the collection-fetch strategies
//!
//! Four ways to produce the same `OrderProjection` tree, differing only in
//! how many queries they cost:
//!
//! - [`find_projections_naive`](OrderQueryRepository::find_projections_naive):
//!   one header query plus one item query *per order*, the N+1 baseline.
//! - [`find_projections_batched`](OrderQueryRepository::find_projections_batched):
//!   one header query plus one `IN (…)` item query per batch of order ids
//!   (a single batch for anything under the batch size).
//! - [`find_projections_paged`](OrderQueryRepository::find_projections_paged):
//!   the batched shape over a page window; items are attached after the
//!   window, so pagination can never truncate an order's collection.
//! - [`find_projections_flat`](OrderQueryRepository::find_projections_flat):
//!   one fully joined flat query, regrouped in memory. Fewest round trips,
//!   but the header scalars travel once per item row.

use std::sync::Arc;
use uuid::Uuid;

use crate::config::ShopConfig;
use crate::core::error::ShopError;
use crate::core::filter::Page;
use crate::core::projection::{
    OrderProjection, OrderSummary, group_lines_by_order, regroup_flat_rows,
};
use crate::core::store::ShopStore;

/// Read-side repository producing order projections.
#[derive(Clone)]
pub struct OrderQueryRepository {
    store: Arc<dyn ShopStore>,
    batch_fetch_size: usize,
}

impl OrderQueryRepository {
    pub fn new(store: Arc<dyn ShopStore>) -> Self {
        Self {
            store,
            batch_fetch_size: 1000,
        }
    }

    /// Like `new`, but with the `IN (…)` batch size taken from
    /// configuration.
    pub fn with_config(store: Arc<dyn ShopStore>, config: &ShopConfig) -> Self {
        Self {
            store,
            batch_fetch_size: config.batch_fetch_size,
        }
    }

    /// Header-only projections from the to-one join (no item lines).
    pub async fn find_order_summaries(&self) -> Result<Vec<OrderSummary>, ShopError> {
        let rows = self.store.join_orders_to_one(None, None).await?;
        Ok(rows.iter().map(OrderSummary::from_row).collect())
    }

    /// Headers, then one item query per order.
    ///
    /// Kept as the baseline the optimized paths are measured against: for
    /// N orders this issues 1 + N queries.
    pub async fn find_projections_naive(&self) -> Result<Vec<OrderProjection>, ShopError> {
        let rows = self.store.join_orders_to_one(None, None).await?;
        let mut projections: Vec<OrderProjection> =
            rows.iter().map(OrderProjection::from_row).collect();

        for projection in &mut projections {
            let lines = self
                .store
                .order_lines_for_order(&projection.order_id)
                .await?;
            projection.items = lines
                .iter()
                .map(crate::core::projection::ItemLineProjection::from_row)
                .collect();
        }
        Ok(projections)
    }

    /// Headers, then one batched item query: two queries total.
    pub async fn find_projections_batched(&self) -> Result<Vec<OrderProjection>, ShopError> {
        let rows = self.store.join_orders_to_one(None, None).await?;
        let projections = rows.iter().map(OrderProjection::from_row).collect();
        self.attach_item_lines(projections).await
    }

    /// Batched projections over a page window of order rows.
    pub async fn find_projections_paged(
        &self,
        page: Page,
    ) -> Result<Vec<OrderProjection>, ShopError> {
        let rows = self
            .store
            .join_orders_to_one(Some(page.offset), Some(page.limit))
            .await?;
        let projections = rows.iter().map(OrderProjection::from_row).collect();
        self.attach_item_lines(projections).await
    }

    /// Attach item collections to already-fetched headers with batched
    /// `IN (…)` queries.
    ///
    /// Collects the distinct order ids, fetches the child rows in one
    /// round trip per `batch_fetch_size` ids, groups them by parent id in
    /// memory, and attaches each group. An order without items gets an
    /// empty list, never a missing field. Total extra queries:
    /// ceil(orders / batch size), independent of the line count.
    pub async fn attach_item_lines(
        &self,
        mut orders: Vec<OrderProjection>,
    ) -> Result<Vec<OrderProjection>, ShopError> {
        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.order_id).collect();

        let mut lines = Vec::new();
        for batch in order_ids.chunks(self.batch_fetch_size) {
            lines.extend(self.store.order_lines_for_orders(batch).await?);
        }
        tracing::debug!(
            orders = order_ids.len(),
            lines = lines.len(),
            "batched item lines fetched"
        );
        let mut grouped = group_lines_by_order(lines);

        for order in &mut orders {
            order.items = grouped.swap_remove(&order.order_id).unwrap_or_default();
        }
        Ok(orders)
    }

    /// One flat joined query, regrouped into projection trees in memory.
    pub async fn find_projections_flat(&self) -> Result<Vec<OrderProjection>, ShopError> {
        let rows = self.store.flat_order_rows().await?;
        tracing::debug!(rows = rows.len(), "flat projection fetched");
        Ok(regroup_flat_rows(rows))
    }
}
