//! Order service: placing, cancelling and searching orders

use indexmap::IndexMap;
use uuid::Uuid;

use crate::core::domain::{Delivery, DeliveryStatus, Item, Order, OrderItem, OrderStatus};
use crate::core::error::{ItemError, MemberError, OrderError, ShopError};
use crate::core::filter::OrderFilter;
use crate::repository::{ItemRepository, MemberRepository, OrderRepository};

/// One requested line of a new order.
#[derive(Debug, Clone, Copy)]
pub struct OrderLineRequest {
    pub item_id: Uuid,
    pub count: u32,
}

/// Business operations on the order aggregate.
#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    members: MemberRepository,
    items: ItemRepository,
}

impl OrderService {
    pub fn new(
        orders: OrderRepository,
        members: MemberRepository,
        items: ItemRepository,
    ) -> Self {
        Self {
            orders,
            members,
            items,
        }
    }

    /// Place an order for a member.
    ///
    /// Loads the member and every requested item, snapshots each item's
    /// current price into its order line, and deducts stock per line. Items
    /// are loaded once and deductions accumulate on that copy, so two lines
    /// naming the same item deduct against each other. Nothing is written
    /// until every line has validated, so a failing line (unknown item, zero
    /// quantity, not enough stock) leaves no partial state behind. The
    /// delivery gets a copy of the member's address, not a reference.
    pub async fn place_order(
        &self,
        member_id: &Uuid,
        requests: &[OrderLineRequest],
    ) -> Result<Uuid, ShopError> {
        let member = self
            .members
            .find_one(member_id)
            .await?
            .ok_or(MemberError::NotFound { id: *member_id })?;

        let delivery = Delivery::new(member.address.clone());
        let order = Order::new(member.id, delivery.id);

        let mut updated_items: IndexMap<Uuid, Item> = IndexMap::new();
        let mut lines: Vec<OrderItem> = Vec::with_capacity(requests.len());
        for request in requests {
            if !updated_items.contains_key(&request.item_id) {
                let item = self
                    .items
                    .find_one(&request.item_id)
                    .await?
                    .ok_or(ItemError::NotFound {
                        id: request.item_id,
                    })?;
                updated_items.insert(request.item_id, item);
            }
            let item = &mut updated_items[&request.item_id];
            let line = OrderItem::new(order.id, item.id, item.price, request.count)?;
            item.remove_stock(request.count)?;
            lines.push(line);
        }

        for item in updated_items.into_values() {
            self.items.update(item).await?;
        }
        let order = self.orders.save(order, delivery, lines).await?;
        tracing::info!(order_id = %order.id, member = %member.name, "order placed");
        Ok(order.id)
    }

    /// Cancel an order and restore every line's stock.
    ///
    /// The restore adds back exactly the count each line deducted, so
    /// cancel is the exact inverse of place. All restores are staged on
    /// loaded copies and written together with the status change; a bad
    /// line (missing item row) fails the whole cancel before anything is
    /// written. Cancelling twice, or after the delivery completed, is
    /// rejected.
    pub async fn cancel_order(&self, order_id: &Uuid) -> Result<(), ShopError> {
        let mut order = self
            .orders
            .find_one(order_id)
            .await?
            .ok_or(OrderError::NotFound { id: *order_id })?;

        if order.status == OrderStatus::Cancelled {
            return Err(OrderError::AlreadyCancelled { id: order.id }.into());
        }
        let delivery = self
            .orders
            .find_delivery(&order.delivery_id)
            .await?
            .ok_or_else(|| {
                ShopError::Internal(format!("order '{}' has no delivery row", order.id))
            })?;
        if delivery.status == DeliveryStatus::Complete {
            return Err(OrderError::AlreadyDelivered { id: order.id }.into());
        }

        let mut restored_items: IndexMap<Uuid, Item> = IndexMap::new();
        for line in self.orders.lines_of(&order.id).await? {
            if !restored_items.contains_key(&line.item_id) {
                let item = self
                    .items
                    .find_one(&line.item_id)
                    .await?
                    .ok_or(ItemError::NotFound { id: line.item_id })?;
                restored_items.insert(line.item_id, item);
            }
            restored_items[&line.item_id].add_stock(line.count)?;
        }

        for item in restored_items.into_values() {
            self.items.update(item).await?;
        }
        order.status = OrderStatus::Cancelled;
        self.orders.update(order).await?;
        tracing::info!(order_id = %order_id, "order cancelled");
        Ok(())
    }

    /// Search orders; the text strategy is the default one.
    pub async fn find_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, ShopError> {
        self.orders.search_by_text(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{Address, Item, Member};
    use crate::core::store::ShopStore;
    use crate::storage::InMemoryShopStore;
    use std::sync::Arc;

    struct Fixture {
        store: Arc<InMemoryShopStore>,
        service: OrderService,
        member: Member,
        book: Item,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryShopStore::new());
        let service = OrderService::new(
            OrderRepository::new(store.clone()),
            MemberRepository::new(store.clone()),
            ItemRepository::new(store.clone()),
        );
        let member = store
            .insert_member(Member::new("userA", Address::new("Seoul", "1", "12345")))
            .await
            .unwrap();
        let book = store
            .insert_item(Item::book("JPA1 BOOK", 10000, 10, "author", "isbn"))
            .await
            .unwrap();
        Fixture {
            store,
            service,
            member,
            book,
        }
    }

    #[tokio::test]
    async fn test_place_order_deducts_stock_and_snapshots_price() {
        let f = fixture().await;
        let request = OrderLineRequest {
            item_id: f.book.id,
            count: 2,
        };

        let order_id = f.service.place_order(&f.member.id, &[request]).await.unwrap();

        let order = f.store.find_order(&order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Order);

        let item = f.store.find_item(&f.book.id).await.unwrap().unwrap();
        assert_eq!(item.stock_quantity, 8);

        let lines = f.store.order_items_for_order(&order_id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].order_price, 10000);
        assert_eq!(lines[0].total_price(), 20000);
    }

    #[tokio::test]
    async fn test_place_order_beyond_stock_leaves_nothing_behind() {
        let f = fixture().await;
        let request = OrderLineRequest {
            item_id: f.book.id,
            count: 11,
        };

        let err = f.service.place_order(&f.member.id, &[request]).await.unwrap_err();
        assert!(matches!(
            err,
            ShopError::Item(ItemError::NotEnoughStock { .. })
        ));

        let item = f.store.find_item(&f.book.id).await.unwrap().unwrap();
        assert_eq!(item.stock_quantity, 10);
        assert!(f.store.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_second_line_applies_nothing() {
        let f = fixture().await;
        let requests = [
            OrderLineRequest {
                item_id: f.book.id,
                count: 1,
            },
            OrderLineRequest {
                item_id: Uuid::new_v4(), // unknown item
                count: 1,
            },
        ];

        let err = f.service.place_order(&f.member.id, &requests).await.unwrap_err();
        assert!(matches!(err, ShopError::Item(ItemError::NotFound { .. })));

        let item = f.store.find_item(&f.book.id).await.unwrap().unwrap();
        assert_eq!(item.stock_quantity, 10, "first line must not have applied");
    }

    #[tokio::test]
    async fn test_duplicate_item_lines_deduct_against_each_other() {
        let f = fixture().await;
        let requests = [
            OrderLineRequest {
                item_id: f.book.id,
                count: 2,
            },
            OrderLineRequest {
                item_id: f.book.id,
                count: 3,
            },
        ];

        let order_id = f.service.place_order(&f.member.id, &requests).await.unwrap();

        let item = f.store.find_item(&f.book.id).await.unwrap().unwrap();
        assert_eq!(item.stock_quantity, 5);
        let lines = f.store.order_items_for_order(&order_id).await.unwrap();
        assert_eq!(lines.len(), 2);

        f.service.cancel_order(&order_id).await.unwrap();
        let item = f.store.find_item(&f.book.id).await.unwrap().unwrap();
        assert_eq!(item.stock_quantity, 10);
    }

    #[tokio::test]
    async fn test_duplicate_item_lines_beyond_stock_rejected() {
        let f = fixture().await;
        let requests = [
            OrderLineRequest {
                item_id: f.book.id,
                count: 6,
            },
            OrderLineRequest {
                item_id: f.book.id,
                count: 6,
            },
        ];

        let err = f.service.place_order(&f.member.id, &requests).await.unwrap_err();
        assert!(matches!(
            err,
            ShopError::Item(ItemError::NotEnoughStock { .. })
        ));
        let item = f.store.find_item(&f.book.id).await.unwrap().unwrap();
        assert_eq!(item.stock_quantity, 10);
    }

    #[tokio::test]
    async fn test_cancel_restores_stock_exactly() {
        let f = fixture().await;
        let request = OrderLineRequest {
            item_id: f.book.id,
            count: 3,
        };
        let order_id = f.service.place_order(&f.member.id, &[request]).await.unwrap();

        f.service.cancel_order(&order_id).await.unwrap();

        let order = f.store.find_order(&order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        let item = f.store.find_item(&f.book.id).await.unwrap().unwrap();
        assert_eq!(item.stock_quantity, 10);
    }

    #[tokio::test]
    async fn test_cancel_with_missing_item_row_writes_nothing() {
        let f = fixture().await;
        let delivery = Delivery::new(f.member.address.clone());
        let order = Order::new(f.member.id, delivery.id);
        let lines = vec![
            OrderItem::new(order.id, f.book.id, f.book.price, 2).unwrap(),
            OrderItem::new(order.id, Uuid::new_v4(), 5000, 1).unwrap(),
        ];
        let order = f.store.insert_order(order, delivery, lines).await.unwrap();

        let err = f.service.cancel_order(&order.id).await.unwrap_err();
        assert!(matches!(err, ShopError::Item(ItemError::NotFound { .. })));

        // No restore applied and the order is still open, so a later
        // cancel (once the row exists again) restores exactly once.
        let item = f.store.find_item(&f.book.id).await.unwrap().unwrap();
        assert_eq!(item.stock_quantity, 10);
        let order = f.store.find_order(&order.id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Order);
    }

    #[tokio::test]
    async fn test_cancel_twice_rejected() {
        let f = fixture().await;
        let request = OrderLineRequest {
            item_id: f.book.id,
            count: 1,
        };
        let order_id = f.service.place_order(&f.member.id, &[request]).await.unwrap();

        f.service.cancel_order(&order_id).await.unwrap();
        let err = f.service.cancel_order(&order_id).await.unwrap_err();
        assert!(matches!(
            err,
            ShopError::Order(OrderError::AlreadyCancelled { .. })
        ));

        // Stock restored once, not twice.
        let item = f.store.find_item(&f.book.id).await.unwrap().unwrap();
        assert_eq!(item.stock_quantity, 10);
    }

    #[tokio::test]
    async fn test_cancel_after_delivery_complete_rejected() {
        let f = fixture().await;
        let request = OrderLineRequest {
            item_id: f.book.id,
            count: 1,
        };
        let order_id = f.service.place_order(&f.member.id, &[request]).await.unwrap();

        let order = f.store.find_order(&order_id).await.unwrap().unwrap();
        let mut delivery = f
            .store
            .find_delivery(&order.delivery_id)
            .await
            .unwrap()
            .unwrap();
        delivery.status = DeliveryStatus::Complete;
        f.store.update_delivery(delivery).await.unwrap();

        let err = f.service.cancel_order(&order_id).await.unwrap_err();
        assert!(matches!(
            err,
            ShopError::Order(OrderError::AlreadyDelivered { .. })
        ));
    }

    #[tokio::test]
    async fn test_cancel_unknown_order_is_not_found() {
        let f = fixture().await;
        let err = f.service.cancel_order(&Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ShopError::Order(OrderError::NotFound { .. })));
    }
}
