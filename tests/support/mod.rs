//! Shared fixture for integration tests: a seeded in-memory shop.
//!
//! Two members, four books, two orders:
//! - userA (Seoul) ordered 1x JPA1 BOOK (10,000) and 2x JPA2 BOOK (20,000)
//! - userB (Jinju) ordered 3x SPRING1 BOOK (20,000) and 4x SPRING2 BOOK (40,000)

#![allow(dead_code)]

use std::sync::Arc;

use ordershop::prelude::*;

pub struct ShopFixture {
    pub store: Arc<InMemoryShopStore>,
    pub members: MemberService,
    pub items: ItemService,
    pub orders: OrderService,
    pub order_repo: OrderRepository,
    pub queries: OrderQueryRepository,

    pub user_a: Uuid,
    pub user_b: Uuid,
    pub jpa1: Uuid,
    pub jpa2: Uuid,
    pub spring1: Uuid,
    pub spring2: Uuid,
    pub order_a: Uuid,
    pub order_b: Uuid,
}

/// Build the services over a fresh store, without seeding anything.
pub fn empty_shop() -> (
    Arc<InMemoryShopStore>,
    MemberService,
    ItemService,
    OrderService,
) {
    let store = Arc::new(InMemoryShopStore::new());
    let as_dyn: Arc<dyn ShopStore> = store.clone();
    let members = MemberService::new(MemberRepository::new(as_dyn.clone()));
    let items = ItemService::new(ItemRepository::new(as_dyn.clone()));
    let orders = OrderService::new(
        OrderRepository::new(as_dyn.clone()),
        MemberRepository::new(as_dyn.clone()),
        ItemRepository::new(as_dyn),
    );
    (store, members, items, orders)
}

/// Seed the standard two-member, two-order dataset through the services.
pub async fn seeded_shop() -> ShopFixture {
    let (store, members, items, orders) = empty_shop();
    let as_dyn: Arc<dyn ShopStore> = store.clone();

    let user_a = members
        .join("userA", Address::new("Seoul", "1", "12345"))
        .await
        .unwrap();
    let jpa1 = items
        .save(Item::book("JPA1 BOOK", 10_000, 100, "kim", "1111"))
        .await
        .unwrap();
    let jpa2 = items
        .save(Item::book("JPA2 BOOK", 20_000, 100, "kim", "2222"))
        .await
        .unwrap();
    let order_a = orders
        .place_order(
            &user_a,
            &[
                OrderLineRequest {
                    item_id: jpa1,
                    count: 1,
                },
                OrderLineRequest {
                    item_id: jpa2,
                    count: 2,
                },
            ],
        )
        .await
        .unwrap();

    let user_b = members
        .join("userB", Address::new("Jinju", "2", "54321"))
        .await
        .unwrap();
    let spring1 = items
        .save(Item::book("SPRING1 BOOK", 20_000, 200, "park", "3333"))
        .await
        .unwrap();
    let spring2 = items
        .save(Item::book("SPRING2 BOOK", 40_000, 300, "park", "4444"))
        .await
        .unwrap();
    let order_b = orders
        .place_order(
            &user_b,
            &[
                OrderLineRequest {
                    item_id: spring1,
                    count: 3,
                },
                OrderLineRequest {
                    item_id: spring2,
                    count: 4,
                },
            ],
        )
        .await
        .unwrap();

    store.reset_query_count();

    ShopFixture {
        order_repo: OrderRepository::new(as_dyn.clone()),
        queries: OrderQueryRepository::new(as_dyn),
        store,
        members,
        items,
        orders,
        user_a,
        user_b,
        jpa1,
        jpa2,
        spring1,
        spring2,
        order_a,
        order_b,
    }
}
