//! End-to-end order lifecycle tests: placing, cancelling, stock movement
//! and the business-rule failures along the way.

mod support;

use ordershop::prelude::*;
use support::{empty_shop, seeded_shop};

mod place_order_tests {
    use super::*;

    #[tokio::test]
    async fn test_placed_order_has_status_order_and_two_lines() {
        let shop = seeded_shop().await;

        let order = shop
            .store
            .find_order(&shop.order_a)
            .await
            .unwrap()
            .expect("seeded order must exist");
        assert_eq!(order.status, OrderStatus::Order);

        let lines = shop.order_repo.lines_of(&shop.order_a).await.unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[tokio::test]
    async fn test_order_total_is_sum_of_price_times_count() {
        let shop = seeded_shop().await;

        // 1 x 10,000 + 2 x 20,000
        let total: i64 = shop
            .order_repo
            .lines_of(&shop.order_a)
            .await
            .unwrap()
            .iter()
            .map(|line| line.total_price())
            .sum();
        assert_eq!(total, 50_000);
    }

    #[tokio::test]
    async fn test_placing_an_order_deducts_stock() {
        let shop = seeded_shop().await;

        let jpa1 = shop.items.find_one(&shop.jpa1).await.unwrap();
        let jpa2 = shop.items.find_one(&shop.jpa2).await.unwrap();
        assert_eq!(jpa1.stock_quantity, 99);
        assert_eq!(jpa2.stock_quantity, 98);
    }

    #[tokio::test]
    async fn test_order_line_snapshots_price_at_order_time() {
        let shop = seeded_shop().await;

        // Raising the catalog price later must not touch existing lines.
        shop.items
            .update(&shop.jpa1, "JPA1 BOOK", 99_000, 99)
            .await
            .unwrap();

        let lines = shop.order_repo.lines_of(&shop.order_a).await.unwrap();
        let jpa1_line = lines
            .iter()
            .find(|line| line.item_id == shop.jpa1)
            .expect("line for JPA1 BOOK must exist");
        assert_eq!(jpa1_line.order_price, 10_000);
    }

    #[tokio::test]
    async fn test_over_ordering_fails_and_leaves_no_state() {
        let (store, members, items, orders) = empty_shop();
        let member = members
            .join("userC", Address::new("Busan", "3", "00000"))
            .await
            .unwrap();
        let book = items
            .save(Item::book("RARE BOOK", 5_000, 10, "lee", "5555"))
            .await
            .unwrap();

        let err = orders
            .place_order(
                &member,
                &[OrderLineRequest {
                    item_id: book,
                    count: 11,
                }],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShopError::Item(ItemError::NotEnoughStock {
                requested: 11,
                available: 10,
                ..
            })
        ));

        // No order row, no stock movement.
        assert!(store.list_orders().await.unwrap().is_empty());
        assert_eq!(items.find_one(&book).await.unwrap().stock_quantity, 10);
    }

    #[tokio::test]
    async fn test_failing_second_line_rolls_back_first() {
        let (store, members, items, orders) = empty_shop();
        let member = members
            .join("userC", Address::new("Busan", "3", "00000"))
            .await
            .unwrap();
        let plenty = items
            .save(Item::book("COMMON BOOK", 5_000, 50, "lee", "6666"))
            .await
            .unwrap();
        let scarce = items
            .save(Item::book("SCARCE BOOK", 5_000, 1, "lee", "7777"))
            .await
            .unwrap();

        let result = orders
            .place_order(
                &member,
                &[
                    OrderLineRequest {
                        item_id: plenty,
                        count: 5,
                    },
                    OrderLineRequest {
                        item_id: scarce,
                        count: 2,
                    },
                ],
            )
            .await;
        assert!(result.is_err());

        // The first line's deduction must not have been written either.
        assert_eq!(items.find_one(&plenty).await.unwrap().stock_quantity, 50);
        assert_eq!(items.find_one(&scarce).await.unwrap().stock_quantity, 1);
        assert!(store.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_count_line_is_rejected() {
        let shop = seeded_shop().await;

        let err = shop
            .orders
            .place_order(
                &shop.user_a,
                &[OrderLineRequest {
                    item_id: shop.jpa1,
                    count: 0,
                }],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShopError::Item(ItemError::InvalidQuantity { count: 0 })
        ));
    }

    #[tokio::test]
    async fn test_unknown_member_and_item_are_not_found() {
        let shop = seeded_shop().await;

        let no_member = shop
            .orders
            .place_order(
                &Uuid::new_v4(),
                &[OrderLineRequest {
                    item_id: shop.jpa1,
                    count: 1,
                }],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            no_member,
            ShopError::Member(MemberError::NotFound { .. })
        ));

        let no_item = shop
            .orders
            .place_order(
                &shop.user_a,
                &[OrderLineRequest {
                    item_id: Uuid::new_v4(),
                    count: 1,
                }],
            )
            .await
            .unwrap_err();
        assert!(matches!(no_item, ShopError::Item(ItemError::NotFound { .. })));
    }
}

mod cancel_order_tests {
    use super::*;

    #[tokio::test]
    async fn test_cancel_restores_stock_and_flips_status() {
        let shop = seeded_shop().await;

        shop.orders.cancel_order(&shop.order_a).await.unwrap();

        let order = shop
            .store
            .find_order(&shop.order_a)
            .await
            .unwrap()
            .expect("order must still exist after cancel");
        assert_eq!(order.status, OrderStatus::Cancelled);

        assert_eq!(shop.items.find_one(&shop.jpa1).await.unwrap().stock_quantity, 100);
        assert_eq!(shop.items.find_one(&shop.jpa2).await.unwrap().stock_quantity, 100);
    }

    #[tokio::test]
    async fn test_cancel_twice_is_rejected() {
        let shop = seeded_shop().await;

        shop.orders.cancel_order(&shop.order_a).await.unwrap();
        let err = shop.orders.cancel_order(&shop.order_a).await.unwrap_err();
        assert!(matches!(
            err,
            ShopError::Order(OrderError::AlreadyCancelled { .. })
        ));
    }

    #[tokio::test]
    async fn test_cancel_after_delivery_completed_is_rejected() {
        let shop = seeded_shop().await;

        let order = shop
            .store
            .find_order(&shop.order_a)
            .await
            .unwrap()
            .unwrap();
        let mut delivery = shop
            .store
            .find_delivery(&order.delivery_id)
            .await
            .unwrap()
            .unwrap();
        delivery.status = DeliveryStatus::Complete;
        shop.store.update_delivery(delivery).await.unwrap();

        let err = shop.orders.cancel_order(&shop.order_a).await.unwrap_err();
        assert!(matches!(
            err,
            ShopError::Order(OrderError::AlreadyDelivered { .. })
        ));

        // Stock stays deducted.
        assert_eq!(shop.items.find_one(&shop.jpa1).await.unwrap().stock_quantity, 99);
    }

    #[tokio::test]
    async fn test_cancel_unknown_order_is_not_found() {
        let shop = seeded_shop().await;

        let err = shop.orders.cancel_order(&Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ShopError::Order(OrderError::NotFound { .. })));
    }
}

mod member_tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_member_name_is_rejected() {
        let shop = seeded_shop().await;

        let err = shop
            .members
            .join("userA", Address::new("Seoul", "9", "99999"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShopError::Member(MemberError::Duplicate { .. })
        ));
        assert_eq!(shop.members.find_members().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_name_persists() {
        let shop = seeded_shop().await;

        shop.members
            .update_name(&shop.user_a, "userA2")
            .await
            .unwrap();
        let member = shop.members.find_one(&shop.user_a).await.unwrap();
        assert_eq!(member.name, "userA2");
        // Only the name changes.
        assert_eq!(member.address.city, "Seoul");
    }
}
