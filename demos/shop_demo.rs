//! Order Shop Demo
//!
//! Seeds two members with two orders each, then walks through the query
//! layer:
//! - the three interchangeable search strategies
//! - eager association fetching at each depth
//! - the naive vs batched vs flat projection paths, with query counts
//!
//! Run with `cargo run --example shop_demo`.

use ordershop::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), ShopError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let store = Arc::new(InMemoryShopStore::new());
    let as_dyn: Arc<dyn ShopStore> = store.clone();
    let members = MemberService::new(MemberRepository::new(as_dyn.clone()));
    let items = ItemService::new(ItemRepository::new(as_dyn.clone()));
    let orders = OrderService::new(
        OrderRepository::new(as_dyn.clone()),
        MemberRepository::new(as_dyn.clone()),
        ItemRepository::new(as_dyn.clone()),
    );

    // Seed: userA orders 1x JPA1 + 2x JPA2, userB orders 3x SPRING1 + 4x SPRING2.
    let user_a = members
        .join("userA", Address::new("Seoul", "1", "12345"))
        .await?;
    let jpa1 = items
        .save(Item::book("JPA1 BOOK", 10_000, 100, "kim", "1111"))
        .await?;
    let jpa2 = items
        .save(Item::book("JPA2 BOOK", 20_000, 100, "kim", "2222"))
        .await?;
    orders
        .place_order(
            &user_a,
            &[
                OrderLineRequest { item_id: jpa1, count: 1 },
                OrderLineRequest { item_id: jpa2, count: 2 },
            ],
        )
        .await?;

    let user_b = members
        .join("userB", Address::new("Jinju", "2", "54321"))
        .await?;
    let spring1 = items
        .save(Item::book("SPRING1 BOOK", 20_000, 200, "park", "3333"))
        .await?;
    let spring2 = items
        .save(Item::book("SPRING2 BOOK", 40_000, 300, "park", "4444"))
        .await?;
    orders
        .place_order(
            &user_b,
            &[
                OrderLineRequest { item_id: spring1, count: 3 },
                OrderLineRequest { item_id: spring2, count: 4 },
            ],
        )
        .await?;

    println!("🛒 Seeded 2 members, 4 books, 2 orders\n");

    // === Search strategies ===
    let repo = OrderRepository::new(as_dyn.clone());
    let filter = OrderFilter::default().with_member_name("userA");
    println!("🔍 Search for member 'userA':");
    println!("   text:     {} order(s)", repo.search_by_text(&filter).await?.len());
    println!("   criteria: {} order(s)", repo.search_by_criteria(&filter).await?.len());
    println!("   builder:  {} order(s)", repo.search_by_builder(&filter).await?.len());

    // === Association fetching ===
    let graphs = repo
        .find_all_with_associations(FetchDepth::WithItems, None)
        .await?;
    println!("\n📦 Orders with items (de-duplicated join):");
    for graph in &graphs {
        let member = graph.member.as_ref().map(|m| m.name.as_str()).unwrap_or("?");
        println!(
            "   {}: {} line(s), total {}",
            member,
            graph.lines.len(),
            graph.total_price()
        );
    }

    // === Projection paths ===
    let queries = OrderQueryRepository::new(as_dyn);

    store.reset_query_count();
    queries.find_projections_naive().await?;
    println!("\n📊 Query counts for 2 orders:");
    println!("   naive:   {} (1 + one per order)", store.query_count());

    store.reset_query_count();
    queries.find_projections_batched().await?;
    println!("   batched: {} (1 + one IN query)", store.query_count());

    store.reset_query_count();
    let flat = queries.find_projections_flat().await?;
    println!("   flat:    {} (single joined query)", store.query_count());

    println!("\n🧾 Projections:");
    for projection in &flat {
        println!(
            "   {} ({:?}): {} item line(s)",
            projection.member_name,
            projection.status,
            projection.items.len()
        );
    }

    Ok(())
}
