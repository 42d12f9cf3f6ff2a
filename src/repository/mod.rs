//! Repositories: storage-facing data access per aggregate

pub mod item;
pub mod member;
pub mod order;
pub mod order_query;

pub use item::ItemRepository;
pub use member::MemberRepository;
pub use order::{FetchDepth, OrderRepository};
pub use order_query::OrderQueryRepository;
