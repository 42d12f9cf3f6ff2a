//! Core types: domain model, errors, filters, query plans, projections and
//! the storage contract

pub mod domain;
pub mod error;
pub mod filter;
pub mod projection;
pub mod query;
pub mod store;

pub use domain::{
    Address, Delivery, DeliveryStatus, Item, ItemKind, Member, Order, OrderItem, OrderStatus,
};
pub use error::{
    ErrorResponse, ItemError, MemberError, OrderError, QueryError, ShopError, StorageError,
};
pub use filter::{OrderFilter, Page};
pub use projection::{
    FlatOrderRow, ItemLineProjection, OrderGraph, OrderJoinRow, OrderLineRow, OrderProjection,
    OrderSummary, OrderToOneRow,
};
pub use query::{
    BoundValue, OrderPredicate, OrderQueryBuilder, OrderQueryPlan, SEARCH_CAP, TextQuery,
};
pub use store::ShopStore;
