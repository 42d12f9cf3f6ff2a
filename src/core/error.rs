//! Typed error handling for the order data-access core
//!
//! Every failure the crate can surface lives in one hierarchy so that
//! callers can match specific conditions instead of unwrapping generic
//! `anyhow::Error`s.
//!
//! # Error Categories
//!
//! - [`MemberError`]: member registration and lookup failures
//! - [`ItemError`]: catalog constraint violations (stock, quantity)
//! - [`OrderError`]: order lifecycle violations
//! - [`QueryError`]: malformed query text and illegal fetch combinations
//! - [`StorageError`]: storage backend failures
//!
//! Absence is not an error at the repository boundary: lookups return
//! `Ok(None)` and the service layer decides whether missing means failure.
//!
//! # Example
//!
//! ```rust,ignore
//! match service.cancel_order(order_id).await {
//!     Ok(()) => {}
//!     Err(ShopError::Order(OrderError::AlreadyDelivered { id })) => {
//!         println!("order {} already shipped", id);
//!     }
//!     Err(e) => eprintln!("cancel failed: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for the order shop core
#[derive(Debug)]
pub enum ShopError {
    /// Member registration / lookup errors
    Member(MemberError),

    /// Catalog item constraint violations
    Item(ItemError),

    /// Order lifecycle errors
    Order(OrderError),

    /// Query construction and fetch configuration errors
    Query(QueryError),

    /// Storage backend errors
    Storage(StorageError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopError::Member(e) => write!(f, "{}", e),
            ShopError::Item(e) => write!(f, "{}", e),
            ShopError::Order(e) => write!(f, "{}", e),
            ShopError::Query(e) => write!(f, "{}", e),
            ShopError::Storage(e) => write!(f, "{}", e),
            ShopError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ShopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShopError::Member(e) => Some(e),
            ShopError::Item(e) => Some(e),
            ShopError::Order(e) => Some(e),
            ShopError::Query(e) => Some(e),
            ShopError::Storage(e) => Some(e),
            ShopError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShopError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShopError::Member(e) => e.status_code(),
            ShopError::Item(e) => e.status_code(),
            ShopError::Order(e) => e.status_code(),
            ShopError::Query(e) => e.status_code(),
            ShopError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShopError::Member(e) => e.error_code(),
            ShopError::Item(e) => e.error_code(),
            ShopError::Order(e) => e.error_code(),
            ShopError::Query(e) => e.error_code(),
            ShopError::Storage(_) => "STORAGE_ERROR",
            ShopError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShopError::Item(ItemError::NotEnoughStock {
                item_id,
                requested,
                available,
            }) => Some(serde_json::json!({
                "item_id": item_id.to_string(),
                "requested": requested,
                "available": available,
            })),
            ShopError::Member(MemberError::Duplicate { name }) => {
                Some(serde_json::json!({ "name": name }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Member Errors
// =============================================================================

/// Errors related to member operations
#[derive(Debug)]
pub enum MemberError {
    /// Member was not found
    NotFound { id: Uuid },

    /// A member with the same name already exists.
    ///
    /// Raised by the pre-insert existence check; the check-then-insert pair
    /// is not atomic, so two concurrent joins with the same name can both
    /// pass it. The real fix is a unique index on the name column.
    Duplicate { name: String },
}

impl fmt::Display for MemberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberError::NotFound { id } => {
                write!(f, "member with id '{}' not found", id)
            }
            MemberError::Duplicate { name } => {
                write!(f, "member named '{}' already exists", name)
            }
        }
    }
}

impl std::error::Error for MemberError {}

impl MemberError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MemberError::NotFound { .. } => StatusCode::NOT_FOUND,
            MemberError::Duplicate { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            MemberError::NotFound { .. } => "MEMBER_NOT_FOUND",
            MemberError::Duplicate { .. } => "DUPLICATE_MEMBER",
        }
    }
}

impl From<MemberError> for ShopError {
    fn from(err: MemberError) -> Self {
        ShopError::Member(err)
    }
}

// =============================================================================
// Item Errors
// =============================================================================

/// Errors related to catalog items
#[derive(Debug)]
pub enum ItemError {
    /// Item was not found
    NotFound { id: Uuid },

    /// An order line would drive the item's stock below zero.
    ///
    /// Nothing is applied: the stock value is left exactly as it was.
    NotEnoughStock {
        item_id: Uuid,
        requested: u32,
        available: u32,
    },

    /// An order line was created with a zero quantity
    InvalidQuantity { count: u32 },

    /// Restoring stock would overflow the counter.
    StockOverflow {
        item_id: Uuid,
        current: u32,
        added: u32,
    },
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemError::NotFound { id } => {
                write!(f, "item with id '{}' not found", id)
            }
            ItemError::NotEnoughStock {
                item_id,
                requested,
                available,
            } => {
                write!(
                    f,
                    "not enough stock for item '{}': requested {}, available {}",
                    item_id, requested, available
                )
            }
            ItemError::InvalidQuantity { count } => {
                write!(f, "order quantity must be positive, got {}", count)
            }
            ItemError::StockOverflow {
                item_id,
                current,
                added,
            } => {
                write!(
                    f,
                    "restoring stock for item '{}' overflows: {} + {}",
                    item_id, current, added
                )
            }
        }
    }
}

impl std::error::Error for ItemError {}

impl ItemError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ItemError::NotFound { .. } => StatusCode::NOT_FOUND,
            ItemError::NotEnoughStock { .. } => StatusCode::CONFLICT,
            ItemError::InvalidQuantity { .. } => StatusCode::BAD_REQUEST,
            ItemError::StockOverflow { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ItemError::NotFound { .. } => "ITEM_NOT_FOUND",
            ItemError::NotEnoughStock { .. } => "NOT_ENOUGH_STOCK",
            ItemError::InvalidQuantity { .. } => "INVALID_QUANTITY",
            ItemError::StockOverflow { .. } => "STOCK_OVERFLOW",
        }
    }
}

impl From<ItemError> for ShopError {
    fn from(err: ItemError) -> Self {
        ShopError::Item(err)
    }
}

// =============================================================================
// Order Errors
// =============================================================================

/// Errors related to the order lifecycle
#[derive(Debug)]
pub enum OrderError {
    /// Order was not found
    NotFound { id: Uuid },

    /// Cancellation requested for an order that is already cancelled
    AlreadyCancelled { id: Uuid },

    /// Cancellation requested after the delivery completed
    AlreadyDelivered { id: Uuid },
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::NotFound { id } => {
                write!(f, "order with id '{}' not found", id)
            }
            OrderError::AlreadyCancelled { id } => {
                write!(f, "order '{}' is already cancelled", id)
            }
            OrderError::AlreadyDelivered { id } => {
                write!(
                    f,
                    "order '{}' was already delivered and cannot be cancelled",
                    id
                )
            }
        }
    }
}

impl std::error::Error for OrderError {}

impl OrderError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::NotFound { .. } => StatusCode::NOT_FOUND,
            OrderError::AlreadyCancelled { .. } => StatusCode::CONFLICT,
            OrderError::AlreadyDelivered { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::NotFound { .. } => "ORDER_NOT_FOUND",
            OrderError::AlreadyCancelled { .. } => "ORDER_ALREADY_CANCELLED",
            OrderError::AlreadyDelivered { .. } => "ORDER_ALREADY_DELIVERED",
        }
    }
}

impl From<OrderError> for ShopError {
    fn from(err: OrderError) -> Self {
        ShopError::Order(err)
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors related to query construction and fetch configuration
#[derive(Debug)]
pub enum QueryError {
    /// Query text did not match the expected shape
    MalformedQuery { text: String, message: String },

    /// Query text contained a clause the parser does not know
    UnknownClause { clause: String },

    /// A named parameter referenced by the query text was never bound
    MissingParameter { name: String },

    /// Pagination was requested together with a collection join-fetch.
    ///
    /// A to-many join multiplies order rows per item, so a row-level
    /// offset/limit would cut through the middle of an order. Rejected
    /// before any query runs instead of returning wrong page boundaries.
    PaginatedCollectionFetch,

    /// Page parameters were invalid (limit must be positive)
    InvalidPage { offset: usize, limit: usize },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::MalformedQuery { text, message } => {
                write!(f, "malformed query '{}': {}", text, message)
            }
            QueryError::UnknownClause { clause } => {
                write!(f, "unknown query clause '{}'", clause)
            }
            QueryError::MissingParameter { name } => {
                write!(f, "query parameter ':{}' was not bound", name)
            }
            QueryError::PaginatedCollectionFetch => {
                write!(
                    f,
                    "pagination cannot be combined with a collection join-fetch"
                )
            }
            QueryError::InvalidPage { offset, limit } => {
                write!(f, "invalid page: offset={}, limit={}", offset, limit)
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl QueryError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::MalformedQuery { .. } => "MALFORMED_QUERY",
            QueryError::UnknownClause { .. } => "UNKNOWN_QUERY_CLAUSE",
            QueryError::MissingParameter { .. } => "MISSING_QUERY_PARAMETER",
            QueryError::PaginatedCollectionFetch => "PAGINATED_COLLECTION_FETCH",
            QueryError::InvalidPage { .. } => "INVALID_PAGE",
        }
    }
}

impl From<QueryError> for ShopError {
    fn from(err: QueryError) -> Self {
        ShopError::Query(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the storage backend
#[derive(Debug)]
pub enum StorageError {
    /// Backend failure, including poisoned locks on the in-memory tables
    Backend { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Backend { message } => {
                write!(f, "storage backend error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ShopError {
    fn from(err: StorageError) -> Self {
        ShopError::Storage(err)
    }
}

impl From<anyhow::Error> for ShopError {
    fn from(err: anyhow::Error) -> Self {
        ShopError::Storage(StorageError::Backend {
            message: err.to_string(),
        })
    }
}
