//! Search filter and pagination parameters

use serde::{Deserialize, Serialize};

use crate::core::domain::OrderStatus;
use crate::core::error::{QueryError, ShopError};

/// Search conditions for the order table.
///
/// Both conditions are optional; an absent condition means "no constraint".
/// A blank member name (empty or whitespace only) is treated the same as an
/// absent one. Illegal filters cannot be expressed: the status field only
/// admits real statuses and the name is just a substring, so there is no
/// runtime validation step.
///
/// # Example
/// ```rust,ignore
/// let filter = OrderFilter::default().with_status(OrderStatus::Order);
/// let orders = order_repository.search_by_criteria(&filter).await?;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFilter {
    /// Substring matched against the member name
    pub member_name: Option<String>,

    /// Exact order status
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    pub fn with_member_name(mut self, name: impl Into<String>) -> Self {
        self.member_name = Some(name.into());
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The member-name condition, if it actually constrains anything.
    pub fn member_name_condition(&self) -> Option<&str> {
        self.member_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Offset/limit window over order rows.
///
/// Defaults to `offset=0, limit=100` when the caller omits parameters.
/// The limit must be positive; the offset may be anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Page {
    #[serde(default)]
    pub offset: usize,

    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

impl Page {
    /// Build a page window, rejecting a zero limit.
    pub fn new(offset: usize, limit: usize) -> Result<Self, ShopError> {
        if limit == 0 {
            return Err(QueryError::InvalidPage { offset, limit }.into());
        }
        Ok(Self { offset, limit })
    }
}
