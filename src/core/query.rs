//! Order search queries: one executable plan, three ways to build it
//!
//! A search over the order table always joins order to member and combines
//! its conditions with AND. The executable form is [`OrderQueryPlan`]; it
//! can be produced three interchangeable ways:
//!
//! 1. **Query text** ([`TextQuery`]): concatenate a small query language
//!    string with named parameters, then compile it back into a plan. This
//!    mirrors hand-built dynamic query strings and can fail at compile time
//!    (unknown clause, unbound parameter).
//! 2. **Criteria list**: push [`OrderPredicate`] values into a `Vec` and
//!    wrap them in a plan. Cannot fail.
//! 3. **Typed builder** ([`OrderQueryBuilder`]): a fluent builder whose
//!    `filter()` ignores `None`, so optional conditions collapse away at
//!    the call site. Cannot fail.
//!
//! All three must produce identical result sets for identical filters; the
//! predicate evaluation itself lives here so every executor shares it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::domain::{Member, Order, OrderStatus};
use crate::core::error::{QueryError, ShopError};

/// Hard ceiling on search results. Queries silently truncate beyond it;
/// callers needing more must page.
pub const SEARCH_CAP: usize = 1000;

/// A single AND-combined search condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderPredicate {
    /// Order status equals the given status
    StatusEq(OrderStatus),

    /// Member name contains the given substring
    MemberNameContains(String),
}

impl OrderPredicate {
    /// Evaluate this predicate against a joined (order, member) row.
    pub fn matches(&self, order: &Order, member: &Member) -> bool {
        match self {
            OrderPredicate::StatusEq(status) => order.status == *status,
            OrderPredicate::MemberNameContains(needle) => member.name.contains(needle.as_str()),
        }
    }
}

/// The compiled, executable form of an order search.
///
/// The order→member join is unconditional; only the predicate list and the
/// result window vary.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderQueryPlan {
    pub predicates: Vec<OrderPredicate>,
    pub offset: usize,
    pub limit: usize,
}

impl OrderQueryPlan {
    /// A plan with the given predicates and the default result cap.
    pub fn new(predicates: Vec<OrderPredicate>) -> Self {
        Self {
            predicates,
            offset: 0,
            limit: SEARCH_CAP,
        }
    }

    /// True when every predicate accepts the joined row.
    pub fn accepts(&self, order: &Order, member: &Member) -> bool {
        self.predicates.iter().all(|p| p.matches(order, member))
    }
}

// =============================================================================
// Strategy 1: query text
// =============================================================================

/// Base clause every search text starts from.
pub const BASE_QUERY: &str = "select o from orders o join members m";

/// A value bound to a named query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Status(OrderStatus),
    Text(String),
}

/// A dynamically concatenated search query with named parameters.
///
/// Built the way string-based dynamic queries always are: start from the
/// base select, append ` where` for the first condition and ` and` for each
/// one after, then bind the referenced parameters. [`TextQuery::compile`]
/// turns the text back into a plan, rejecting clauses it does not know and
/// parameters that were never bound.
#[derive(Debug, Clone)]
pub struct TextQuery {
    text: String,
    params: HashMap<String, BoundValue>,
    max_results: usize,
}

impl TextQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: HashMap::new(),
            max_results: SEARCH_CAP,
        }
    }

    /// The raw query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bind an order status to a named parameter.
    pub fn bind_status(mut self, name: impl Into<String>, status: OrderStatus) -> Self {
        self.params.insert(name.into(), BoundValue::Status(status));
        self
    }

    /// Bind a text value to a named parameter.
    pub fn bind_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .insert(name.into(), BoundValue::Text(value.into()));
        self
    }

    /// Cap the number of returned rows.
    pub fn set_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Compile the text into an executable plan.
    pub fn compile(&self) -> Result<OrderQueryPlan, ShopError> {
        let rest = self
            .text
            .strip_prefix(BASE_QUERY)
            .ok_or_else(|| QueryError::MalformedQuery {
                text: self.text.clone(),
                message: format!("expected query to start with '{}'", BASE_QUERY),
            })?
            .trim();

        let mut predicates = Vec::new();

        if !rest.is_empty() {
            let conditions = rest
                .strip_prefix("where ")
                .ok_or_else(|| QueryError::MalformedQuery {
                    text: self.text.clone(),
                    message: "expected 'where' before the first condition".to_string(),
                })?;

            for condition in conditions.split(" and ") {
                predicates.push(self.compile_condition(condition.trim())?);
            }
        }

        Ok(OrderQueryPlan {
            predicates,
            offset: 0,
            limit: self.max_results,
        })
    }

    fn compile_condition(&self, condition: &str) -> Result<OrderPredicate, ShopError> {
        if let Some(param) = condition.strip_prefix("o.status = :") {
            return match self.lookup(param)? {
                BoundValue::Status(status) => Ok(OrderPredicate::StatusEq(*status)),
                BoundValue::Text(_) => Err(QueryError::MalformedQuery {
                    text: self.text.clone(),
                    message: format!("parameter ':{}' is not a status", param),
                }
                .into()),
            };
        }
        if let Some(param) = condition.strip_prefix("m.name like :") {
            return match self.lookup(param)? {
                BoundValue::Text(value) => Ok(OrderPredicate::MemberNameContains(value.clone())),
                BoundValue::Status(_) => Err(QueryError::MalformedQuery {
                    text: self.text.clone(),
                    message: format!("parameter ':{}' is not text", param),
                }
                .into()),
            };
        }
        Err(QueryError::UnknownClause {
            clause: condition.to_string(),
        }
        .into())
    }

    fn lookup(&self, name: &str) -> Result<&BoundValue, ShopError> {
        self.params
            .get(name)
            .ok_or_else(|| {
                QueryError::MissingParameter {
                    name: name.to_string(),
                }
                .into()
            })
    }
}

// =============================================================================
// Strategy 3: typed builder
// =============================================================================

/// Fluent, type-safe plan builder.
///
/// `filter(None)` is a no-op, so optional conditions read linearly:
///
/// ```rust,ignore
/// let plan = OrderQueryBuilder::select_orders()
///     .filter(status_eq(filter.status))
///     .filter(member_name_contains(filter.member_name_condition()))
///     .limit(SEARCH_CAP)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct OrderQueryBuilder {
    predicates: Vec<OrderPredicate>,
    offset: usize,
    limit: Option<usize>,
}

impl OrderQueryBuilder {
    /// Start a plan over the order table joined to member.
    pub fn select_orders() -> Self {
        Self::default()
    }

    /// Append a condition; `None` is ignored.
    pub fn filter(mut self, predicate: Option<OrderPredicate>) -> Self {
        if let Some(p) = predicate {
            self.predicates.push(p);
        }
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> OrderQueryPlan {
        OrderQueryPlan {
            predicates: self.predicates,
            offset: self.offset,
            limit: self.limit.unwrap_or(SEARCH_CAP),
        }
    }
}

/// Status condition; `None` means no constraint.
pub fn status_eq(status: Option<OrderStatus>) -> Option<OrderPredicate> {
    status.map(OrderPredicate::StatusEq)
}

/// Member-name substring condition; `None` or a blank string means no
/// constraint.
pub fn member_name_contains(name: Option<&str>) -> Option<OrderPredicate> {
    name.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| OrderPredicate::MemberNameContains(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{Address, Member, Order};
    use uuid::Uuid;

    fn joined_row(status: OrderStatus, member_name: &str) -> (Order, Member) {
        let member = Member::new(member_name, Address::new("Seoul", "1", "12345"));
        let mut order = Order::new(member.id, Uuid::new_v4());
        order.status = status;
        (order, member)
    }

    #[test]
    fn test_compile_base_query_without_conditions() {
        let plan = TextQuery::new(BASE_QUERY).compile().unwrap();
        assert!(plan.predicates.is_empty());
        assert_eq!(plan.limit, SEARCH_CAP);
    }

    #[test]
    fn test_compile_both_conditions() {
        let text = format!("{} where o.status = :status and m.name like :name", BASE_QUERY);
        let plan = TextQuery::new(text)
            .bind_status("status", OrderStatus::Order)
            .bind_text("name", "userA")
            .compile()
            .unwrap();
        assert_eq!(
            plan.predicates,
            vec![
                OrderPredicate::StatusEq(OrderStatus::Order),
                OrderPredicate::MemberNameContains("userA".to_string()),
            ]
        );
    }

    #[test]
    fn test_compile_unknown_clause() {
        let text = format!("{} where o.total > :total", BASE_QUERY);
        let err = TextQuery::new(text)
            .bind_text("total", "100")
            .compile()
            .unwrap_err();
        assert!(matches!(
            err,
            ShopError::Query(QueryError::UnknownClause { .. })
        ));
    }

    #[test]
    fn test_compile_missing_parameter() {
        let text = format!("{} where o.status = :status", BASE_QUERY);
        let err = TextQuery::new(text).compile().unwrap_err();
        assert!(matches!(
            err,
            ShopError::Query(QueryError::MissingParameter { name }) if name == "status"
        ));
    }

    #[test]
    fn test_compile_wrongly_typed_parameter() {
        let text = format!("{} where o.status = :status", BASE_QUERY);
        let err = TextQuery::new(text)
            .bind_text("status", "ORDER")
            .compile()
            .unwrap_err();
        assert!(matches!(
            err,
            ShopError::Query(QueryError::MalformedQuery { .. })
        ));
    }

    #[test]
    fn test_compile_rejects_foreign_base() {
        let err = TextQuery::new("select m from members m").compile().unwrap_err();
        assert!(matches!(
            err,
            ShopError::Query(QueryError::MalformedQuery { .. })
        ));
    }

    #[test]
    fn test_builder_skips_none_filters() {
        let plan = OrderQueryBuilder::select_orders()
            .filter(status_eq(None))
            .filter(member_name_contains(None))
            .build();
        assert!(plan.predicates.is_empty());
    }

    #[test]
    fn test_builder_blank_name_is_no_constraint() {
        let plan = OrderQueryBuilder::select_orders()
            .filter(member_name_contains(Some("  ")))
            .build();
        assert!(plan.predicates.is_empty());
    }

    #[test]
    fn test_builder_collects_predicates_in_order() {
        let plan = OrderQueryBuilder::select_orders()
            .filter(status_eq(Some(OrderStatus::Cancelled)))
            .filter(member_name_contains(Some("user")))
            .offset(10)
            .limit(50)
            .build();
        assert_eq!(plan.predicates.len(), 2);
        assert_eq!(plan.offset, 10);
        assert_eq!(plan.limit, 50);
    }

    #[test]
    fn test_predicate_status_eq() {
        let (order, member) = joined_row(OrderStatus::Order, "userA");
        assert!(OrderPredicate::StatusEq(OrderStatus::Order).matches(&order, &member));
        assert!(!OrderPredicate::StatusEq(OrderStatus::Cancelled).matches(&order, &member));
    }

    #[test]
    fn test_predicate_member_name_substring() {
        let (order, member) = joined_row(OrderStatus::Order, "userA");
        let p = OrderPredicate::MemberNameContains("serA".to_string());
        assert!(p.matches(&order, &member));
        let p = OrderPredicate::MemberNameContains("userB".to_string());
        assert!(!p.matches(&order, &member));
    }

    #[test]
    fn test_plan_accepts_is_conjunction() {
        let (order, member) = joined_row(OrderStatus::Order, "userA");
        let plan = OrderQueryPlan::new(vec![
            OrderPredicate::StatusEq(OrderStatus::Order),
            OrderPredicate::MemberNameContains("userB".to_string()),
        ]);
        assert!(!plan.accepts(&order, &member));
    }
}
