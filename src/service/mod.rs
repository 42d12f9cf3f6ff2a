//! Services: business operations over the repositories

pub mod item;
pub mod member;
pub mod order;

pub use item::ItemService;
pub use member::MemberService;
pub use order::{OrderLineRequest, OrderService};
