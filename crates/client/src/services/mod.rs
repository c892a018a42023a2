//! Per-resource services.
//!
//! Each service maps a domain operation to one HTTP request and decodes
//! the response. Services are cheap to clone and share the connection pool
//! and session state of the [`ApiClient`](crate::ApiClient) they came from.

mod cart;
mod categories;
mod dashboard;
mod orders;
mod products;
mod users;

pub use cart::{CartScope, CartService};
pub use categories::CategoryService;
pub use dashboard::DashboardService;
pub use orders::OrderService;
pub use products::ProductService;
pub use users::UserService;
