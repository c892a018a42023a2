//! Records exchanged with the catalog/e-commerce backend.
//!
//! Entities mirror the backend's JSON one-to-one (camelCase keys, optional
//! relations). Unknown fields are ignored so that backend additions never
//! break decoding. Request DTOs serialize only the fields that are set.

pub mod cart;
pub mod category;
pub mod dashboard;
pub mod list;
pub mod order;
pub mod product;
pub mod user;

pub use cart::*;
pub use category::*;
pub use dashboard::*;
pub use list::*;
pub use order::*;
pub use product::*;
pub use user::*;

/// Append `key=value` to `pairs` when `value` is set.
pub(crate) fn push_pair<T: ToString>(
    pairs: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<&T>,
) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}
