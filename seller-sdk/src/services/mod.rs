//! Typed operations of the seller API
//!
//! Each group borrows the surface clients it talks to, so every operation
//! runs through the shared pipeline and draws from the shared rate limiter.

mod analytics;
mod models;
mod orders;
mod products;

pub use analytics::Analytics;
pub use models::*;
pub use orders::Orders;
pub use products::Products;

use serde_json::Value;

use crate::client::SellerClient;
use crate::error::{Result, SdkError};

/// Decode a listing that the API may return as something other than an array
///
/// Anything but an array is an empty listing.
fn array_or_empty<T>(client: &SellerClient, path: &str, value: Value) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(|e| SdkError::Decode {
            url: client.url_for(path),
            message: e.to_string(),
        }),
        _ => Ok(Vec::new()),
    }
}
