//! Seller API data models
//!
//! Request parameters and response payloads of the typed operations. Field
//! names follow the wire format; absent response fields fall back to their
//! defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query for the product card list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductsQuery {
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Page offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,

    /// Free text search over titles and vendor codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(rename = "brandID", skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at_from: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at_to: Option<String>,
}

/// A product card
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    /// Marketplace article
    #[serde(rename = "nmID")]
    pub nm_id: u64,
    /// Seller article
    pub vendor_code: String,
    pub title: String,
    pub description: Option<String>,
    pub brand: String,
    pub price: f64,
    /// Discount in percent
    pub discount: Option<f64>,
    pub quantity: i64,
    pub created_at: String,
    pub updated_at: String,
    pub photos: Vec<Photo>,
    pub characteristics: Vec<Characteristic>,
}

/// Image URLs of a product photo in every published size
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Photo {
    pub big: String,
    pub c246x328: String,
    pub c516x688: String,
    pub square: String,
    pub tm: String,
}

/// A product characteristic; values are strings or numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Characteristic {
    pub id: u64,
    pub name: String,
    pub value: Value,
}

/// Pagination cursor of the card list
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cursor {
    pub total: u64,
}

/// One page of product cards
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProductList {
    pub data: Vec<Product>,
    pub cursor: Option<Cursor>,
}

impl ProductList {
    /// Whether more cards follow `offset`
    pub fn has_more(&self, offset: u32) -> bool {
        self.cursor
            .map(|cursor| u64::from(offset) + (self.data.len() as u64) < cursor.total)
            .unwrap_or(false)
    }
}

/// Changes to a product card; unset fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContentUpdate {
    #[serde(rename = "nmID")]
    pub nm_id: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<Vec<Characteristic>>,
}

/// New price of a product
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceUpdate {
    #[serde(rename = "nmID")]
    pub nm_id: u64,

    pub price: u32,

    /// Discount in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<u32>,
}

/// New stock level of a product at one warehouse
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockUpdate {
    #[serde(rename = "nmID")]
    pub nm_id: u64,

    #[serde(rename = "warehouseID")]
    pub warehouse_id: u64,

    pub quantity: u32,
}

/// Fulfilment status of an FBS order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    Confirm,
    Complete,
    Cancel,
    CancelByClient,
}

/// Query for FBS orders
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    pub date_from: String,
    pub date_to: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,

    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take: Option<u32>,

    /// Page offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
}

/// Query for FBS picking tasks
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PickingTasksQuery {
    pub date_from: String,
    pub date_to: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

/// An FBS order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    pub id: u64,
    /// Assembly task id
    pub rid: String,
    #[serde(rename = "orderUID")]
    pub order_uid: String,
    pub article: String,
    #[serde(rename = "nmID")]
    pub nm_id: u64,
    pub barcode: String,
    pub quantity: u32,
    pub total_price: f64,
    pub created_at: String,
    pub status: Option<OrderStatus>,
    pub warehouse_name: Option<String>,
    pub oblast: Option<String>,
    #[serde(rename = "incomeID")]
    pub income_id: Option<u64>,
}

/// An FBS picking task
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PickingTask {
    pub id: u64,
    #[serde(rename = "orderUID")]
    pub order_uid: String,
    #[serde(rename = "nmID")]
    pub nm_id: u64,
    #[serde(rename = "chrtID")]
    pub chrt_id: u64,
    pub barcode: String,
    pub quantity: u32,
    #[serde(rename = "warehouseID")]
    pub warehouse_id: u64,
    pub date_created: String,
    pub status: Option<OrderStatus>,
}

/// Envelope of the order and picking task listings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OrderEnvelope<T> {
    pub orders: Vec<T>,
}

/// Status change of an FBS order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusUpdate {
    #[serde(rename = "orderUID")]
    pub order_uid: String,
    pub status: OrderStatus,
}

/// Date range of an analytics report, optionally narrowed to one product
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub date_from: String,
    pub date_to: String,

    #[serde(rename = "nmID", skip_serializing_if = "Option::is_none")]
    pub nm_id: Option<u64>,
}

/// Date range of a product's stock history
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockHistoryQuery {
    pub date_from: String,
    pub date_to: String,
    #[serde(rename = "nmID")]
    pub nm_id: u64,
}

/// Daily conversion funnel of a product
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesFunnel {
    #[serde(rename = "nmID")]
    pub nm_id: u64,
    pub date: String,
    pub views: u64,
    pub add_to_cart: u64,
    pub orders: u64,
    pub buyouts: u64,
    pub cancels: u64,
}

/// Stock level of a product at a warehouse on one date
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StockHistory {
    #[serde(rename = "nmID")]
    pub nm_id: u64,
    pub warehouse_name: String,
    pub quantity: i64,
    pub date: String,
}

/// Search keyword statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchQuery {
    pub keyword: String,
    pub frequency: u64,
    pub avg_price: f64,
    pub date: String,
}
