//! Product cards, prices and stocks

use serde_json::Value;
use tracing::info;

use super::models::{ContentUpdate, PriceUpdate, ProductList, ProductsQuery, StockUpdate};
use crate::client::{RequestOptions, SellerClient};
use crate::error::Result;

const CARDS_LIST_PATH: &str = "/content/v2/get/cards/list";
const CARDS_UPDATE_PATH: &str = "/content/v2/cards/update";
const PRICES_PATH: &str = "/public/api/v1/prices";
const STOCKS_PATH: &str = "/api/v3/stocks";

/// Product operations
///
/// Cards live on the content surface, prices on the general surface and
/// stocks on the marketplace surface.
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    content: &'a SellerClient,
    general: &'a SellerClient,
    marketplace: &'a SellerClient,
}

impl<'a> Products<'a> {
    pub(crate) fn new(
        content: &'a SellerClient,
        general: &'a SellerClient,
        marketplace: &'a SellerClient,
    ) -> Self {
        Self {
            content,
            general,
            marketplace,
        }
    }

    /// List product cards
    pub async fn list(&self, query: &ProductsQuery) -> Result<ProductList> {
        info!(limit = ?query.limit, offset = ?query.offset, "Getting products");

        let list: Option<ProductList> = self.content.get(CARDS_LIST_PATH, query).await?;
        let list = list.unwrap_or_default();

        info!(
            count = list.data.len(),
            total = ?list.cursor.map(|cursor| cursor.total),
            "Products retrieved"
        );
        Ok(list)
    }

    /// Change the title, description or characteristics of a card
    pub async fn update_content(&self, update: &ContentUpdate) -> Result<Value> {
        info!(nm_id = update.nm_id, "Updating product content");
        self.content
            .post(CARDS_UPDATE_PATH, update, RequestOptions::default())
            .await
    }

    /// Set the price and discount of a product
    pub async fn update_price(&self, update: &PriceUpdate) -> Result<Value> {
        info!(nm_id = update.nm_id, price = update.price, "Updating product price");
        self.general
            .post(PRICES_PATH, &[update], RequestOptions::default())
            .await
    }

    /// Set the stock of a product at a warehouse
    pub async fn update_stock(&self, update: &StockUpdate) -> Result<Value> {
        info!(
            nm_id = update.nm_id,
            warehouse_id = update.warehouse_id,
            quantity = update.quantity,
            "Updating product stock"
        );
        self.marketplace
            .post(STOCKS_PATH, &[update], RequestOptions::default())
            .await
    }
}
