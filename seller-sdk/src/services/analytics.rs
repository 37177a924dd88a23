//! Sales analytics reports on the statistics surface

use serde_json::Value;
use tracing::info;

use super::array_or_empty;
use super::models::{AnalyticsQuery, SalesFunnel, SearchQuery, StockHistory, StockHistoryQuery};
use crate::client::SellerClient;
use crate::error::Result;

const SALES_FUNNEL_PATH: &str = "/api/v1/supplier/analytics/sales-funnel";
const STOCK_HISTORY_PATH: &str = "/api/v1/supplier/analytics/stock-history";
const SEARCH_QUERIES_PATH: &str = "/api/v1/supplier/analytics/search-queries";

/// Analytics reports
#[derive(Debug, Clone, Copy)]
pub struct Analytics<'a> {
    statistics: &'a SellerClient,
}

impl<'a> Analytics<'a> {
    pub(crate) fn new(statistics: &'a SellerClient) -> Self {
        Self { statistics }
    }

    /// Views, carts, orders, buyouts and cancels per day
    pub async fn sales_funnel(&self, query: &AnalyticsQuery) -> Result<Vec<SalesFunnel>> {
        info!(date_from = %query.date_from, date_to = %query.date_to, "Getting sales funnel");
        let value: Value = self.statistics.get(SALES_FUNNEL_PATH, query).await?;
        array_or_empty(self.statistics, SALES_FUNNEL_PATH, value)
    }

    /// Daily stock levels of one product
    pub async fn stock_history(&self, query: &StockHistoryQuery) -> Result<Vec<StockHistory>> {
        info!(nm_id = query.nm_id, date_from = %query.date_from, "Getting stock history");
        let value: Value = self.statistics.get(STOCK_HISTORY_PATH, query).await?;
        array_or_empty(self.statistics, STOCK_HISTORY_PATH, value)
    }

    /// Keywords buyers searched for
    pub async fn search_queries(&self, query: &AnalyticsQuery) -> Result<Vec<SearchQuery>> {
        info!(date_from = %query.date_from, date_to = %query.date_to, "Getting search queries");
        let value: Value = self.statistics.get(SEARCH_QUERIES_PATH, query).await?;
        array_or_empty(self.statistics, SEARCH_QUERIES_PATH, value)
    }
}
