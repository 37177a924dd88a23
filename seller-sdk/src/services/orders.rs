//! FBS orders and picking tasks

use serde_json::Value;
use tracing::info;

use super::models::{Order, OrderEnvelope, OrdersQuery, PickingTask, PickingTasksQuery, StatusUpdate};
use crate::client::SellerClient;
use crate::error::Result;

const ORDERS_PATH: &str = "/api/v3/orders";
const PICKING_TASKS_PATH: &str = "/api/v3/supplies/orders";
const ORDER_STATUS_PATH: &str = "/api/v3/orders/status";

/// Orders fulfilled by the seller, all on the marketplace surface
#[derive(Debug, Clone, Copy)]
pub struct Orders<'a> {
    marketplace: &'a SellerClient,
}

impl<'a> Orders<'a> {
    pub(crate) fn new(marketplace: &'a SellerClient) -> Self {
        Self { marketplace }
    }

    /// Orders created within a date range
    pub async fn list(&self, query: &OrdersQuery) -> Result<Vec<Order>> {
        info!(date_from = %query.date_from, date_to = %query.date_to, "Getting FBS orders");

        let envelope: Option<OrderEnvelope<Order>> = self.marketplace.get(ORDERS_PATH, query).await?;
        let orders = envelope.map(|envelope| envelope.orders).unwrap_or_default();

        info!(count = orders.len(), "FBS orders retrieved");
        Ok(orders)
    }

    /// Assembly tasks attached to supplies
    pub async fn picking_tasks(&self, query: &PickingTasksQuery) -> Result<Vec<PickingTask>> {
        info!(date_from = %query.date_from, date_to = %query.date_to, "Getting FBS picking tasks");

        let envelope: Option<OrderEnvelope<PickingTask>> =
            self.marketplace.get(PICKING_TASKS_PATH, query).await?;
        let tasks = envelope.map(|envelope| envelope.orders).unwrap_or_default();

        info!(count = tasks.len(), "FBS picking tasks retrieved");
        Ok(tasks)
    }

    /// Move an order to another status
    pub async fn update_status(&self, update: &StatusUpdate) -> Result<Value> {
        info!(order_uid = %update.order_uid, status = ?update.status, "Updating FBS order status");
        self.marketplace.patch(ORDER_STATUS_PATH, update).await
    }
}
