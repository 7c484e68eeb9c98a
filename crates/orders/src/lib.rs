use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use shared::{
    catalog::service_title_or_placeholder,
    domain::{NewOrder, Order, OrderStatus},
    error::{OrderError, REQUIRED_FIELDS_MESSAGE},
};
use storage::BlobStore;
use tracing::{debug, info, warn};

pub mod id;
pub mod reconcile;
pub mod render;

use id::generate_order_id;
use reconcile::parse_orders;

pub const DEFAULT_STORAGE_KEY: &str = "orders_demo";
pub const DELETE_PROMPT: &str = "Удалить заказ? Это действие нельзя отменить.";

// Regenerating only matters when two creations land on the same millisecond.
const MAX_ID_ATTEMPTS: usize = 16;

pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Asked before a destructive operation; `false` aborts it.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    NotFound,
}

/// Owns the order collection. Every operation reads the whole blob, mutates
/// it in memory and writes the whole blob back.
#[derive(Clone)]
pub struct OrderStore {
    store: Arc<dyn BlobStore>,
    key: String,
    clock: Arc<dyn Clock>,
}

impl OrderStore {
    pub fn new(store: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn load(&self) -> Result<Vec<Order>, OrderError> {
        let raw = self
            .store
            .get(&self.key)
            .await
            .with_context(|| format!("failed to read orders under '{}'", self.key))?;
        let orders = parse_orders(raw.as_deref(), self.clock.now_millis());
        debug!(key = %self.key, count = orders.len(), "loaded orders");
        Ok(orders)
    }

    pub async fn save(&self, orders: &[Order]) -> Result<(), OrderError> {
        let raw = serde_json::to_string(orders).context("failed to serialize orders")?;
        self.store
            .set(&self.key, &raw)
            .await
            .with_context(|| format!("failed to write orders under '{}'", self.key))?;
        debug!(key = %self.key, count = orders.len(), "saved orders");
        Ok(())
    }

    pub async fn create(&self, fields: NewOrder) -> Result<Order, OrderError> {
        let name = fields.name.trim();
        let email = fields.email.trim();
        let service_id = fields.service_id.trim();
        if name.is_empty() || email.is_empty() || service_id.is_empty() {
            return Err(OrderError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        let mut orders = self.load().await?;
        let now = self.clock.now_millis();
        let order = Order {
            id: self.unused_id(&orders, now),
            name: name.to_string(),
            email: email.to_string(),
            phone: fields.phone.trim().to_string(),
            service_id: service_id.to_string(),
            service_title: service_title_or_placeholder(service_id).to_string(),
            notes: fields.notes.trim().to_string(),
            status: OrderStatus::default().into(),
            created: now,
        };
        orders.push(order.clone());
        self.save(&orders).await?;

        info!(order_id = %order.id, service_id = %order.service_id, "order created");
        Ok(order)
    }

    /// Advances the status one step around the cycle. `None` when no order
    /// has this id; nothing is written in that case.
    pub async fn toggle_status(&self, id: &str) -> Result<Option<Order>, OrderError> {
        let mut orders = self.load().await?;
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            debug!(order_id = id, "toggle for unknown order ignored");
            return Ok(None);
        };

        let next = order.status.next();
        let previous = std::mem::replace(&mut order.status, next.into());
        let updated = order.clone();
        self.save(&orders).await?;

        info!(
            order_id = id,
            from = previous.class(),
            to = next.class(),
            "order status changed"
        );
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: &str, confirm: &dyn Confirm) -> Result<DeleteOutcome, OrderError> {
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(order_id = id, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let mut orders = self.load().await?;
        let before = orders.len();
        orders.retain(|o| o.id != id);
        let removed = before - orders.len();
        self.save(&orders).await?;

        if removed == 0 {
            debug!(order_id = id, "delete for unknown order");
            return Ok(DeleteOutcome::NotFound);
        }
        if removed > 1 {
            warn!(order_id = id, removed, "removed several orders sharing one id");
        }
        info!(order_id = id, "order deleted");
        Ok(DeleteOutcome::Deleted)
    }

    fn unused_id(&self, orders: &[Order], now: i64) -> String {
        let mut id = generate_order_id(now);
        for _ in 1..MAX_ID_ATTEMPTS {
            if !orders.iter().any(|o| o.id == id) {
                break;
            }
            id = generate_order_id(now);
        }
        id
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
