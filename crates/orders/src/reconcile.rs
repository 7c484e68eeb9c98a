//! Best-effort repair of persisted order records.
//!
//! Stored data may have been written by an older build or edited by hand, so
//! nothing here rejects a record: every missing or unusable field is replaced
//! with a default and the result is always a well-typed [`Order`].

use serde_json::{Map, Value};
use shared::domain::{Order, OrderStatus, RecordedStatus};
use tracing::warn;

use crate::id::fallback_order_id;

pub const UNNAMED_CUSTOMER: &str = "Не указано";

/// Parses the whole persisted blob. Missing, unparsable or non-list input is
/// an empty collection.
pub fn parse_orders(raw: Option<&str>, now_ms: i64) -> Vec<Order> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, "stored orders are not valid JSON; starting empty");
            return Vec::new();
        }
    };

    let Value::Array(records) = value else {
        warn!("stored orders are not a list; starting empty");
        return Vec::new();
    };

    records
        .iter()
        .map(|record| reconcile_record(record, now_ms))
        .collect()
}

pub fn reconcile_record(record: &Value, now_ms: i64) -> Order {
    let empty = Map::new();
    let fields = record.as_object().unwrap_or(&empty);

    let id = text_field(fields, "id").unwrap_or_else(|| fallback_order_id(now_ms));
    let status = resolve_status(fields, &id);

    Order {
        name: text_field(fields, "name").unwrap_or_else(|| UNNAMED_CUSTOMER.to_string()),
        email: text_field(fields, "email").unwrap_or_default(),
        phone: text_field(fields, "phone").unwrap_or_default(),
        service_id: text_field(fields, "serviceId").unwrap_or_default(),
        service_title: text_field(fields, "serviceTitle").unwrap_or_default(),
        notes: text_field(fields, "notes").unwrap_or_default(),
        status,
        created: created_field(fields).unwrap_or(now_ms),
        id,
    }
}

/// A missing status is the first state. A status outside the cycle is kept
/// as written, together with its tag.
fn resolve_status(fields: &Map<String, Value>, id: &str) -> RecordedStatus {
    let Some(name) = text_field(fields, "status") else {
        return RecordedStatus::default();
    };
    if let Some(status) = OrderStatus::from_name(&name) {
        return status.into();
    }

    let class =
        text_field(fields, "statusClass").unwrap_or_else(|| OrderStatus::New.class().to_string());
    warn!(
        order_id = id,
        status = %name,
        status_class = %class,
        "unrecognized order status; next toggle restarts the cycle"
    );
    RecordedStatus::Unrecognized { name, class }
}

/// Non-empty strings are kept and numbers are rendered; anything else is
/// treated as missing.
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn created_field(fields: &Map<String, Value>) -> Option<i64> {
    let created = match fields.get("created")? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        _ => return None,
    };
    (created != 0).then_some(created)
}
