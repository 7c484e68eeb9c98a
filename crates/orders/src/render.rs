//! HTML and terminal views over the catalog and the order collection.
//! Views always re-render the whole list; orders are shown newest first.

use chrono::{Local, TimeZone};
use shared::{catalog::list_services, domain::Order};

pub const EMPTY_ORDERS_HTML: &str = r#"<p class="muted">Заказов пока нет.</p>"#;
pub const EMPTY_ORDERS_TEXT: &str = "Заказов пока нет.";

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn format_created(created_ms: i64) -> String {
    match Local.timestamp_millis_opt(created_ms).single() {
        Some(at) => at.format("%d.%m.%Y, %H:%M:%S").to_string(),
        None => created_ms.to_string(),
    }
}

/// Service cards followed by the `<select>` options used by the order form.
pub fn render_services() -> String {
    let mut cards = String::new();
    let mut options = String::from(r#"<option value="">Выберите услугу</option>"#);
    for service in list_services() {
        cards.push_str(&format!(
            r#"<div class="card"><h3>{}</h3><p>{}</p><div class="price">{}</div></div>"#,
            escape_html(service.title),
            escape_html(service.description),
            escape_html(service.price),
        ));
        options.push_str(&format!(
            r#"<option value="{}">{} — {}</option>"#,
            escape_html(service.id),
            escape_html(service.title),
            escape_html(service.price),
        ));
    }
    format!(
        "<div id=\"services\">{cards}</div>\n<select id=\"service\" name=\"service\">{options}</select>"
    )
}

pub fn render_orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return EMPTY_ORDERS_HTML.to_string();
    }

    let mut out = String::new();
    for order in orders.iter().rev() {
        let notes = if order.notes.is_empty() {
            String::new()
        } else {
            format!(
                r#"<div class="notes">Комментарий: {}</div>"#,
                escape_html(&order.notes)
            )
        };
        out.push_str(&format!(
            concat!(
                r#"<div class="order-item" data-id="{id}">"#,
                r#"<div><div class="title">{name} — {service}</div>"#,
                r#"<div class="meta">{email} • {created}</div>{notes}</div>"#,
                r#"<div class="actions">"#,
                r#"<button class="btn-status {class}" data-action="toggle-status" title="Поменять статус">{status}</button>"#,
                r#"<small>ID: {id}</small>"#,
                r#"<button class="btn-delete" data-action="delete" title="Удалить заказ">Удалить</button>"#,
                "</div></div>\n"
            ),
            id = escape_html(&order.id),
            name = escape_html(&order.name),
            service = escape_html(&order.service_title),
            email = escape_html(&order.email),
            created = format_created(order.created),
            notes = notes,
            class = escape_html(order.status.class()),
            status = escape_html(order.status.name()),
        ));
    }
    out
}

/// Standalone page with the catalog and the current orders.
pub fn render_page(orders: &[Order]) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n<html lang=\"ru\">\n<head><meta charset=\"utf-8\"><title>Заказы</title></head>\n",
            "<body>\n<section>\n{services}\n</section>\n",
            "<section id=\"orders\">\n{orders}</section>\n</body>\n</html>\n"
        ),
        services = render_services(),
        orders = render_orders(orders),
    )
}

pub fn render_orders_text(orders: &[Order]) -> String {
    if orders.is_empty() {
        return format!("{EMPTY_ORDERS_TEXT}\n");
    }

    let mut out = String::new();
    for order in orders.iter().rev() {
        out.push_str(&format!(
            "{}  [{}]  {} — {}\n",
            order.id,
            order.status.name(),
            order.name,
            order.service_title
        ));
        out.push_str(&format!(
            "    {} • {}\n",
            order.email,
            format_created(order.created)
        ));
        if !order.phone.is_empty() {
            out.push_str(&format!("    тел.: {}\n", order.phone));
        }
        if !order.notes.is_empty() {
            out.push_str(&format!("    Комментарий: {}\n", order.notes));
        }
    }
    out
}
