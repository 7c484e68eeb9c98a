use std::collections::HashSet;

use storage::{BlobStore, MemoryStore};

use super::*;

struct FixedClock(i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

const NOW: i64 = 1_700_000_000_000;

fn setup() -> (OrderStore, MemoryStore) {
    let blobs = MemoryStore::default();
    let store = OrderStore::new(Arc::new(blobs.clone()), DEFAULT_STORAGE_KEY)
        .with_clock(Arc::new(FixedClock(NOW)));
    (store, blobs)
}

fn ann() -> NewOrder {
    NewOrder {
        name: "Ann".into(),
        email: "a@x.com".into(),
        service_id: "s1".into(),
        ..NewOrder::default()
    }
}

fn accept(_: &str) -> bool {
    true
}

fn decline(_: &str) -> bool {
    false
}

#[tokio::test]
async fn create_persists_one_new_order() {
    let (store, _) = setup();
    let created = store.create(ann()).await.expect("create");

    let orders = store.load().await.expect("load");
    assert_eq!(orders, vec![created.clone()]);
    assert_eq!(created.name, "Ann");
    assert_eq!(created.email, "a@x.com");
    assert_eq!(created.service_title, "Дизайн логотипа");
    assert_eq!(created.status, OrderStatus::New);
    assert_eq!(created.status.name(), "Новый");
    assert_eq!(created.created, NOW);
    assert!(created.id.starts_with("ORD"));
}

#[tokio::test]
async fn create_trims_input_fields() {
    let (store, _) = setup();
    let created = store
        .create(NewOrder {
            name: "  Ann ".into(),
            email: " a@x.com".into(),
            phone: " +380 ".into(),
            service_id: "s2".into(),
            notes: "  call first  ".into(),
        })
        .await
        .expect("create");
    assert_eq!(created.name, "Ann");
    assert_eq!(created.phone, "+380");
    assert_eq!(created.notes, "call first");
    assert_eq!(created.service_title, "Верстка сайта");
}

#[tokio::test]
async fn create_rejects_blank_required_fields_without_writing() {
    let (store, blobs) = setup();
    for fields in [
        NewOrder { name: "   ".into(), ..ann() },
        NewOrder { email: String::new(), ..ann() },
        NewOrder { service_id: String::new(), ..ann() },
    ] {
        let err = store.create(fields).await.expect_err("should fail");
        assert!(matches!(err, OrderError::Validation(ref m) if m == REQUIRED_FIELDS_MESSAGE));
    }
    assert_eq!(blobs.get(DEFAULT_STORAGE_KEY).await.expect("get"), None);
}

#[tokio::test]
async fn unknown_service_gets_placeholder_title() {
    let (store, _) = setup();
    let created = store
        .create(NewOrder { service_id: "s42".into(), ..ann() })
        .await
        .expect("create");
    assert_eq!(created.service_id, "s42");
    assert_eq!(created.service_title, "Не указано");
}

#[tokio::test]
async fn ids_stay_unique_when_clock_stands_still() {
    let (store, _) = setup();
    for _ in 0..200 {
        store.create(ann()).await.expect("create");
    }
    let orders = store.load().await.expect("load");
    let ids: HashSet<_> = orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids.len(), 200);
}

#[tokio::test]
async fn toggle_cycles_through_all_states_and_wraps() {
    let (store, _) = setup();
    let order = store.create(ann()).await.expect("create");

    let first = store.toggle_status(&order.id).await.expect("toggle").expect("found");
    assert_eq!(first.status.name(), "В обработке");
    let second = store.toggle_status(&order.id).await.expect("toggle").expect("found");
    assert_eq!(second.status.name(), "Выполнен");
    let third = store.toggle_status(&order.id).await.expect("toggle").expect("found");
    assert_eq!(third.status.name(), "Новый");

    let stored = store.load().await.expect("load");
    assert_eq!(stored[0].status, OrderStatus::New);
}

#[tokio::test]
async fn toggle_unknown_id_leaves_blob_untouched() {
    let (store, blobs) = setup();
    blobs.set(DEFAULT_STORAGE_KEY, "garbage").await.expect("seed");

    assert_eq!(store.toggle_status("ORDnope").await.expect("toggle"), None);
    assert_eq!(
        blobs.get(DEFAULT_STORAGE_KEY).await.expect("get").as_deref(),
        Some("garbage")
    );
}

#[tokio::test]
async fn delete_removes_only_matching_order() {
    let (store, _) = setup();
    let keep = store.create(ann()).await.expect("create");
    let drop_me = store.create(ann()).await.expect("create");

    let outcome = store.delete(&drop_me.id, &accept).await.expect("delete");
    assert_eq!(outcome, DeleteOutcome::Deleted);

    let orders = store.load().await.expect("load");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, keep.id);
}

#[tokio::test]
async fn delete_of_missing_id_keeps_length() {
    let (store, _) = setup();
    store.create(ann()).await.expect("create");

    let outcome = store.delete("ORDmissing", &accept).await.expect("delete");
    assert_eq!(outcome, DeleteOutcome::NotFound);
    assert_eq!(store.load().await.expect("load").len(), 1);
}

#[tokio::test]
async fn declined_delete_does_not_mutate() {
    let (store, _) = setup();
    let order = store.create(ann()).await.expect("create");

    let asked = std::cell::Cell::new(None);
    let record_prompt = |prompt: &str| {
        asked.set(Some(prompt.to_string()));
        decline(prompt)
    };
    let outcome = store.delete(&order.id, &record_prompt).await.expect("delete");

    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(asked.take().as_deref(), Some(DELETE_PROMPT));
    assert_eq!(store.load().await.expect("load").len(), 1);
}

#[tokio::test]
async fn load_repairs_records_missing_status() {
    let (store, blobs) = setup();
    blobs
        .set(
            DEFAULT_STORAGE_KEY,
            r#"[{"id":"ORD1","name":"Ann","email":"a@x.com","created":5}]"#,
        )
        .await
        .expect("seed");

    let orders = store.load().await.expect("load");
    assert_eq!(orders[0].status, OrderStatus::New);
    assert_eq!(orders[0].status.class(), "new");
    assert_eq!(orders[0].created, 5);
}

#[tokio::test]
async fn save_writes_status_class_alongside_status() {
    let (store, blobs) = setup();
    let order = store.create(ann()).await.expect("create");
    store.toggle_status(&order.id).await.expect("toggle");

    let raw = blobs
        .get(DEFAULT_STORAGE_KEY)
        .await
        .expect("get")
        .expect("blob");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(value[0]["status"], "В обработке");
    assert_eq!(value[0]["statusClass"], "processing");
    assert_eq!(value[0]["serviceTitle"], "Дизайн логотипа");
}

#[tokio::test]
async fn missing_status_ignores_stale_status_class() {
    let (store, blobs) = setup();
    blobs
        .set(
            DEFAULT_STORAGE_KEY,
            r#"[{"id":"ORD1","name":"Ann","statusClass":"processing","created":5}]"#,
        )
        .await
        .expect("seed");

    let orders = store.load().await.expect("load");
    assert_eq!(orders[0].status, OrderStatus::New);

    let toggled = store.toggle_status("ORD1").await.expect("toggle").expect("found");
    assert_eq!(toggled.status, OrderStatus::Processing);
}

#[tokio::test]
async fn seeded_states_cycle_back_after_three_toggles() {
    let (store, blobs) = setup();
    blobs
        .set(
            DEFAULT_STORAGE_KEY,
            r#"[
                {"id":"ORD1","name":"Ann","status":"В обработке","statusClass":"processing","created":5},
                {"id":"ORD2","name":"Bob","status":"Выполнен","statusClass":"done","created":6}
            ]"#,
        )
        .await
        .expect("seed");

    let first = store.toggle_status("ORD1").await.expect("toggle").expect("found");
    assert_eq!(first.status, OrderStatus::Done);
    let first = store.toggle_status("ORD2").await.expect("toggle").expect("found");
    assert_eq!(first.status, OrderStatus::New);

    for id in ["ORD1", "ORD2"] {
        for _ in 0..2 {
            store.toggle_status(id).await.expect("toggle").expect("found");
        }
    }

    let orders = store.load().await.expect("load");
    assert_eq!(orders[0].status, OrderStatus::Processing);
    assert_eq!(orders[1].status, OrderStatus::Done);
}

#[tokio::test]
async fn unrecognized_status_restarts_on_toggle_and_survives_other_saves() {
    let (store, blobs) = setup();
    blobs
        .set(
            DEFAULT_STORAGE_KEY,
            r#"[
                {"id":"ORD1","name":"Ann","status":"Archived","statusClass":"archived","created":5},
                {"id":"ORD2","name":"Bob","status":"Archived","statusClass":"archived","created":6}
            ]"#,
        )
        .await
        .expect("seed");

    let toggled = store.toggle_status("ORD1").await.expect("toggle").expect("found");
    assert_eq!(toggled.status, OrderStatus::New);
    store.create(ann()).await.expect("create");

    let raw = blobs
        .get(DEFAULT_STORAGE_KEY)
        .await
        .expect("get")
        .expect("blob");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(value[0]["status"], "Новый");
    assert_eq!(value[0]["statusClass"], "new");
    assert_eq!(value[1]["status"], "Archived");
    assert_eq!(value[1]["statusClass"], "archived");
    assert_eq!(value.as_array().map(Vec::len), Some(3));
}
