//! End-to-end flows through the relay with in-memory backends.

use std::sync::Arc;

use async_trait::async_trait;
use relay::{
    AdminNotifier, BookingForm, CallbackAction, ConversationEngine, InMemorySessionStore,
    RecordingSender, Relay, RelayError, SentItem, SessionStore, Step, TaskQueue,
};
use serde_json::json;
use sheet_store::{
    col, BookingSource, BookingStatus, MemorySheet, NewBooking, SheetBackend, SheetStore,
    ShopClock, StoreConfig, StoreError,
};
use telegram_client::Update;
use zalo_client::ZaloUpdate;

const ADMIN_CHAT: i64 = -100555;

/// Backend whose every call fails, as when the Sheets API is unreachable.
struct BrokenSheet;

#[async_trait]
impl SheetBackend for BrokenSheet {
    async fn read_all(&self) -> sheet_store::Result<Vec<Vec<String>>> {
        Err(StoreError::Api {
            status: 503,
            body: "unavailable".to_string(),
        })
    }

    async fn write_row(&self, _row: usize, _values: Vec<String>) -> sheet_store::Result<()> {
        Err(StoreError::Api {
            status: 503,
            body: "unavailable".to_string(),
        })
    }

    async fn update_cell(&self, _row: usize, _column: usize, _value: &str) -> sheet_store::Result<()> {
        Err(StoreError::Api {
            status: 503,
            body: "unavailable".to_string(),
        })
    }

    async fn delete_rows(&self, _start: usize, _end: usize) -> sheet_store::Result<()> {
        Err(StoreError::Api {
            status: 503,
            body: "unavailable".to_string(),
        })
    }

    fn name(&self) -> &str {
        "broken"
    }
}

struct Harness {
    relay: Relay,
    sheet: Arc<MemorySheet>,
    admin: RecordingSender,
    customers: RecordingSender,
    sessions: Arc<InMemorySessionStore>,
}

fn build(backend: Arc<dyn SheetBackend>) -> (Relay, RecordingSender, RecordingSender, Arc<InMemorySessionStore>) {
    let store = SheetStore::new(backend, ShopClock::default(), StoreConfig::default());
    let admin = RecordingSender::new();
    let customers = RecordingSender::new();
    let sessions = Arc::new(InMemorySessionStore::new());
    let notifier = AdminNotifier::new(Arc::new(admin.clone()), store.clone(), ADMIN_CHAT);
    let relay = Relay::new(
        store,
        notifier,
        sessions.clone(),
        Arc::new(customers.clone()),
        ConversationEngine::new(ShopClock::default(), BookingSource::Zalo),
    );
    (relay, admin, customers, sessions)
}

fn harness() -> Harness {
    let sheet = Arc::new(MemorySheet::new());
    let (relay, admin, customers, sessions) = build(sheet.clone());
    Harness {
        relay,
        sheet,
        admin,
        customers,
        sessions,
    }
}

fn website_booking() -> NewBooking {
    NewBooking {
        fullname: "Nguyễn Văn A".to_string(),
        phone: "0901234567".to_string(),
        service: "Combo VIP - 350K".to_string(),
        date: "2026-02-20".to_string(),
        time: "14:00".to_string(),
        ..Default::default()
    }
}

fn zalo_text(chat_id: &str, text: &str) -> ZaloUpdate {
    serde_json::from_value(json!({
        "ok": true,
        "result": {
            "event_name": "message.text.received",
            "message": {
                "chat": {"id": chat_id},
                "from": {"id": "u1", "display_name": "Lan"},
                "text": text
            }
        }
    }))
    .unwrap()
}

fn last_reply(items: &[SentItem]) -> String {
    items
        .iter()
        .rev()
        .find_map(|item| match item {
            SentItem::Reply { text, .. } => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_website_booking_scenario() {
    let h = harness();
    let form: BookingForm = serde_json::from_value(json!({
        "fullname": "Nguyễn Văn A",
        "phone": "0901234567",
        "service": "Combo VIP - 350K",
        "date": "2026-02-20",
        "time": "14:00"
    }))
    .unwrap();

    let added = h
        .relay
        .submit_booking(&form.into_booking().unwrap())
        .await
        .unwrap();
    assert_eq!(added.id, "DUC01");
    assert_eq!(added.date, "20/02/2026");

    let rows = h.sheet.snapshot().await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][col::ID], "DUC01");
    assert_eq!(rows[1][col::DATE], "20/02/2026");
    assert_eq!(rows[1][col::STATUS], BookingStatus::Pending.label());

    let sent = h.admin.sent().await;
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        SentItem::Buttons { chat_id, text, buttons } => {
            assert_eq!(*chat_id, ADMIN_CHAT);
            assert!(text.contains("DUC01"));
            assert!(text.contains("Website"));
            assert_eq!(buttons.len(), 1);
            assert_eq!(buttons[0].len(), 2);
        }
        other => panic!("unexpected item: {:?}", other),
    }
}

#[tokio::test]
async fn test_store_failure_still_alerts_admin() {
    let (relay, admin, _, _) = build(Arc::new(BrokenSheet));

    let result = relay.submit_booking(&website_booking()).await;
    assert!(matches!(result, Err(RelayError::Store(_))));

    let sent = admin.sent().await;
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        // No row to confirm, so no buttons.
        SentItem::Message { chat_id, text } => {
            assert_eq!(*chat_id, ADMIN_CHAT);
            assert!(text.contains("ERR"));
            assert!(text.contains("20/02/2026"));
        }
        other => panic!("unexpected item: {:?}", other),
    }
}

#[tokio::test]
async fn test_zalo_guided_flow_stores_booking() {
    let h = harness();
    for text in ["đặt lịch", "4", "Trần Thị Lan", "0912345678", "2", "1", "0"] {
        h.relay.handle_zalo_update(&zalo_text("z-1", text)).await;
    }
    let session = h.sessions.get("z-1").await.unwrap();
    assert_eq!(session.step, Step::Confirm);

    h.relay.handle_zalo_update(&zalo_text("z-1", "1")).await;

    assert!(h.sessions.get("z-1").await.is_none());
    let rows = h.sheet.snapshot().await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][col::ID], "DUC01");
    assert_eq!(rows[1][col::NAME], "Trần Thị Lan");
    assert_eq!(rows[1][col::PHONE], "0912345678");
    assert_eq!(rows[1][col::TIME], "09:00");

    let reply = last_reply(&h.customers.sent().await);
    assert!(reply.contains("Đặt lịch thành công"));
    assert!(reply.contains("DUC01"));

    let alerts = h.admin.sent().await;
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].text().unwrap().contains("Zalo"));
}

#[tokio::test]
async fn test_invalid_phone_keeps_step() {
    let h = harness();
    for text in ["đặt lịch", "1", "Minh", "12345"] {
        h.relay.handle_chat_message("z-2", text, "Minh").await;
    }
    let session = h.sessions.get("z-2").await.unwrap();
    assert_eq!(session.step, Step::EnterPhone);
    assert!(last_reply(&h.customers.sent().await).contains("không hợp lệ"));
}

#[tokio::test]
async fn test_failed_submit_keeps_session_at_confirm() {
    let (relay, admin, customers, sessions) = build(Arc::new(BrokenSheet));
    for text in ["đặt lịch", "1", "Minh", "0912345678", "1", "2", "0", "1"] {
        relay.handle_chat_message("z-3", text, "Minh").await;
    }

    let session = sessions.get("z-3").await.unwrap();
    assert_eq!(session.step, Step::Confirm);
    assert_eq!(
        last_reply(&customers.sent().await),
        relay::conversation::SUBMIT_FAILED
    );
    let alerts = admin.sent().await;
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].text().unwrap().contains("ERR"));
}

#[tokio::test]
async fn test_template_message_books_in_one_shot() {
    let h = harness();
    let text = "DATLICH\nTên: Hoàng\nSĐT: 0987654321\nDịch vụ: 1\nNgày: 21/02/2026\nGiờ: 18:00";
    h.relay.handle_chat_message("z-4", text, "Hoàng").await;

    let rows = h.sheet.snapshot().await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][col::NAME], "Hoàng");
    assert!(last_reply(&h.customers.sent().await).contains("DUC01"));
}

#[tokio::test]
async fn test_telegram_confirm_callback_updates_row() {
    let h = harness();
    h.relay.submit_booking(&website_booking()).await.unwrap();
    h.admin.clear().await;

    let update: Update = serde_json::from_value(json!({
        "update_id": 10,
        "callback_query": {
            "id": "cb-1",
            "from": {"id": 1, "first_name": "Boss"},
            "message": {
                "message_id": 77,
                "chat": {"id": ADMIN_CHAT},
                "text": "NEW BOOKING DUC01"
            },
            "data": CallbackAction::Confirm.tag("DUC01")
        }
    }))
    .unwrap();
    h.relay.handle_telegram_update(&update).await;

    let rows = h.sheet.snapshot().await;
    assert_eq!(rows[1][col::STATUS], BookingStatus::Confirmed.label());

    let sent = h.admin.sent().await;
    assert!(matches!(&sent[0], SentItem::CallbackAck { callback_id, .. } if callback_id == "cb-1"));
    assert!(matches!(&sent[1], SentItem::Edit { message_id: 77, buttons: Some(_), .. }));

    // A second confirm is not a valid transition.
    h.admin.clear().await;
    h.relay.handle_telegram_update(&update).await;
    let sent = h.admin.sent().await;
    assert!(sent
        .iter()
        .any(|item| matches!(item, SentItem::Message { chat_id: ADMIN_CHAT, .. })));
    assert_eq!(
        h.sheet.snapshot().await[1][col::STATUS],
        BookingStatus::Confirmed.label()
    );
}

#[tokio::test]
async fn test_telegram_command_from_stranger_is_ignored() {
    let h = harness();
    let update: Update = serde_json::from_value(json!({
        "update_id": 11,
        "message": {
            "message_id": 5,
            "chat": {"id": 42},
            "text": "/stats"
        }
    }))
    .unwrap();
    h.relay.handle_telegram_update(&update).await;
    assert!(h.admin.sent().await.is_empty());

    let update: Update = serde_json::from_value(json!({
        "update_id": 12,
        "message": {
            "message_id": 6,
            "chat": {"id": ADMIN_CHAT},
            "text": "/stats"
        }
    }))
    .unwrap();
    h.relay.handle_telegram_update(&update).await;
    let sent = h.admin.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(matches!(&sent[0], SentItem::Message { chat_id: ADMIN_CHAT, .. }));
}

#[tokio::test]
async fn test_rollover_reports_then_clears() {
    let h = harness();
    let store = h.relay.store();
    for i in 0..6 {
        let booking = NewBooking {
            fullname: format!("Khách {}", i),
            ..website_booking()
        };
        store.add_booking(&booking).await.unwrap();
    }
    for id in ["DUC01", "DUC02", "DUC03"] {
        store
            .update_status(id, BookingStatus::Confirmed)
            .await
            .unwrap()
            .unwrap();
    }
    store
        .update_status("DUC03", BookingStatus::Completed)
        .await
        .unwrap()
        .unwrap();
    h.admin.clear().await;

    let report = h.relay.rollover().await;
    assert!(report.summary_sent);
    assert_eq!(report.cleared, Some(6));

    let sent = h.admin.sent().await;
    assert_eq!(sent.len(), 1);
    let text = sent[0].text().unwrap();
    assert!(text.contains("Tổng: <b>6</b>"));
    assert!(text.contains("Hoàn thành: <b>1</b>"));
    assert!(text.contains("Xác nhận: <b>2</b>"));
    assert!(text.contains("Chờ: <b>3</b>"));

    let rows = h.sheet.snapshot().await;
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_queue_serializes_chat_messages() {
    let h = harness();
    let relay = Arc::new(h.relay.clone());
    let (queue, _worker) = TaskQueue::start(16);

    for text in ["đặt lịch", "2", "Phúc", "0901111222"] {
        let relay = relay.clone();
        let text = text.to_string();
        queue
            .submit("zalo_update", async move {
                relay.handle_chat_message("z-5", &text, "Phúc").await;
                Ok(())
            })
            .unwrap();
    }
    queue.flush().await.unwrap();

    let session = h.sessions.get("z-5").await.unwrap();
    assert_eq!(session.step, Step::EnterDate);
    assert_eq!(session.draft.phone.as_deref(), Some("0901111222"));
    assert_eq!(queue.stats().completed, 4);
}
