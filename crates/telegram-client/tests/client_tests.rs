//! Wire-level tests for telegram-client against a mock Bot API.

use serde_json::json;
use telegram_client::{
    BotCommand, InlineKeyboardButton, InlineKeyboardMarkup, ReplyKeyboardMarkup,
    SendMessageParams, TelegramClient, TelegramConfig, TelegramError, Update,
};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> TelegramClient {
    let config = TelegramConfig::new("TEST:TOKEN").with_api_base(server.uri());
    TelegramClient::new(config).unwrap()
}

mod config_tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let config = TelegramConfig::new("123:abc");
        assert_eq!(
            config.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = TelegramConfig::new("123:very-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("very-secret"));
    }
}

mod serde_tests {
    use super::*;

    #[test]
    fn test_inline_keyboard_serialization() {
        let params = SendMessageParams::html(42, "hi").with_markup(InlineKeyboardMarkup {
            inline_keyboard: vec![vec![
                InlineKeyboardButton::callback("✅ Xác nhận", "confirm_DUC01"),
                InlineKeyboardButton::url("🌐 Website", "https://barber.example/booking"),
            ]],
        });
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["parse_mode"], "HTML");
        assert_eq!(
            value["reply_markup"]["inline_keyboard"][0][0]["callback_data"],
            "confirm_DUC01"
        );
        assert!(value["reply_markup"]["inline_keyboard"][0][0].get("url").is_none());
        assert_eq!(
            value["reply_markup"]["inline_keyboard"][0][1]["url"],
            "https://barber.example/booking"
        );
    }

    #[test]
    fn test_reply_keyboard_serialization() {
        let keyboard = ReplyKeyboardMarkup::from_rows(&[&["📅 Hôm nay", "📅 Ngày mai"]]);
        let value = serde_json::to_value(SendMessageParams::html(1, "x").with_markup(keyboard))
            .unwrap();
        assert_eq!(value["reply_markup"]["keyboard"][0][1]["text"], "📅 Ngày mai");
        assert_eq!(value["reply_markup"]["resize_keyboard"], true);
        assert_eq!(value["reply_markup"]["is_persistent"], true);
    }

    #[test]
    fn test_parse_callback_update() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 10,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 7, "first_name": "Admin"},
                "data": "confirm_DUC01",
                "message": {
                    "message_id": 55,
                    "chat": {"id": -100},
                    "text": "LỊCH HẸN MỚI"
                }
            }
        }))
        .unwrap();

        let callback = update.callback_query.unwrap();
        assert_eq!(callback.data.as_deref(), Some("confirm_DUC01"));
        let message = callback.message.unwrap();
        assert_eq!(message.chat.id, -100);
        assert_eq!(message.message_id, 55);
        assert!(update.message.is_none());
    }

    #[test]
    fn test_parse_text_update() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 11,
            "message": {
                "message_id": 3,
                "chat": {"id": 99, "type": "private"},
                "from": {"id": 99, "first_name": "Admin", "is_bot": false},
                "text": "  /today "
            }
        }))
        .unwrap();

        let message = update.message.unwrap();
        assert_eq!(message.text(), Some("/today"));
    }
}

mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST:TOKEN/sendMessage"))
            .and(body_partial_json(json!({
                "chat_id": 42,
                "text": "xin chào",
                "parse_mode": "HTML"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"message_id": 77, "chat": {"id": 42}, "date": 0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let sent = client
            .send_message(&SendMessageParams::html(42, "xin chào"))
            .await
            .unwrap();
        assert_eq!(sent.message_id, 77);
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST:TOKEN/sendMessage"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.send_message(&SendMessageParams::html(1, "x")).await;
        match result {
            Err(TelegramError::Api { code, description }) => {
                assert_eq!(code, 400);
                assert!(description.contains("chat not found"));
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_answer_callback_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST:TOKEN/answerCallbackQuery"))
            .and(body_json(json!({
                "callback_query_id": "cb-1",
                "text": "✅ Đã xác nhận!"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client
            .answer_callback_query("cb-1", "✅ Đã xác nhận!")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_edit_message_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST:TOKEN/editMessageText"))
            .and(body_partial_json(json!({
                "chat_id": 5,
                "message_id": 9,
                "reply_markup": {
                    "inline_keyboard": [[{"text": "✂️ Hoàn thành", "callback_data": "complete_DUC01"}]]
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"message_id": 9}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let markup = InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton::callback(
                "✂️ Hoàn thành",
                "complete_DUC01",
            )]],
        };
        client
            .edit_message_text(5, 9, "updated", Some(markup))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_set_my_commands() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST:TOKEN/setMyCommands"))
            .and(body_json(json!({
                "commands": [{"command": "today", "description": "📅 Lịch hôm nay"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client
            .set_my_commands(&[BotCommand::new("today", "📅 Lịch hôm nay")])
            .await
            .unwrap();
    }
}
