//! Barber booking relay server.
//!
//! Accepts bookings from the shop website and the Zalo chat bot, stores them
//! in Google Sheets and lets the admin manage them from Telegram.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use relay::{
    spawn_rollover_loop, AdminNotifier, ConversationEngine, InMemorySessionStore, Relay,
    RolloverSchedule, TaskQueue, TelegramSender, ZaloSender,
};
use sheet_store::{BookingSource, GoogleSheets, SheetStore, StoreConfig};
use telegram_client::TelegramClient;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zalo_client::ZaloClient;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let clock = config.clock();
    info!(
        addr = %config.addr,
        utc_offset = %clock.offset(),
        admin_chat_id = config.admin_chat_id,
        "Starting booking server"
    );

    // Storage and chat clients
    let backend = GoogleSheets::new(config.sheets.clone())?;
    let store = SheetStore::new(Arc::new(backend), clock, StoreConfig::default());
    let telegram = TelegramClient::new(config.telegram.clone())?;
    let zalo = ZaloClient::new(config.zalo.clone())?;

    let notifier = AdminNotifier::new(
        Arc::new(TelegramSender::new(telegram)),
        store.clone(),
        config.admin_chat_id,
    );
    let relay = Arc::new(Relay::new(
        store,
        notifier,
        Arc::new(InMemorySessionStore::new()),
        Arc::new(ZaloSender::new(zalo)),
        ConversationEngine::new(clock, BookingSource::Zalo),
    ));

    // Background work
    let (queue, worker) = TaskQueue::start(config.queue_capacity);
    let last_rollover = Arc::new(Mutex::new(None));
    let rollover = spawn_rollover_loop(
        relay.clone(),
        RolloverSchedule::default(),
        last_rollover.clone(),
    );

    let state = AppState::new(relay, queue, config.zalo.clone(), last_rollover);
    let app = routes::router(state);

    info!(addr = %config.addr, "Booking server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    rollover.abort();
    worker.abort();
    Ok(())
}
