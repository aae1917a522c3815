use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use payroll_engine::api::{create_router, AppState};
use payroll_engine::config::ConfigLoader;
use payroll_engine::notification::{ChannelEventBus, NotificationDispatcher, TracingMessageSender};
use payroll_engine::payroll::DeductionService;
use payroll_engine::store::InMemoryStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ConfigLoader::from_env()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(
        institution = %config.institution().name,
        deductions = config.deduction_seeds().len(),
        "Configuration loaded"
    );

    let store = Arc::new(InMemoryStore::new());
    DeductionService::new(store.clone())
        .seed(config.deduction_seeds())
        .await
        .inspect_err(|e| error!("Failed to seed deduction rates: {}", e))?;

    let (events, receiver) = ChannelEventBus::new();
    let dispatcher = NotificationDispatcher::new(
        store.clone(),
        store.clone(),
        Arc::new(TracingMessageSender::new(config.from_email())),
        store.clone(),
        config.institution().name.clone(),
    );
    let worker = dispatcher.spawn(receiver);

    let router = create_router(AppState::from_store(store, Arc::new(events)));
    let listener = tokio::net::TcpListener::bind(&config.server().bind_address).await?;
    info!(address = %config.server().bind_address, "Payroll engine listening");

    axum::serve(listener, router).await?;

    // The router owned the last event sender; the worker drains and exits.
    worker.await?;
    Ok(())
}
