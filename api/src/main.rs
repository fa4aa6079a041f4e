use std::sync::Arc;

use actix_web::{web, HttpServer};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

use pv_api::{create_app, telemetry, AppState};
use pv_core::repositories::{InMemoryBackend, KeyValueBackend};
use pv_core::services::{RandomCodeGenerator, VerificationStore, VerificationStoreConfig};
use pv_infra::RedisClient;
use pv_shared::config::{AppConfig, BackendKind};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.logging)?;

    info!(
        environment = %config.environment,
        backend = ?config.backend,
        "Starting phone verification API"
    );

    match config.backend {
        BackendKind::Redis => {
            let client = RedisClient::new(config.cache.clone()).await?;
            if !client.health_check().await? {
                warn!("Redis answered PING unexpectedly; continuing");
            }
            serve(Arc::new(client), &config).await
        }
        BackendKind::Memory => {
            warn!("Using the in-memory backend; verification state is lost on restart");
            serve(Arc::new(InMemoryBackend::new()), &config).await
        }
    }
}

async fn serve<B: KeyValueBackend + 'static>(
    backend: Arc<B>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let store = VerificationStore::new(
        backend,
        RandomCodeGenerator::new(),
        VerificationStoreConfig::from(&config.verification),
    );
    let state = web::Data::new(AppState::new(store));
    let max_payload_size = config.server.max_payload_size;

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        create_app(state.clone(), max_payload_size).wrap(TracingLogger::default())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;
    Ok(())
}
