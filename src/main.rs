use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use closet_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, MemoryStore, PostgresStore, WardrobeStore},
    middleware::{REQUEST_ID_HEADER, USER_ID_HEADER},
    services::{StylingEngine, UploadStorage},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("closet_api=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn WardrobeStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = create_pool(url).await?;
            tracing::info!("Connected to PostgreSQL");
            Arc::new(PostgresStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, wardrobe data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {}", config.upload_dir))?;

    let state = AppState::new(
        store,
        StylingEngine::default(),
        UploadStorage::new(&config.upload_dir, config.max_upload_size),
    )
    .with_outfit_limit(config.outfit_limit);

    let origins = config
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_credentials(true);

    let app = create_router(state).layer(cors);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server running on http://{}", address);

    axum::serve(listener, app).await?;
    Ok(())
}
