pub mod handlers;
pub mod page;
pub mod types;

use crate::{
    Result,
    config::Config,
    credential::{CredentialStore, LocalStorage},
    divination::Diviner,
    gemini::GeminiClient,
    notify::NoticeQueue,
};
use axum::{
    Router,
    routing::{get, post, put},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/session", get(handlers::session))
        .route("/divine", post(handlers::divine))
        .route("/credential", put(handlers::save_credential));

    Router::new()
        .route("/", get(handlers::index))
        .route("/divine", post(handlers::divine_form))
        .route(
            "/credential",
            get(handlers::open_credential_form).post(handlers::save_credential_form),
        )
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    let storage_path =
        std::env::var("STORAGE_PATH").unwrap_or_else(|_| config.server.storage_path.clone());
    let storage = LocalStorage::new(&storage_path).await?;
    let credentials = CredentialStore::new(Arc::new(storage));

    if credentials.load().await.is_some() {
        info!("Loaded stored API key");
    } else {
        info!("No API key stored yet");
    }

    let notices = NoticeQueue::new();
    let diviner = Diviner::new(
        &config.gemini,
        Arc::new(GeminiClient::new(&config.gemini)),
        credentials,
        Arc::new(notices.clone()),
    );

    Ok(AppState::new(Arc::new(diviner), notices))
}

pub async fn run(config: Config) -> Result<()> {
    let app = router(build_state(&config).await?);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
