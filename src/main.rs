mod models;
mod handlers;
mod routes;
mod docs;
mod config;
mod clients;
mod services;
mod utils;
#[cfg(test)]
mod test_support;

use axum::{http::HeaderValue, Router};
use std::panic;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use clients::{build_http_client, HttpApiEntry, HttpEditStatusClient, HttpKnowledgeServer};
use config::Config;
use docs::ApiDoc;
use models::UserInfo;
use routes::api::{create_api_routes, AppState};
use services::{
    CheckerSettings, EditStatusNotifier, MemoryDocumentStore, NotifierSettings, ServerRouter,
    Session, StatusChecker,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {

    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Load configuration before tracing so the filter can use it
    let loaded = Config::load();
    let fallback_filter = match &loaded {
        Ok(config) => config.log_filter(),
        Err(_) => Config::default().log_filter(),
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter.into()))
        .init();

    info!("Starting edit-status agent...");

    let config = loaded.unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });
    if config.is_development() {
        debug!("Edit-status service at {}", config.edit_status_url);
    }
    if config.auth_token.is_empty() {
        warn!("No auth token configured - waiting for a session update");
    }

    let http = match build_http_client(config.http_timeout()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let session = Arc::new(Session::new(UserInfo {
        token: config.auth_token.clone(),
        kb_guid: config.user_kb_guid.clone(),
        database_server: config.user_database_server.clone(),
    }));
    let store = Arc::new(MemoryDocumentStore::new());
    let edit_status = Arc::new(HttpEditStatusClient::new(
        http.clone(),
        config.edit_status_url.clone(),
    ));

    // Background notifier
    let notifier = EditStatusNotifier::new(
        edit_status.clone(),
        session.clone(),
        NotifierSettings {
            heartbeat_interval: config.heartbeat_interval(),
            queue_capacity: config.event_queue_capacity,
        },
    );
    notifier.start();

    let router = ServerRouter::new(
        store.clone(),
        session.clone(),
        Arc::new(HttpApiEntry::new(http.clone(), config.api_entry_url.clone())),
        config.route_cache_ttl(),
    );
    let checker = StatusChecker::new(
        store.clone(),
        Arc::new(HttpKnowledgeServer::new(http)),
        edit_status,
        router,
        CheckerSettings {
            check_timeout: config.check_timeout(),
            event_capacity: config.event_broadcast_capacity,
        },
    );

    let api_routes = create_api_routes(AppState {
        notifier: notifier.clone(),
        checker,
        store,
        session,
    });

    let mut app_routes = Router::new()
        // Mount API routes
        .nest("/api", api_routes)
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add tracing layer
        .layer(TraceLayer::new_for_http());

    let origins: Vec<HeaderValue> = config
        .cors_origin_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    if !origins.is_empty() {
        app_routes = app_routes.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", config.server_address()));

    info!("🚀 Edit-status agent running on http://{}", config.server_address());
    info!("📚 Swagger UI available at http://{}/swagger", config.server_address());

    if let Err(e) = axum::serve(listener, app_routes)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    info!("Stopping edit-status notifier...");
    notifier.wait_for_done().await;
    info!("Edit-status agent stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
