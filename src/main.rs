use axum::{
    http::{header, StatusCode},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use atrium_api::config;
use atrium_api::database::manager::DatabaseManager;
use atrium_api::error::ApiError;
use atrium_api::handlers::{protected, public};
use atrium_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, secrets, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Atrium API in {:?} mode", config.environment);

    // Apply schema migrations; a missing database is survivable so routing
    // and integration endpoints stay up for diagnosis.
    if let Err(e) = DatabaseManager::run_migrations().await {
        tracing::warn!("Skipping migrations: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("ATRIUM_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8063);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Atrium API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/app", get(app_redirect))
        .route("/auth/login", post(public::auth::login))
        .route("/saml/metadata", get(public::saml::metadata))
        .route("/livestream", get(public::livestream::events))
        // Protected API
        .merge(protected_routes())
        // Unmatched routes return 404 regardless of authentication state
        .fallback(not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn protected_routes() -> Router {
    Router::new()
        .route(
            "/api/posts",
            get(protected::posts::list).post(protected::posts::create),
        )
        .route("/api/posts/:id", axum::routing::put(protected::posts::update))
        .route("/api/editor/token", get(protected::editor::token))
        .route("/api/auth/whoami", get(protected::auth::whoami))
        .route(
            "/api/auth/hijack",
            post(protected::auth::hijack).delete(protected::auth::release),
        )
        .layer(axum_middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Atrium API",
            "version": version,
            "description": "Learning resources catalog and discussion platform API",
            "endpoints": {
                "home": "/ (public)",
                "login": "/auth/login (public - token acquisition)",
                "app": "/app (public - redirects to the web application)",
                "saml": "/saml/metadata (public, feature-flagged)",
                "livestream": "/livestream (public, feature-flagged)",
                "posts": "/api/posts (protected, staff only)",
                "editor": "/api/editor/token (protected, feature-flagged)",
                "auth": "/api/auth/* (protected - session management)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

/// The app shell lives on another origin; send browsers there with a 302.
async fn app_redirect() -> impl IntoResponse {
    (
        StatusCode::FOUND,
        [(header::LOCATION, config::config().app.base_url.clone())],
    )
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
