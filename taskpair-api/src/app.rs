/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with
/// all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskpair_api::{app::AppState, config::Config};
/// use taskpair_shared::notify::NotificationGateway;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config, NotificationGateway::new());
/// let app = taskpair_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskpair_shared::{
    auth::middleware::create_jwt_middleware,
    collab::CollabService,
    notify::NotificationGateway,
    tasks::TaskService,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; all
/// members are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// WebSocket session registry
    pub notifier: NotificationGateway,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, notifier: NotificationGateway) -> Self {
        Self {
            db,
            config: Arc::new(config),
            notifier,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Task business logic bound to this state's pool
    pub fn tasks(&self) -> TaskService {
        TaskService::new(self.db.clone())
    }

    /// Collaboration logic bound to this state's pool and gateway
    pub fn collab(&self) -> CollabService {
        CollabService::new(self.db.clone(), self.notifier.clone())
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                   # Health check (public)
/// └── /v1/                      # API v1 (versioned)
///     ├── /auth/                # Authentication (public)
///     │   ├── POST /register
///     │   └── POST /login
///     ├── /tasks/               # Task CRUD + collaboration (JWT)
///     │   ├── POST   /
///     │   ├── GET    /
///     │   ├── GET    /:id
///     │   ├── PATCH  /:id
///     │   ├── DELETE /:id
///     │   ├── PATCH  /:id/toggle
///     │   ├── POST   /:id/invite
///     │   └── DELETE /:id/invite
///     └── GET /ws               # Notification WebSocket (JWT at handshake)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. JWT authentication (task routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Task routes (require JWT authentication)
    let task_routes = Router::new()
        .route(
            "/",
            post(routes::tasks::create_task::create_task)
                .get(routes::tasks::list_tasks::list_tasks),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task::get_task)
                .patch(routes::tasks::update_task::update_task)
                .delete(routes::tasks::delete_task::delete_task),
        )
        .route(
            "/:id/toggle",
            patch(routes::tasks::toggle_completion::toggle_completion),
        )
        .route(
            "/:id/invite",
            post(routes::tasks::invite_user::invite_user)
                .delete(routes::tasks::uninvite_user::uninvite_user),
        )
        .layer(axum::middleware::from_fn(create_jwt_middleware(
            // Owned copy: the layer must outlive this borrow of `state`
            state.jwt_secret().to_string(),
        )));

    // The WebSocket route authenticates during the handshake itself so
    // browser clients can pass the token as a query parameter
    let ws_routes = Router::new().route("/ws", get(routes::ws::ws_handler));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes)
        .merge(ws_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
