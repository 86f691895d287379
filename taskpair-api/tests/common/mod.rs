/// Common test utilities for integration tests
///
/// Shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user creation and JWT generation
/// - Request/response helpers
///
/// These tests need a running PostgreSQL reachable via `DATABASE_URL`
/// (plus `JWT_SECRET`); they are marked `#[ignore]` and run with
/// `cargo test -- --ignored`.

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use sqlx::PgPool;
use taskpair_api::app::{build_router, AppState};
use taskpair_api::config::Config;
use taskpair_shared::auth::jwt::{create_token, Claims};
use taskpair_shared::models::user::{CreateUser, User};
use taskpair_shared::notify::NotificationGateway;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub notifier: NotificationGateway,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Migrations path is relative to this crate's Cargo.toml
        sqlx::migrate!("../taskpair-shared/migrations").run(&db).await?;

        let user = create_user(&db).await?;

        let claims = Claims::new(user.id, user.email.clone());
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        let notifier = NotificationGateway::new();
        let state = AppState::new(db.clone(), config.clone(), notifier.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            notifier,
            user,
            jwt_token,
        })
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Registers another user and returns them with a valid token
    pub async fn another_user(&self) -> anyhow::Result<(User, String)> {
        let user = create_user(&self.db).await?;
        let claims = Claims::new(user.id, user.email.clone());
        let token = create_token(&claims, &self.config.jwt.secret)?;
        Ok((user, token))
    }

    /// Cleans up test data
    ///
    /// Deleting the user cascades to their owned tasks.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

/// Creates a user with a unique email
pub async fn create_user(db: &PgPool) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            email: format!("test-{}@example.com", Uuid::new_v4()),
            // Requests authenticate with generated JWTs, so the hash is
            // never verified in these tests
            password_hash: "test_hash".to_string(),
        },
    )
    .await?;
    Ok(user)
}

/// Builds an authenticated JSON request
pub fn json_request(
    method: &str,
    uri: &str,
    auth: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", auth)
        .header("content-type", "application/json");

    match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
