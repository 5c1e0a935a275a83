//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use studyhub_api::AppState;
use studyhub_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator};
use studyhub_core::config::app::{CorsConfig, ServerConfig};
use studyhub_core::config::auth::AuthConfig;
use studyhub_core::config::logging::LoggingConfig;
use studyhub_core::config::storage::StorageConfig;
use studyhub_core::config::{AppConfig, DatabaseConfig};
use studyhub_core::traits::FileStore;
use studyhub_database::repositories::{
    BookmarkRepository, CategoryRepository, ResourceRepository, TagRepository, UserRepository,
};
use studyhub_database::{DatabasePool, migration};
use studyhub_service::auth::AuthService;
use studyhub_service::bookmark::BookmarkService;
use studyhub_service::catalog::{CatalogService, DownloadService, UploadService};
use studyhub_service::taxonomy::{CategoryService, TagService};
use studyhub_service::user::UserService;
use studyhub_storage::LocalFileStore;

/// Boundary used by the hand-built multipart bodies.
const MULTIPART_BOUNDARY: &str = "studyhub-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Upload directory; removed when the test ends
    _upload_dir: TempDir,
}

impl TestApp {
    /// Builds the full application against `TEST_DATABASE_URL`.
    ///
    /// Returns `None` when the variable is unset so callers can skip.
    pub async fn spawn() -> Option<Self> {
        let db_url = std::env::var("TEST_DATABASE_URL").ok()?;

        let upload_dir = TempDir::new().expect("Failed to create upload dir");
        let config = test_config(
            &db_url,
            upload_dir.path().to_str().expect("Non-UTF8 temp path"),
        );

        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        migration::run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");
        let db_pool = db.into_pool();

        let store: Arc<dyn FileStore> = Arc::new(
            LocalFileStore::new(&config.storage.upload_dir)
                .await
                .expect("Failed to init file store"),
        );

        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let category_repo = Arc::new(CategoryRepository::new(db_pool.clone()));
        let tag_repo = Arc::new(TagRepository::new(db_pool.clone()));
        let resource_repo = Arc::new(ResourceRepository::new(db_pool.clone()));
        let bookmark_repo = Arc::new(BookmarkRepository::new(db_pool.clone()));

        let password_hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.auth));
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&user_repo),
            Arc::clone(&password_hasher),
            Arc::clone(&password_validator),
            Arc::clone(&jwt_encoder),
            Arc::clone(&jwt_decoder),
        ));
        let user_service = Arc::new(UserService::new(
            Arc::clone(&user_repo),
            Arc::clone(&resource_repo),
            Arc::clone(&bookmark_repo),
            Arc::clone(&password_hasher),
        ));
        let catalog_service = Arc::new(CatalogService::new(
            Arc::clone(&resource_repo),
            Arc::clone(&category_repo),
            Arc::clone(&tag_repo),
            Arc::clone(&user_repo),
            Arc::clone(&store),
        ));
        let upload_service = Arc::new(UploadService::new(
            Arc::clone(&resource_repo),
            Arc::clone(&catalog_service),
            Arc::clone(&store),
            config.storage.clone(),
        ));
        let download_service = Arc::new(DownloadService::new(
            Arc::clone(&resource_repo),
            Arc::clone(&store),
        ));
        let category_service = Arc::new(CategoryService::new(Arc::clone(&category_repo)));
        let tag_service = Arc::new(TagService::new(Arc::clone(&tag_repo)));
        let bookmark_service = Arc::new(BookmarkService::new(
            Arc::clone(&bookmark_repo),
            Arc::clone(&resource_repo),
            Arc::clone(&catalog_service),
        ));

        let state = AppState {
            config: Arc::new(config),
            db_pool: db_pool.clone(),
            auth_service,
            user_service,
            catalog_service,
            upload_service,
            download_service,
            category_service,
            tag_service,
            bookmark_service,
        };

        let router = studyhub_api::build_router(state);

        Some(Self {
            router,
            db_pool,
            _upload_dir: upload_dir,
        })
    }

    /// Register a user and return their login token.
    pub async fn register_and_login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(serde_json::json!({
                    "email": email,
                    "password": password,
                    "first_name": "Test",
                    "last_name": "User",
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Registration failed: {:?}",
            response.body
        );

        self.login(email, password).await
    }

    /// Login and return JWT access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({
                    "email": email,
                    "password": password,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response
            .body
            .get("access_token")
            .and_then(|v| v.as_str())
            .expect("No access_token in login response")
            .to_string()
    }

    /// Register a LINK resource and return its id.
    pub async fn create_link(&self, token: &str, title: &str, url: &str) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/resources",
                Some(serde_json::json!({
                    "title": title,
                    "resource_type": "LINK",
                    "url": url,
                })),
                Some(token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Link creation failed: {:?}",
            response.body
        );

        parse_id(&response.body)
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Make a form-encoded request, as an OAuth2 password-grant client would.
    pub async fn request_form(&self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        let body = form
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload a file through the multipart endpoint.
    pub async fn upload_file(
        &self,
        token: &str,
        title: &str,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"title\"\r\n\r\n\
                 {title}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/resources/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Make a request and return the raw response for non-JSON bodies.
    pub async fn request_raw(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
    ) -> (StatusCode, HeaderMap, Vec<u8>) {
        let mut req = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let req = req
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        (status, headers, bytes.to_vec())
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Unique email so parallel tests never collide on the unique constraint.
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@test.com", Uuid::new_v4().simple())
}

/// Unique title fragment for scoping search queries to one test.
pub fn unique_marker() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Extract the `id` field of a JSON body.
pub fn parse_id(body: &Value) -> Uuid {
    body.get("id")
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(|| panic!("No id in body: {body:?}"))
}

/// Percent-encode the handful of characters test credentials contain.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => out.push(c),
            _ => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    out
}

fn test_config(db_url: &str, upload_dir: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig::default(),
        },
        database: DatabaseConfig {
            url: db_url.to_string(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: 60,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            jwt_ttl_minutes: 30,
            password_min_length: 8,
        },
        storage: StorageConfig {
            upload_dir: upload_dir.to_string(),
            max_upload_size_bytes: 10 * 1024 * 1024,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        },
    }
}
