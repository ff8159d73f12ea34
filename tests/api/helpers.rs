use std::net::TcpListener;
use std::sync::Arc;

use async_trait::async_trait;
use authr::core::config::JwtAuthConfig;
use authr::core::jwt_auth::{JwtClaims, JwtVerifier};
use authr::core::{get_subscriber, init_subscriber};
use authr::db::{AccessRepository, InMemoryAccessRepository, RepositoryError};
use authr::models::access::AccessRow;
use jsonwebtoken::{encode, EncodingKey, Header};
use once_cell::sync::Lazy;
use secrecy::Secret;

pub const JWT_SECRET: &str = "integration-test-secret";

// Set TEST_LOG to see the server logs while running the suite.
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("failed to init test subscriber");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("failed to init test subscriber");
    };
});

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn get_access(&self, user_id: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = self
            .api_client
            .get(&format!("{}/access/{}", &self.address, user_id));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("failed to execute request")
    }

    pub async fn get_health(&self) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/health", &self.address))
            .send()
            .await
            .expect("failed to execute request")
    }
}

pub fn token_for(subject: &str) -> String {
    let claims = JwtClaims {
        sub: Some(subject.to_string()),
        exp: 4_102_444_800, // 2100-01-01
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to sign test token")
}

pub fn row(user_type_id: i64) -> AccessRow {
    AccessRow {
        user_type_id: Some(user_type_id),
        ..Default::default()
    }
}

/// Repository whose every call fails, standing in for an unreachable database.
pub struct UnavailableRepository;

#[async_trait]
impl AccessRepository for UnavailableRepository {
    async fn fetch_access_rows(&self, _: i64) -> Result<Vec<AccessRow>, RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }
}

pub async fn spawn_app(repository: InMemoryAccessRepository) -> TestApp {
    spawn_app_with(Arc::new(repository)).await
}

pub async fn spawn_app_with(repository: Arc<dyn AccessRepository>) -> TestApp {
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let verifier = JwtVerifier::new(&JwtAuthConfig {
        secret: Secret::new(JWT_SECRET.to_string()),
        issuer: None,
    });
    let server = authr::authr_web_server::run(
        listener,
        repository,
        verifier,
        "Authorization Service".to_string(),
    )
    .expect("failed to build server");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        api_client: reqwest::Client::new(),
    }
}
