use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{ConnectOptions, MySqlPool};

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub authr_server_config: AuthrWebServerConfig,
    pub mysql: MySqlConfig,
    pub jwt_auth_config: JwtAuthConfig,
}

impl AppConfig {
    /// Reads `configuration/<environment>.yaml`, then applies `AUTHR_*`
    /// environment overrides (`AUTHR_MYSQL__PASSWORD=...`).
    pub fn new() -> Result<Self, config::ConfigError> {
        let base_path = std::env::current_dir().map_err(|e| {
            config::ConfigError::Message(format!("Failed to find the current dir: {}", e))
        })?;
        let config_dir = base_path.join("configuration");

        let app_environment: Environment = std::env::var("AUTHR_APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(config::ConfigError::Message)?;

        let configurations = config::Config::builder()
            .add_source(
                config::File::from(config_dir.join(format!("{}.yaml", app_environment.as_str())))
                    .required(true),
            )
            .add_source(
                config::Environment::with_prefix("AUTHR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_settings(configurations)
    }

    /// Deserializes the settings and rejects a blank signing secret.
    pub fn from_settings(settings: config::Config) -> Result<Self, config::ConfigError> {
        let config: AppConfig = settings.try_deserialize()?;
        config.jwt_auth_config.validate()?;
        Ok(config)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct AuthrWebServerConfig {
    pub name: String,
    pub port: u16,
    pub host: String,
    /// Daily rolling log files go here when set; stdout otherwise.
    #[serde(default)]
    pub log_directory: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MySqlConfig {
    pub username: String,
    pub password: Secret<String>,
    pub host: String,
    pub port: u16,
    pub database_name: String,
    #[serde(default = "default_acquire_timeout_seconds")]
    pub acquire_timeout_seconds: u64,
    #[serde(default = "default_query_timeout_seconds")]
    pub query_timeout_seconds: u64,
}

fn default_acquire_timeout_seconds() -> u64 {
    5
}

fn default_query_timeout_seconds() -> u64 {
    30
}

impl MySqlConfig {
    pub fn connect(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .database(&self.database_name);

        options.log_statements(tracing::log::LevelFilter::Trace)
    }

    /// Connections are opened on first use, so startup does not wait on the
    /// database.
    pub fn pool(&self) -> MySqlPool {
        MySqlPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(self.acquire_timeout_seconds))
            .connect_lazy_with(self.connect())
    }

    pub fn query_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.query_timeout_seconds)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct JwtAuthConfig {
    pub secret: Secret<String>,
    #[serde(default)]
    pub issuer: Option<String>,
}

impl JwtAuthConfig {
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.secret.expose_secret().trim().is_empty() {
            return Err(config::ConfigError::Message(
                "jwt_auth_config.secret must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not supported environment. Use either `local` or `production`",
                other
            )),
        }
    }
}
