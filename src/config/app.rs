use serde::{Deserialize, Serialize};

use super::{AuthConfig, ConfigError, Validate};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppMetadata,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub observability: ObservabilityConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    pub name: String,
    pub version: String,
    /// development, staging or production
    pub environment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Defaults to the number of logical CPUs
    pub workers: usize,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    /// Seconds given to in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds
    pub connect_timeout: u64,
    /// Seconds
    pub idle_timeout: u64,
    pub sqlx_logging: bool,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset
    pub log_level: String,
    pub json: bool,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "estate-admin".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: num_cpus::get(),
            cors_origins: vec![],
            shutdown_timeout: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://estate-admin.sqlite?mode=rwc".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: 8,
            idle_timeout: 300,
            sqlx_logging: false,
            run_migrations: true,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

impl Validate for AppMetadata {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError("app.name cannot be empty".to_string()));
        }
        if self.environment.is_empty() {
            return Err(ConfigError::ValidationError(
                "app.environment cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::ValidationError("server.host cannot be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::ValidationError("server.port must be > 0".to_string()));
        }
        if self.workers == 0 {
            return Err(ConfigError::ValidationError("server.workers must be > 0".to_string()));
        }
        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::ValidationError("database.url cannot be empty".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be > 0".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError(
                "database.min_connections cannot exceed database.max_connections".to_string(),
            ));
        }
        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.is_empty() {
            return Err(ConfigError::ValidationError(
                "observability.log_level cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.app.validate()?;
        self.server.validate()?;
        self.database.validate()?;
        self.observability.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

/// Load configuration from files and environment variables
///
/// Precedence, highest first:
/// 1. Environment variables: ESTATE_ADMIN__SERVER__PORT=8080
/// 2. config/local.toml
/// 3. config/{APP_ENV}.toml
/// 4. config/default.toml
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use ::config::{Config, Environment, File};

    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

    let config = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", env)).required(false))
        .add_source(File::with_name("config/local").required(false))
        .add_source(
            Environment::with_prefix("ESTATE_ADMIN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins"),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;

    Ok(app_config)
}
