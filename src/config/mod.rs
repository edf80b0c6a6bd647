use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection string; when set it wins over host/port/name.
    pub uri: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub max_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub operation_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(serialize_with = "redact")]
    pub jwt_secret: String,
    pub jwt_algorithm: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_cost: u32,
    pub enable_cors: bool,
}

/// Optional account created at startup when it does not exist yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub admin_email: Option<String>,
    #[serde(serialize_with = "redact_opt")]
    pub admin_password: Option<String>,
}

const DEFAULT_JWT_SECRET: &str = "everythingisawesome";

fn redact<S: serde::Serializer>(_: &str, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str("********")
}

fn redact_opt<S: serde::Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(_) => s.serialize_str("********"),
        None => s.serialize_none(),
    }
}

impl DatabaseConfig {
    pub fn connection_uri(&self) -> String {
        match &self.uri {
            Some(uri) => uri.clone(),
            None => format!("mongodb://{}:{}/{}", self.host, self.port, self.name),
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl SecurityConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("MONGO_URI") {
            self.database.uri = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("MONGO_HOST") {
            self.database.host = v;
        }
        if let Ok(v) = env::var("MONGO_PORT") {
            self.database.port = v.parse().unwrap_or(self.database.port);
        }
        if let Ok(v) = env::var("MONGO_DATABASE") {
            self.database.name = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_POOL_SIZE") {
            self.database.max_pool_size = v.parse().unwrap_or(self.database.max_pool_size);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_OPERATION_TIMEOUT_SECS") {
            self.database.operation_timeout_secs = v.parse().unwrap_or(self.database.operation_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_ALGORITHM") {
            self.security.jwt_algorithm = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        // Bootstrap account
        if let Ok(v) = env::var("ADMIN_EMAIL") {
            self.bootstrap.admin_email = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.bootstrap.admin_password = Some(v).filter(|s| !s.is_empty());
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                uri: None,
                host: "db".to_string(),
                port: 27017,
                name: "moviecollection".to_string(),
                max_pool_size: 10,
                connect_timeout_secs: 5,
                operation_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: DEFAULT_JWT_SECRET.to_string(),
                jwt_algorithm: "HS256".to_string(),
                jwt_expiry_hours: 1,
                bcrypt_cost: 10,
                enable_cors: true,
            },
            bootstrap: BootstrapConfig {
                admin_email: None,
                admin_password: None,
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database.max_pool_size = 20;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.database.max_pool_size = 50;
        config.database.connect_timeout_secs = 10;
        config.security.bcrypt_cost = 12;
        config.security.enable_cors = false;
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
