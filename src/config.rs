use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
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
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_cost: u32,
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
        if let Ok(v) = env::var("NOTES_API_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3500 },
            database: DatabaseConfig {
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7, // 1 week
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3500 },
            database: DatabaseConfig {
                max_connections: 20,
                connect_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3500 },
            database: DatabaseConfig {
                max_connections: 50,
                connect_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 3500);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.security.jwt_expiry_hours, 24 * 7);
    }

    #[test]
    fn default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.security.jwt_expiry_hours, 4);
    }

    #[test]
    fn env_vars_override_defaults() {
        env::set_var("NOTES_API_PORT", "4100");
        env::set_var("DATABASE_MAX_CONNECTIONS", "7");
        env::set_var("SECURITY_JWT_EXPIRY_HOURS", "2");

        let config = AppConfig::development().with_env_overrides();
        assert_eq!(config.server.port, 4100);
        assert_eq!(config.database.max_connections, 7);
        assert_eq!(config.security.jwt_expiry_hours, 2);

        env::remove_var("NOTES_API_PORT");
        env::remove_var("DATABASE_MAX_CONNECTIONS");
        env::remove_var("SECURITY_JWT_EXPIRY_HOURS");
    }

    #[test]
    fn unparsable_override_falls_back_to_default() {
        env::set_var("DATABASE_CONNECT_TIMEOUT_SECS", "soon");

        let config = AppConfig::development().with_env_overrides();
        assert_eq!(
            config.database.connect_timeout_secs,
            AppConfig::development().database.connect_timeout_secs
        );

        env::remove_var("DATABASE_CONNECT_TIMEOUT_SECS");
    }
}
