use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, error};

use crate::models::ConfigError;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Local API host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Local API port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment (dev, staging, prod)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// CORS allowed origins, comma separated
    pub cors_origins: Option<String>,

    /// Level for this service and HTTP tracing when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Base URL of the edit-status service
    #[serde(default = "default_edit_status_url")]
    pub edit_status_url: String,

    /// Base URL of the API entry used to resolve group database servers
    pub api_entry_url: Option<String>,

    /// Initial auth token, replaced at runtime through the session endpoint
    #[serde(default)]
    pub auth_token: String,

    /// Personal knowledge base GUID
    #[serde(default)]
    pub user_kb_guid: String,

    /// Personal knowledge base server
    #[serde(default)]
    pub user_database_server: String,

    /// Seconds between re-announcements of active editors
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,

    /// Advisory client-side timeout for a status check
    #[serde(default = "default_check_timeout_secs")]
    pub check_timeout_secs: u64,

    /// Timeout applied to every outgoing HTTP request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Capacity of the notifier event queue
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,

    /// Capacity of the checker event broadcast
    #[serde(default = "default_event_broadcast_capacity")]
    pub event_broadcast_capacity: usize,

    /// How long a resolved group server URL stays cached
    #[serde(default = "default_route_cache_ttl_secs")]
    pub route_cache_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        match envy::from_env::<Config>() {
            Ok(config) => {
                info!("✅ Configuration loaded successfully");
                Ok(config)
            }
            Err(e) => {
                error!("❌ Failed to load configuration: {}", e);
                Err(ConfigError::EnvError(e))
            }
        }
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment.to_lowercase() == "dev" || self.environment.to_lowercase() == "development"
    }

    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Fallback tracing filter built from `log_level`
    pub fn log_filter(&self) -> String {
        format!("note_edit_status={0},tower_http={0},info", self.log_level)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn route_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.route_cache_ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            cors_origins: None,
            edit_status_url: default_edit_status_url(),
            api_entry_url: None,
            auth_token: String::new(),
            user_kb_guid: String::new(),
            user_database_server: String::new(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            check_timeout_secs: default_check_timeout_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            event_queue_capacity: default_event_queue_capacity(),
            event_broadcast_capacity: default_event_broadcast_capacity(),
            route_cache_ttl_secs: default_route_cache_ttl_secs(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_edit_status_url() -> String {
    "https://note.wiz.cn/api/edit-status".to_string()
}

fn default_heartbeat_interval_secs() -> u64 {
    30
}

fn default_check_timeout_secs() -> u64 {
    5
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_event_queue_capacity() -> usize {
    256
}

fn default_event_broadcast_capacity() -> usize {
    64
}

fn default_route_cache_ttl_secs() -> u64 {
    600
}
