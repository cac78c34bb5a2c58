use crate::error::FlotillaError;
use figment::{Figment, providers::{Env, Format, Serialized, Yaml}};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level Flotilla configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlotillaConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

/// Service API listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_addr")]
    pub addr: String,
}

/// Connection to the orchestration engine's remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Unix socket the engine API listens on.
    #[serde(default = "default_engine_socket")]
    pub socket: PathBuf,
    /// API version prefixed to every request path, e.g. `1.24` → `/v1.24/...`.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Value of the `User-Agent` header identifying this client.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Settings applied to every service Flotilla creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Pre-existing network all services join.
    #[serde(default = "default_network")]
    pub default_network: String,
    #[serde(default = "default_role_label_key")]
    pub role_label_key: String,
}

const ENV_PREFIX: &str = "FLOTILLA_";

/// String settings read from the environment without type inference, so that
/// `FLOTILLA_ENGINE__API_VERSION=1.40` stays `"1.40"` instead of a float.
const VERBATIM_ENV_KEYS: &[&str] = &[
    "api.addr",
    "engine.socket",
    "engine.api_version",
    "engine.user_agent",
    "service.default_network",
    "service.role_label_key",
];

// ── Defaults ──────────────────────────────────────────────────

fn default_api_addr() -> String { "0.0.0.0:50101".into() }
fn default_engine_socket() -> PathBuf { PathBuf::from("/var/run/docker.sock") }
fn default_api_version() -> String { "1.24".into() }
fn default_user_agent() -> String { "flotilla-1.0".into() }
fn default_network() -> String { "flotilla-public".into() }
fn default_role_label_key() -> String { "io.flotilla.role".into() }

// ── Impls ─────────────────────────────────────────────────────

impl Default for ApiConfig {
    fn default() -> Self {
        Self { addr: default_api_addr() }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            socket: default_engine_socket(),
            api_version: default_api_version(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_network: default_network(),
            role_label_key: default_role_label_key(),
        }
    }
}

impl FlotillaConfig {
    /// Load configuration from a YAML file + `FLOTILLA_` env overrides.
    ///
    /// Nested keys are separated by `__`, e.g. `FLOTILLA_ENGINE__API_VERSION`.
    pub fn load(path: &Path) -> Result<Self, FlotillaError> {
        let mut figment = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__").ignore(VERBATIM_ENV_KEYS));
        for key in VERBATIM_ENV_KEYS {
            let var = format!("{ENV_PREFIX}{}", key.replace('.', "__").to_uppercase());
            if let Ok(value) = std::env::var(&var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        let config: FlotillaConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every engine call fail.
    pub fn validate(&self) -> Result<(), FlotillaError> {
        let required = [
            ("engine.api_version", self.engine.api_version.as_str()),
            ("engine.user_agent", self.engine.user_agent.as_str()),
            ("service.default_network", self.service.default_network.as_str()),
            ("service.role_label_key", self.service.role_label_key.as_str()),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(FlotillaError::InvalidConfig(format!("{key} must not be empty")));
            }
        }
        if self.engine.socket.as_os_str().is_empty() {
            return Err(FlotillaError::InvalidConfig("engine.socket must not be empty".into()));
        }
        Ok(())
    }
}
