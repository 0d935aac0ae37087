//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::env::EnvSource;
use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { key: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration: optional TOML file, then environment overrides, then validation.
pub fn load_config<E: EnvSource>(path: Option<&Path>, env: &E) -> Result<RelayConfig, ConfigError> {
    let config = match path {
        Some(path) => read_file(path)?,
        None => RelayConfig::default(),
    };

    let config = apply_env_overrides(config, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn read_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Overlay the process-style environment variables on top of `config`.
///
/// - `BIND_HOST`, `BIND_PORT`
/// - `DH_BASE_URL`, `CLIENT_ID`, `BROKER_TIMEOUT_SECS`
/// - `SECRET_URL`, `SECRET_TIMEOUT_SECS`
/// - `REQUEST_TIMEOUT_SECS`, `MAX_BODY_BYTES`
/// - `DEBUG` (`"1"` enables verbose logging)
/// - `METRICS_ADDRESS` (setting it enables the exporter)
pub fn apply_env_overrides<E: EnvSource>(
    mut config: RelayConfig,
    env: &E,
) -> Result<RelayConfig, ConfigError> {
    if let Some(host) = env.var("BIND_HOST") {
        config.listener.host = host;
    }
    if let Some(port) = parse_var(env, "BIND_PORT")? {
        config.listener.port = port;
    }
    if let Some(url) = env.var("DH_BASE_URL") {
        config.broker.base_url = url;
    }
    if let Some(client_id) = env.var("CLIENT_ID") {
        config.broker.client_id = client_id;
    }
    if let Some(secs) = parse_var(env, "BROKER_TIMEOUT_SECS")? {
        config.broker.timeout_secs = secs;
    }
    if let Some(url) = env.var("SECRET_URL") {
        config.secret.url = url;
    }
    if let Some(secs) = parse_var(env, "SECRET_TIMEOUT_SECS")? {
        config.secret.timeout_secs = secs;
    }
    if let Some(secs) = parse_var(env, "REQUEST_TIMEOUT_SECS")? {
        config.timeouts.request_secs = secs;
    }
    if let Some(bytes) = parse_var(env, "MAX_BODY_BYTES")? {
        config.limits.max_body_bytes = bytes;
    }
    if let Some(debug) = env.var("DEBUG") {
        config.observability.debug = debug.trim() == "1";
    }
    if let Some(addr) = env.var("METRICS_ADDRESS") {
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = addr;
    }

    Ok(config)
}

fn parse_var<E, T>(env: &E, key: &'static str) -> Result<Option<T>, ConfigError>
where
    E: EnvSource,
    T: std::str::FromStr,
{
    match env.var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { key, value }),
        None => Ok(None),
    }
}
