//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (BIND_HOST, DH_BASE_URL, ...)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → handed by value to the server and relay components
//! ```
//!
//! # Design Decisions
//! - Read once at startup; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::{EnvSource, MapEnv, SystemEnv};
pub use loader::{load_config, ConfigError};
pub use schema::{
    BrokerConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, RelayConfig, SecretConfig,
    ServiceConfig, TimeoutConfig,
};
