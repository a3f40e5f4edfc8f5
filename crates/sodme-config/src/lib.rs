//! sodme-config
//!
//! Layered YAML configuration loading + canonical hashing, a typed
//! `SodmeConfig` settings surface deserialized from the canonical JSON, and
//! broker secret resolution kept out of the hashed/logged config surface.

pub mod loader;
pub mod secrets;
pub mod settings;

pub use loader::{load_layered_yaml, LoadedConfig};
pub use secrets::{resolve_broker_secrets, ResolvedBrokerSecrets};
pub use settings::{load_typed_config, BrokerConfig, BrokerKeysEnv, RateLimitConfig, SodmeConfig};
