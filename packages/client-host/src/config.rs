//! Host configuration.

use ics07_tendermint_light_client::TendermintClient;
use light_client_interface::LightClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Allows every registered client type when listed in [`HostConfig::allowed_clients`]
pub const ALLOW_ALL_CLIENTS: &str = "*";

/// The default bound on consensus states pruned by a single update
pub const DEFAULT_MAX_PRUNED_PER_UPDATE: usize = 5;

/// The host configuration
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[allow(clippy::module_name_repetitions)]
pub struct HostConfig {
    /// The client types clients may be created with, or `*` for all registered types
    pub allowed_clients: Vec<String>,
    /// The maximum number of expired consensus states deleted after each update
    #[serde(default = "default_max_pruned_per_update")]
    pub max_pruned_per_update: usize,
}

const fn default_max_pruned_per_update() -> usize {
    DEFAULT_MAX_PRUNED_PER_UPDATE
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            allowed_clients: vec![<TendermintClient as LightClient>::CLIENT_TYPE.to_string()],
            max_pruned_per_update: DEFAULT_MAX_PRUNED_PER_UPDATE,
        }
    }
}

impl HostConfig {
    /// Returns true if clients of `client_type` may be created.
    #[must_use]
    pub fn is_allowed(&self, client_type: &str) -> bool {
        self.allowed_clients
            .iter()
            .any(|allowed| allowed == ALLOW_ALL_CLIENTS || allowed == client_type)
    }
}

/// Parse a configuration value into the target struct while producing detailed path-aware
/// error messages.
///
/// # Errors
/// Returns an [`anyhow::Error`] with the path of the offending field and the serde error.
pub fn parse_config<T>(value: serde_json::Value) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let json_string = value.to_string();

    let mut deserializer = serde_json::Deserializer::from_str(&json_string);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer)
        .map_err(|e| anyhow::anyhow!("config error at {}: {}", e.path(), e))
}
