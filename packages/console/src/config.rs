//! Console configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use docbind_bindings::BindingDefaults;
use docbind_core_store::{DocRef, Value};

use crate::clients::ClientDirectory;
use crate::error::ConsoleError;
use crate::heartbeat::HeartbeatMonitor;

/// Console settings. Every field is optional in the JSON file.
///
/// ```json
/// {
///   "health_monitor": { "collection": "config", "id": "healthMonitor" },
///   "clients_collection": "clients",
///   "heartbeat_window_secs": 4200,
///   "restart_cooldown_secs": 10,
///   "client_defaults": { "enabled": false },
///   "bindings": { "default_zone": "America/New_York" }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub health_monitor: DocRef,
    pub clients_collection: String,
    pub heartbeat_window_secs: u64,
    pub restart_cooldown_secs: u64,
    /// Initial document of a new client.
    pub client_defaults: serde_json::Value,
    pub bindings: BindingDefaults,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            health_monitor: DocRef::new("config", "healthMonitor"),
            clients_collection: "clients".to_string(),
            heartbeat_window_secs: 70 * 60,
            restart_cooldown_secs: 10,
            client_defaults: serde_json::json!({ "enabled": false }),
            bindings: BindingDefaults::default(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_json(text: &str) -> Result<Self, ConsoleError> {
        let config: Self = serde_json::from_str(text)?;
        config.bindings.alert_window()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConsoleError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|error| ConsoleError::ConfigIo {
            path: path.to_path_buf(),
            error,
        })?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), "loaded console config");
        Ok(config)
    }

    pub fn heartbeat_window(&self) -> chrono::Duration {
        i64::try_from(self.heartbeat_window_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn restart_cooldown(&self) -> Duration {
        Duration::from_secs(self.restart_cooldown_secs)
    }

    pub fn monitor(&self) -> HeartbeatMonitor {
        HeartbeatMonitor::new(self.heartbeat_window())
    }

    pub fn directory(&self) -> ClientDirectory {
        ClientDirectory::new(self.clients_collection.clone(), self.client_defaults())
    }

    pub fn client_defaults(&self) -> Value {
        docbind_core_store::json_to_value(self.client_defaults.clone())
    }
}
