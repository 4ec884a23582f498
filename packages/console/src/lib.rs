//! Admin console features built on docbind bindings.
//!
//! Besides per-field bindings, the console has a few whole-document
//! actions that share the same runner and error conventions:
//! - `HeartbeatMonitor`: classify the backend as online or offline
//! - `BackendRestart`: request a restart, with a cooldown
//! - `ClientDirectory` and `NewClientForm`: list, create and delete clients
//!
//! # Example
//!
//! ```rust
//! use docbind_console::{validate_client_id, ClientIdError, ConsoleConfig};
//!
//! let config = ConsoleConfig::from_json(r#"{ "clients_collection": "tenants" }"#).unwrap();
//! assert_eq!(config.directory().collection(), "tenants");
//!
//! let existing = vec!["alice@example.com".to_string()];
//! assert_eq!(
//!     validate_client_id("Bob@Example.com", &existing),
//!     Ok("bob@example.com".to_string())
//! );
//! assert_eq!(validate_client_id("", &existing), Err(ClientIdError::Empty));
//! ```

mod clients;
mod config;
mod cooldown;
mod error;
mod heartbeat;
mod restart;

pub use clients::{validate_client_id, ClientDirectory, NewClientForm};
pub use config::ConsoleConfig;
pub use cooldown::Cooldown;
pub use error::{ClientIdError, ConsoleError};
pub use heartbeat::{Heartbeat, HeartbeatMonitor, HeartbeatStatus};
pub use restart::BackendRestart;
