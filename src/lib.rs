//! Flare Refresh
//!
//! Keeps a locally visible list of addresses for a service group in sync with a service
//! registry and republishes it on standard output, one address per line, each snapshot
//! terminated by a blank line, for a load-balancer reload agent to consume.

pub mod config;
pub mod discovery;
pub mod error;
pub mod refresh;
pub mod shutdown;
pub mod telemetry;
pub mod types;
pub mod writer;

// Re-exports
pub use config::{Config, RefreshSettings};
pub use discovery::{
    BackendConfig, CoordinationStore, RefreshMode, RegistryClient, RegistryFactory, WatchClient,
};
pub use error::{ConfigError, RefreshError, RegistryError};
pub use refresh::{ChangeNotice, RefreshConfig, RefreshLoop};
pub use shutdown::{ShutdownController, ShutdownSignal};
pub use types::{MembershipSnapshot, ServiceGroupRef};
pub use writer::SnapshotWriter;
