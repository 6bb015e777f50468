//! Storage module for snapshots and configuration.

pub mod blob;
pub mod config;
pub mod snapshot;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore, StorageError};
pub use config::{AppConfig, ConfigError, MapSettings, StorageSettings, TrackerSettings};
pub use snapshot::{SnapshotError, SnapshotStore, DEFAULT_SNAPSHOT_KEY};
