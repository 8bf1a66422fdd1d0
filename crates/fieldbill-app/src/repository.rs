//! Repository adapters for persistence layer

use fieldbill_infra::persistence::{FileAppStateStore, FileOutbox};
use fieldbill_types::Result;

use crate::config::Config;

/// Open file-based application state store
pub fn open_app_state_store(config: &Config) -> Result<FileAppStateStore> {
    FileAppStateStore::open(config.data_dir()?)
}

/// Open file-based submission outbox
pub fn open_outbox(config: &Config) -> Result<FileOutbox> {
    FileOutbox::open(config.outbox_dir()?)
}
