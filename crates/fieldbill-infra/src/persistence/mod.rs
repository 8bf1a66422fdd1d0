//! Persistence implementations
//!
//! This module provides file-based implementations of the repository traits.

mod file_app_state_store;
mod file_outbox;
mod memory_app_state_store;

pub use file_app_state_store::FileAppStateStore;
pub use file_outbox::FileOutbox;
pub use memory_app_state_store::MemoryAppStateStore;
