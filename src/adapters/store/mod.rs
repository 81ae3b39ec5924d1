//! Session store adapters.

mod memory;

pub use memory::{InMemorySessionStore, SessionStoreError};
