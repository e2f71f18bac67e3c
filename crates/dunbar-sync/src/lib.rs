//! Reconciliation between the local stores and the remote providers.
//!
//! Managers own no authoritative state. Every call reads from or writes to a
//! store, and talks to a provider only through the capability traits in
//! `dunbar-core`.

pub mod contacts;
pub mod error;
pub mod messages;

pub use contacts::{ContactManager, ContactSyncReport};
pub use error::{Error, Result};
pub use messages::{MessageManager, MessageSyncReport};
