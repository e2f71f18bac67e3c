//! Local persistence for dunbar.
//!
//! Contacts live as one pretty-printed JSON file per record under
//! `contacts/people/`. Conversations and messages live in a SQLite database
//! wrapped with [`tokio_rusqlite`] so queries never block the async runtime.

mod encode;
mod schema;

pub mod contacts;
pub mod error;
pub mod messages;

pub use contacts::ContactFiles;
pub use error::{Error, Result};
pub use messages::MessageDb;

#[cfg(test)]
mod tests;
