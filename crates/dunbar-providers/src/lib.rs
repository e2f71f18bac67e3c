//! Provider adapters for dunbar.
//!
//! Each adapter talks to one remote service and normalises its records into
//! the `dunbar-core` types:
//!
//! - [`google`]: Google People API contacts, OAuth2, incremental sync cursor.
//! - [`beeper`]: Beeper Desktop API chats and messages, bearer token.

mod credentials;
mod http;

pub mod beeper;
pub mod error;
pub mod google;

pub use beeper::BeeperMessages;
pub use error::{Error, Result};
pub use google::GoogleContacts;
