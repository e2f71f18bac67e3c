//! Core types and trait definitions for dunbar.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Stores, providers, and the CLI all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod contact;
pub mod error;
pub mod message;
pub mod paths;
pub mod source;

pub use error::{Error, Result};
