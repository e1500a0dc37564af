//! Local JSON-document backend for the Taskify task store.
//!
//! The whole task collection lives in one JSON document, optionally mirrored
//! to a file, with an artificial per-operation latency. It stands in for a
//! remote store in demos and doubles as an in-memory fake for tests.

mod document;
mod sample;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::LocalStore;
