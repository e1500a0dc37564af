//! Core types, storage trait, and task logic for Taskify.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::TaskStore`]; the transport layer talks
//! to [`repository::TaskRepository`] and resolves callers through
//! [`access::AccessGate`].

pub mod access;
pub mod error;
pub mod filter;
pub mod repository;
pub mod stats;
pub mod store;
pub mod task;

pub use error::{Error, Result};
