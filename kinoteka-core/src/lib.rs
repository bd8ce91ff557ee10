//! # Kinoteka Core
//!
//! Core library for the Kinoteka movie catalog backend: domain types,
//! catalog query composition, the threaded-review subsystem, ratings and
//! watchlists, all persisted in PostgreSQL through SQLx.
//!
//! ## Modules
//!
//! - [`catalog`]: filter/ordering/pagination parameters and the fixed
//!   curated-section predicates, expressed as named constants
//! - [`review_tree`]: in-memory assembly of the nested review tree
//! - [`database`]: Postgres connectivity and repositories
//! - [`slug`]: transliterating slug derivation for movie titles
//! - [`api_types`]: response shapes shared with the HTTP layer

pub mod api_types;
pub mod catalog;
pub mod database;
pub mod display;
pub mod error;
pub mod review_tree;
pub mod slug;
pub mod types;

pub use error::{CoreError, Result};
