//! # kc-storage
//!
//! Storage abstraction traits.
//!
//! This crate defines the storage provider interfaces that concrete backends
//! implement, plus an in-memory backend.
//!
//! ## Provider Traits
//!
//! - [`UserProvider`] - CRUD and attribute operations for users

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod memory;
pub mod user;

pub use error::{StorageError, StorageResult};
pub use memory::InMemoryUserProvider;
pub use user::UserProvider;
