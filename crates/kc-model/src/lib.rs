//! # kc-model
//!
//! Domain models shared by storage and event listeners.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod user;

pub use user::User;
