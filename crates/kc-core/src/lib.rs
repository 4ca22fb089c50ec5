//! # kc-core
//!
//! Core utilities, configuration, and error handling.
//!
//! This crate provides the foundational types shared by the storage, SPI and
//! event listener crates: the event model delivered to listeners, the common
//! error type, and configuration loading.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::{Config, EventsConfig};
pub use error::{Error, Result};
pub use event::{AdminEvent, Event, EventType};
