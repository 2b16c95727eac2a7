//! # PrintFlow Core
//!
//! Core types, errors, and event plumbing for PrintFlow.
//! Provides the data model shared between the governor and its hosts:
//! stream lifecycle states, status snapshots, telemetry reports, and the
//! broadcast event dispatcher the UI layer subscribes to.

pub mod data;
pub mod error;
pub mod event;

pub use data::{GovernorSnapshot, StreamState, TelemetryReport};
pub use error::{ConfigError, Error, HostError, Result};
pub use event::{EventDispatcher, GovernorEvent};
