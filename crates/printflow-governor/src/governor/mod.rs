//! The flow governor and its supporting components
//!
//! Dependency order, leaves first: capacity calibration, inflight
//! accounting, run statistics, lifecycle gates, the adaptive send trigger,
//! telemetry pacing, the host collaborator contract, and finally the
//! `FlowGovernor` orchestrator that ties them to the acknowledgment stream.

pub mod accounting;
pub mod capacity;
pub mod config;
pub mod flow;
pub mod host;
pub mod shared;
pub mod state;
pub mod stats;
pub mod telemetry;
pub mod trigger;

pub use capacity::{CapacityProfile, INFLIGHT_TARGET_MAX};
pub use config::{GovernorConfig, PrefixSyncClassifier, SyncClassifier};
pub use flow::FlowGovernor;
pub use host::{HostPort, LineDisposition};
pub use shared::SharedGovernor;
pub use stats::RunStatistics;
pub use telemetry::TelemetryEmitter;
pub use trigger::{SendDecision, SendTrigger, TriggerContext};
