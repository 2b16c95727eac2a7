//! # PrintFlow Governor
//!
//! Flow-control governor for the host↔firmware command stream of
//! line-oriented motion controllers. Keeps the firmware's planner and
//! command buffers as full as possible without exceeding the host's own
//! flow-control ceiling, and backs off during resend recovery and
//! non-print phases.
//!
//! # Features
//! - Advanced `ok` acknowledgment parsing (`ok N<line> P<planner> B<command>`)
//! - One-shot buffer-capacity calibration from the first acknowledgment
//! - Per-acknowledgment inflight accounting
//! - Underrun and resend-episode statistics
//! - Stream lifecycle state machine (detecting, printing, stopping, syncing)
//! - Adaptive send trigger that widens the host's send window
//! - Rate-limited telemetry over a broadcast status channel

pub mod governor;
pub mod protocol;

pub use governor::{
    accounting::inflight_commands,
    capacity::{CapacityProfile, INFLIGHT_TARGET_MAX},
    config::{GovernorConfig, PrefixSyncClassifier, SyncClassifier},
    flow::FlowGovernor,
    host::{HostPort, LineDisposition},
    shared::SharedGovernor,
    stats::RunStatistics,
    telemetry::TelemetryEmitter,
    trigger::{SendDecision, SendTrigger, TriggerContext},
};

pub use protocol::ack::{AckParser, AdvancedAck, ParsedAck};
