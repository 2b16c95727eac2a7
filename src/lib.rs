//! # PrintFlow
//!
//! A flow-control governor for the host↔firmware command stream of
//! line-oriented motion controllers (3D printers, CNC machines). PrintFlow
//! sits on the host's receive path, reads the firmware's advanced `ok`
//! acknowledgments, and widens the host's send window up to the firmware's
//! measured buffer capacity, backing off automatically during resend
//! recovery, warm-up, and queue drains.
//!
//! ## Architecture
//!
//! PrintFlow is organized as a workspace with two crates:
//!
//! 1. **printflow-core** - Shared data model, errors, broadcast events
//! 2. **printflow-governor** - Parser, calibration, accounting, state
//!    machine, send trigger, telemetry
//!
//! The root crate re-exports both and ships a console harness that runs a
//! scripted firmware/host simulation through the governor.

pub use printflow_core::{
    ConfigError, Error, EventDispatcher, GovernorEvent, GovernorSnapshot, HostError, Result,
    StreamState, TelemetryReport,
};

pub use printflow_governor::{
    inflight_commands, AckParser, AdvancedAck, CapacityProfile, FlowGovernor, GovernorConfig,
    HostPort, LineDisposition, ParsedAck, PrefixSyncClassifier, RunStatistics, SendDecision,
    SendTrigger, SharedGovernor, SyncClassifier, TelemetryEmitter, TriggerContext,
    INFLIGHT_TARGET_MAX,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
