//! Event system for governor status reporting
//!
//! Provides:
//! - Event types for the status channel consumed by a UI layer
//! - A broadcast dispatcher for publishing events to subscribers
//!
//! The dispatcher is side-effect only from the governor's perspective:
//! published events never influence control decisions, and a publish with
//! no subscribers is not an error.

use crate::data::{GovernorSnapshot, TelemetryReport};
use tokio::sync::broadcast;

/// Governor status-channel events
#[derive(Debug, Clone)]
pub enum GovernorEvent {
    /// Human-readable status line ("Buffer sizes detected", "Active", ...)
    Status(String),
    /// Full state snapshot, published on every lifecycle transition
    State(GovernorSnapshot),
    /// Rate-limited telemetry sample
    Telemetry(TelemetryReport),
}

impl std::fmt::Display for GovernorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GovernorEvent::Status(msg) => write!(f, "status: {}", msg),
            GovernorEvent::State(snapshot) => {
                write!(f, "state: {} (enabled: {})", snapshot.state, snapshot.enabled)
            }
            GovernorEvent::Telemetry(report) => write!(
                f,
                "telemetry: inflight {} avail P{} B{}",
                report.inflight, report.planner_buffer_avail, report.command_buffer_avail
            ),
        }
    }
}

/// Event dispatcher for publishing governor events to subscribers
#[derive(Clone)]
pub struct EventDispatcher {
    /// Broadcast sender channel for governor events.
    tx: broadcast::Sender<GovernorEvent>,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    ///
    /// # Arguments
    /// * `buffer_size` - Size of the broadcast buffer (default 100)
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size);
        Self { tx }
    }

    /// Create a new event dispatcher with default buffer size
    pub fn default_with_buffer() -> Self {
        Self::new(100)
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<GovernorEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers
    ///
    /// A send error only means there are no subscribers; the governor
    /// treats that as a successful no-op.
    pub fn publish(&self, event: GovernorEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::default_with_buffer()
    }
}
