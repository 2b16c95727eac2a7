//! Shared data model for the flow governor
//!
//! Defines the stream lifecycle state, the state snapshot published to the
//! UI layer, and the periodic telemetry report. Everything here is plain
//! data: cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of the governed command stream
///
/// Exactly one value is active at a time. All states are re-enterable over
/// the life of a connection; `Disconnected` is only terminal in the sense
/// that the governor does no active work there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    /// Governor constructed, no connection activity yet.
    Initializing,
    /// Connection attempt underway, waiting for the calibration ok.
    Detecting,
    /// Buffer sizes calibrated from the first advanced ok.
    Detected,
    /// Connection torn down; calibration is invalid.
    Disconnected,
    /// Bulk file transfer to the device is running.
    Transferring,
    /// Print started but the start-after gate has not been reached.
    WaitingToStart,
    /// Actively printing with the governor eligible to run.
    Printing,
    /// A stop command was sent; draining until line numbers align.
    Stopping,
    /// Drain after a stop command completed.
    Stopped,
    /// A queue-draining command was queued; holding until aligned.
    Syncing,
    /// Job finished or failed; idle and ready for the next one.
    Ready,
}

impl StreamState {
    /// States in which the send trigger may run at all
    pub fn allows_governing(&self) -> bool {
        !matches!(
            self,
            StreamState::Disconnected | StreamState::Stopping | StreamState::Syncing
        )
    }
}

impl std::fmt::Display for StreamState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamState::Initializing => write!(f, "initializing"),
            StreamState::Detecting => write!(f, "detecting"),
            StreamState::Detected => write!(f, "detected"),
            StreamState::Disconnected => write!(f, "disconnected"),
            StreamState::Transferring => write!(f, "transferring"),
            StreamState::WaitingToStart => write!(f, "waiting_to_start"),
            StreamState::Printing => write!(f, "printing"),
            StreamState::Stopping => write!(f, "stopping"),
            StreamState::Stopped => write!(f, "stopped"),
            StreamState::Syncing => write!(f, "syncing"),
            StreamState::Ready => write!(f, "ready"),
        }
    }
}

/// Snapshot of governor state published on every transition
///
/// This is the `state` payload a sidebar/UI consumes: calibrated buffer
/// sizes, the active inflight target, and the lifecycle flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernorSnapshot {
    /// Session this snapshot belongs to (new UUID per connection attempt).
    pub session_id: Option<Uuid>,
    /// Calibrated planner buffer size (0 until detected).
    pub planner_buffer_size: u16,
    /// Calibrated command buffer size (0 until detected).
    pub command_buffer_size: u16,
    /// Inflight target derived from the command buffer size.
    pub inflight_target: u16,
    /// Current lifecycle state.
    pub state: StreamState,
    /// Whether the governor is currently allowed to widen the send window.
    pub enabled: bool,
    /// Whether the firmware was observed speaking the advanced ok dialect.
    pub advanced_ok_detected: bool,
}

/// Periodic telemetry report
///
/// Rate-limited structured sample of the acknowledgment stream: line
/// counters, buffer availability readings, and the run statistics. Emitted
/// for diagnostics only; never feeds back into control decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryReport {
    /// Host's last-sent line number.
    pub current_line_number: u32,
    /// Line number echoed by the most recent acknowledgment.
    pub acked_line_number: u32,
    /// Commands sent but not yet acknowledged (pending grants included).
    pub inflight: u32,
    /// Planner buffer slots reported free.
    pub planner_buffer_avail: u16,
    /// Command buffer slots reported free.
    pub command_buffer_avail: u16,
    /// Resend episodes observed this run.
    pub resends_detected: u32,
    /// Planner buffer underruns observed this run.
    pub planner_underruns_detected: u32,
    /// Command buffer underruns observed this run.
    pub command_underruns_detected: u32,
    /// Extra send permissions granted this run.
    pub sends_triggered: u32,
    /// Depth of the host's outgoing send queue.
    pub send_queue_depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display_matches_wire_names() {
        assert_eq!(StreamState::WaitingToStart.to_string(), "waiting_to_start");
        assert_eq!(StreamState::Detecting.to_string(), "detecting");
        assert_eq!(StreamState::Ready.to_string(), "ready");
    }

    #[test]
    fn test_governing_blocked_while_draining() {
        assert!(StreamState::Printing.allows_governing());
        assert!(!StreamState::Stopping.allows_governing());
        assert!(!StreamState::Syncing.allows_governing());
        assert!(!StreamState::Disconnected.allows_governing());
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let snapshot = GovernorSnapshot {
            session_id: Some(Uuid::new_v4()),
            planner_buffer_size: 8,
            command_buffer_size: 16,
            inflight_target: 15,
            state: StreamState::Printing,
            enabled: true,
            advanced_ok_detected: true,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GovernorSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
