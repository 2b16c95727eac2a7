//! Underrun and resend statistics
//!
//! Diagnostic counters for one run (a transfer or a print). Underruns are
//! recorded when a buffer's reported availability sits at its ceiling,
//! meaning the firmware drained everything it had. Resends are counted
//! once per episode via an edge-detected flag, no matter how many
//! acknowledgments arrive while the host is still retransmitting.

use crate::governor::capacity::CapacityProfile;
use crate::protocol::ack::AdvancedAck;
use serde::Serialize;

/// Counters for the current run, reset when a transfer or print starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Times the command buffer was observed starved.
    pub command_underruns_detected: u32,
    /// Times the planner buffer was observed starved.
    pub planner_underruns_detected: u32,
    /// Resend episodes observed.
    pub resends_detected: u32,
    /// Extra send permissions granted.
    pub sends_triggered: u32,
    /// Currently inside a resend episode.
    #[serde(skip)]
    in_resend: bool,
}

impl RunStatistics {
    /// Zero every counter and clear the resend flag
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record underruns for one acknowledgment.
    ///
    /// Availability equal to `size - 1` is the maximum the firmware ever
    /// reports (one slot is held by the command being acknowledged), so
    /// hitting it means the buffer ran dry.
    pub fn record_underruns(&mut self, ack: &AdvancedAck, profile: &CapacityProfile) {
        if ack.command_buffer_avail == profile.command_buffer_size - 1 {
            self.command_underruns_detected += 1;
        }
        if ack.planner_buffer_avail == profile.planner_buffer_size - 1 {
            self.planner_underruns_detected += 1;
        }
    }

    /// Note that the host reports a resend in progress.
    ///
    /// Returns true only on the rising edge; the episode counter moves
    /// once no matter how long the host keeps the flag up.
    pub fn resend_began(&mut self) -> bool {
        if self.in_resend {
            return false;
        }
        self.in_resend = true;
        self.resends_detected += 1;
        true
    }

    /// Observe the host's resend flag on an arbitrary received line.
    ///
    /// Returns true when a previously active episode just ended.
    pub fn resend_ended(&mut self, resend_active: bool) -> bool {
        if self.in_resend && !resend_active {
            self.in_resend = false;
            return true;
        }
        false
    }

    /// Whether a resend episode is currently active
    pub fn in_resend(&self) -> bool {
        self.in_resend
    }

    /// Count one granted send permission
    pub fn record_grant(&mut self) {
        self.sends_triggered += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CapacityProfile {
        CapacityProfile {
            planner_buffer_size: 8,
            command_buffer_size: 16,
            inflight_target: 15,
        }
    }

    fn ack(planner: u16, command: u16) -> AdvancedAck {
        AdvancedAck {
            line_number: Some(1),
            planner_buffer_avail: planner,
            command_buffer_avail: command,
        }
    }

    #[test]
    fn test_underruns_counted_at_ceiling_only() {
        let mut stats = RunStatistics::default();
        stats.record_underruns(&ack(7, 15), &profile());
        assert_eq!(stats.planner_underruns_detected, 1);
        assert_eq!(stats.command_underruns_detected, 1);

        stats.record_underruns(&ack(3, 10), &profile());
        assert_eq!(stats.planner_underruns_detected, 1);
        assert_eq!(stats.command_underruns_detected, 1);
    }

    #[test]
    fn test_resend_counted_once_per_episode() {
        let mut stats = RunStatistics::default();

        assert!(stats.resend_began());
        assert!(!stats.resend_began());
        assert!(!stats.resend_began());
        assert_eq!(stats.resends_detected, 1);

        // flag stays up: no end observed
        assert!(!stats.resend_ended(true));
        assert!(stats.in_resend());

        // flag drops: episode over, counter untouched
        assert!(stats.resend_ended(false));
        assert!(!stats.in_resend());
        assert_eq!(stats.resends_detected, 1);

        // a later episode counts again
        assert!(stats.resend_began());
        assert_eq!(stats.resends_detected, 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut stats = RunStatistics::default();
        stats.record_grant();
        stats.resend_began();
        stats.reset();
        assert_eq!(stats, RunStatistics::default());
        assert!(!stats.in_resend());
    }
}
