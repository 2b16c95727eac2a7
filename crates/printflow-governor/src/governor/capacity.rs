//! Buffer capacity calibration
//!
//! Derives the firmware's planner and command buffer sizes from the very
//! first acknowledgment of a session: the response to the line-number
//! reset (`N0`) that hosts send on connect. Once a profile exists it is
//! immutable until the connection is torn down.

use crate::protocol::ack::AdvancedAck;
use serde::{Deserialize, Serialize};

/// Ceiling for the derived inflight target.
///
/// Hosts keep a bounded resend history, so the window must stay well below
/// that bound even on firmware with very large command buffers.
pub const INFLIGHT_TARGET_MAX: u16 = 255;

/// Calibrated firmware buffer capacities for one connection session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityProfile {
    /// Total planner (motion segment) buffer slots.
    pub planner_buffer_size: u16,
    /// Total command buffer slots.
    pub command_buffer_size: u16,
    /// How many commands the governor aims to keep inflight.
    pub inflight_target: u16,
}

impl CapacityProfile {
    /// Derive a profile from the calibration acknowledgment.
    ///
    /// Only the ack echoing line number 0 qualifies. The firmware reports
    /// slots free with the just-received command still occupying one, so
    /// true capacity is one more than the reported availability.
    pub fn from_calibration(ack: &AdvancedAck) -> Option<Self> {
        if ack.line_number != Some(0) {
            return None;
        }

        let planner_buffer_size = ack.planner_buffer_avail.saturating_add(1);
        let command_buffer_size = ack.command_buffer_avail.saturating_add(1);

        Some(Self {
            planner_buffer_size,
            command_buffer_size,
            inflight_target: (command_buffer_size - 1).min(INFLIGHT_TARGET_MAX),
        })
    }
}
