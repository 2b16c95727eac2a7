//! Inflight accounting
//!
//! Computes, per acknowledgment, how many commands are currently
//! outstanding. No state is kept; the count is recomputed from the host's
//! counters and the acknowledged line number every time.

/// Number of commands sent but not yet acknowledged.
///
/// A pending send permission the host has not consumed yet counts as
/// imminent inflight; leaving it out would let the trigger over-grant.
/// Saturating so a stale acknowledgment arriving after a resend rewound
/// the host's line counter cannot underflow.
pub fn inflight_commands(current_line: u32, acked_line: u32, pending_permissions: u32) -> u32 {
    current_line.saturating_sub(acked_line) + pending_permissions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_permissions_count_as_inflight() {
        assert_eq!(inflight_commands(100, 97, 1), 4);
    }

    #[test]
    fn test_fully_acknowledged_stream_is_zero() {
        assert_eq!(inflight_commands(42, 42, 0), 0);
    }

    #[test]
    fn test_stale_ack_saturates() {
        assert_eq!(inflight_commands(5, 9, 1), 1);
    }
}
