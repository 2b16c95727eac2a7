//! Lifecycle gates for the stream state machine
//!
//! Pure predicates consumed by the governor's acknowledgment path. The
//! `StreamState` enum itself lives in `printflow-core`; this module holds
//! the two alignment/gating rules that decide when a drain completes and
//! when a print leaves its warm-up phase.

/// Whether a draining state (stopping or syncing) has fully caught up.
///
/// The firmware has processed everything once it acknowledges the line
/// just before the host's next unsent line number.
pub fn drain_aligned(current_line: u32, acked_line: u32) -> bool {
    current_line.wrapping_sub(1) == acked_line
}

/// Whether the start-after gate is open.
///
/// Both thresholds must be met: the acknowledged line number and the
/// current Z height. Until then the governor stays suspended and the
/// first layers run at the host's native pace.
pub fn start_gate_reached(
    acked_line: u32,
    current_z: f64,
    start_after_line: u32,
    start_after_z: f64,
) -> bool {
    acked_line >= start_after_line && current_z >= start_after_z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_alignment() {
        assert!(drain_aligned(101, 100));
        assert!(!drain_aligned(101, 98));
        assert!(!drain_aligned(101, 101));
    }

    #[test]
    fn test_start_gate_needs_both_thresholds() {
        assert!(!start_gate_reached(49, 5.0, 50, 0.0));
        assert!(!start_gate_reached(50, 0.1, 50, 0.2));
        assert!(start_gate_reached(50, 0.2, 50, 0.2));
        assert!(start_gate_reached(120, 9.5, 50, 0.2));
    }
}
