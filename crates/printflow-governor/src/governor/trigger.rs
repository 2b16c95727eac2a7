//! Adaptive send trigger
//!
//! The decision function at the heart of the governor: given the inflight
//! count, the target, the firmware's command buffer headroom, and the time
//! since the last grant, decide whether to hand the host one extra send
//! permission beyond what its own flow control would issue.
//!
//! The host's native flow control keeps at most one command outstanding;
//! this trigger widens the effective window up to the firmware's measured
//! capacity, and actively shrinks it again during resend recovery.

use std::time::{Duration, Instant};

/// Inputs for one trigger evaluation, sampled per acknowledgment
#[derive(Debug, Clone, Copy)]
pub struct TriggerContext {
    /// Commands outstanding, pending grants included.
    pub inflight: u32,
    /// Target inflight count (profile target, or the bulk-transfer
    /// override when streaming a file).
    pub inflight_target: u16,
    /// Command buffer slots the firmware reports free.
    pub command_buffer_avail: u16,
    /// Host is currently replaying a resend request.
    pub resend_active: bool,
}

/// What to do with the host's send window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendDecision {
    /// Grant one extra send permission.
    Grant,
    /// Swallow this acknowledgment to shrink the window (resend recovery).
    ConsumeAck,
    /// Leave the window alone.
    Hold,
}

/// Interval-gated send trigger
#[derive(Debug, Clone)]
pub struct SendTrigger {
    min_grant_interval: Duration,
    last_grant: Option<Instant>,
}

impl SendTrigger {
    /// Create a trigger with the configured minimum interval between grants
    pub fn new(min_grant_interval: Duration) -> Self {
        Self {
            min_grant_interval,
            last_grant: None,
        }
    }

    /// Replace the minimum grant interval (settings refresh)
    pub fn set_min_interval(&mut self, interval: Duration) {
        self.min_grant_interval = interval;
    }

    /// Evaluate one acknowledgment.
    ///
    /// During a resend episode the grant timer is pinned to `now`, so
    /// normal granting resumes only a full interval after the episode
    /// clears; while inflight exceeds half the target, the acknowledgment
    /// itself is consumed to drain the window.
    ///
    /// Outside a resend, a grant requires command buffer headroom of more
    /// than two slots (one for this grant, one reserved for the host's own
    /// grant), inflight below target, and the interval elapsed.
    pub fn decide(&mut self, ctx: &TriggerContext, now: Instant) -> SendDecision {
        if ctx.resend_active {
            self.last_grant = Some(now);
            if ctx.inflight > u32::from(ctx.inflight_target) / 2 {
                return SendDecision::ConsumeAck;
            }
            return SendDecision::Hold;
        }

        if ctx.command_buffer_avail > 2
            && ctx.inflight < u32::from(ctx.inflight_target)
            && self.interval_elapsed(now)
        {
            return SendDecision::Grant;
        }

        SendDecision::Hold
    }

    /// Reset the interval timer after a grant was applied
    pub fn mark_granted(&mut self, now: Instant) {
        self.last_grant = Some(now);
    }

    fn interval_elapsed(&self, now: Instant) -> bool {
        match self.last_grant {
            Some(last) => now.duration_since(last) > self.min_grant_interval,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN_INTERVAL: Duration = Duration::from_millis(100);

    fn ctx(inflight: u32, command_buffer_avail: u16) -> TriggerContext {
        TriggerContext {
            inflight,
            inflight_target: 15,
            command_buffer_avail,
            resend_active: false,
        }
    }

    #[test]
    fn test_grants_with_headroom_and_elapsed_interval() {
        let mut trigger = SendTrigger::new(MIN_INTERVAL);
        let now = Instant::now();
        assert_eq!(trigger.decide(&ctx(10, 5), now), SendDecision::Grant);
    }

    #[test]
    fn test_holds_at_or_above_target() {
        let mut trigger = SendTrigger::new(MIN_INTERVAL);
        let now = Instant::now();
        assert_eq!(trigger.decide(&ctx(15, 9), now), SendDecision::Hold);
        assert_eq!(trigger.decide(&ctx(16, 9), now), SendDecision::Hold);
    }

    #[test]
    fn test_holds_without_buffer_headroom() {
        let mut trigger = SendTrigger::new(MIN_INTERVAL);
        let now = Instant::now();
        assert_eq!(trigger.decide(&ctx(3, 2), now), SendDecision::Hold);
        assert_eq!(trigger.decide(&ctx(3, 3), now), SendDecision::Grant);
    }

    #[test]
    fn test_interval_throttles_consecutive_grants() {
        let mut trigger = SendTrigger::new(MIN_INTERVAL);
        let start = Instant::now();

        assert_eq!(trigger.decide(&ctx(4, 8), start), SendDecision::Grant);
        trigger.mark_granted(start);

        let too_soon = start + Duration::from_millis(50);
        assert_eq!(trigger.decide(&ctx(4, 8), too_soon), SendDecision::Hold);

        let later = start + Duration::from_millis(150);
        assert_eq!(trigger.decide(&ctx(4, 8), later), SendDecision::Grant);
    }

    #[test]
    fn test_resend_consumes_above_half_target() {
        let mut trigger = SendTrigger::new(MIN_INTERVAL);
        let now = Instant::now();
        let busy = TriggerContext {
            resend_active: true,
            ..ctx(8, 8)
        };
        assert_eq!(trigger.decide(&busy, now), SendDecision::ConsumeAck);

        let calm = TriggerContext {
            resend_active: true,
            ..ctx(7, 8)
        };
        assert_eq!(trigger.decide(&calm, now), SendDecision::Hold);
    }

    #[test]
    fn test_resend_pins_grant_timer() {
        let mut trigger = SendTrigger::new(MIN_INTERVAL);
        let start = Instant::now();

        let resend = TriggerContext {
            resend_active: true,
            ..ctx(2, 8)
        };
        assert_eq!(trigger.decide(&resend, start), SendDecision::Hold);

        // immediately after the episode the interval has not elapsed
        let just_after = start + Duration::from_millis(10);
        assert_eq!(trigger.decide(&ctx(2, 8), just_after), SendDecision::Hold);

        let recovered = start + Duration::from_millis(200);
        assert_eq!(trigger.decide(&ctx(2, 8), recovered), SendDecision::Grant);
    }
}
