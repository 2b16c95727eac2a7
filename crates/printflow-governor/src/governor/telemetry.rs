//! Telemetry pacing
//!
//! Rate-limits the periodic telemetry report so a fast acknowledgment
//! stream (hundreds per second on short moves) does not flood the status
//! channel. Reports are due at most once per interval; state transitions
//! and calibration publish through the dispatcher directly and are not
//! subject to this limit.

use std::time::{Duration, Instant};

/// Default spacing between telemetry reports.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Interval gate for telemetry emission
#[derive(Debug, Clone)]
pub struct TelemetryEmitter {
    interval: Duration,
    last_report: Option<Instant>,
}

impl TelemetryEmitter {
    /// Create an emitter with the given report spacing
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_report: None,
        }
    }

    /// Whether a report is due at `now`
    pub fn due(&self, now: Instant) -> bool {
        match self.last_report {
            Some(last) => now.duration_since(last) > self.interval,
            None => true,
        }
    }

    /// Record that a report was just published
    pub fn mark_reported(&mut self, now: Instant) {
        self.last_report = Some(now);
    }
}

impl Default for TelemetryEmitter {
    fn default() -> Self {
        Self::new(REPORT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_report_is_due_immediately() {
        let emitter = TelemetryEmitter::default();
        assert!(emitter.due(Instant::now()));
    }

    #[test]
    fn test_reports_are_spaced_by_interval() {
        let mut emitter = TelemetryEmitter::new(Duration::from_secs(1));
        let start = Instant::now();

        emitter.mark_reported(start);
        assert!(!emitter.due(start + Duration::from_millis(500)));
        assert!(emitter.due(start + Duration::from_millis(1500)));
    }
}
