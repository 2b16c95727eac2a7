//! Console harness for the PrintFlow governor.
//!
//! Runs a scripted printer session against a simulated host and firmware:
//! connect, calibrate from the N0 acknowledgment, print a short job, and
//! report what the governor did. Useful for eyeballing governor behavior
//! without a printer on the bench; run with RUST_LOG=debug for the full
//! acknowledgment-by-acknowledgment trace.

use printflow::{
    init_logging, FlowGovernor, GovernorConfig, GovernorEvent, HostPort, LineDisposition,
};
use std::time::Duration;

/// In-memory stand-in for the host controller's connection object.
struct SimulatedHost {
    current_line: u32,
    pending_permissions: u32,
    send_queue_depth: usize,
    resend_active: bool,
    current_z: f64,
    bulk_transfer: bool,
    grants_received: u32,
}

impl SimulatedHost {
    fn new() -> Self {
        Self {
            current_line: 0,
            pending_permissions: 0,
            send_queue_depth: 0,
            resend_active: false,
            current_z: 0.0,
            bulk_transfer: false,
            grants_received: 0,
        }
    }

    /// The host's own send loop: consume one permission, send one line.
    fn send_next(&mut self) {
        self.current_line += 1;
        self.pending_permissions = self.pending_permissions.saturating_sub(1);
    }
}

impl HostPort for SimulatedHost {
    fn current_line_number(&self) -> u32 {
        self.current_line
    }

    fn resend_active(&self) -> bool {
        self.resend_active
    }

    fn pending_permission_count(&self) -> u32 {
        self.pending_permissions
    }

    fn send_queue_depth(&self) -> usize {
        self.send_queue_depth
    }

    fn current_z(&self) -> f64 {
        self.current_z
    }

    fn is_bulk_transfer(&self) -> bool {
        self.bulk_transfer
    }

    fn grant_send_permission(&mut self) -> printflow::Result<()> {
        self.pending_permissions += 1;
        self.grants_received += 1;
        Ok(())
    }

    fn consume_pending_permission(&mut self) -> printflow::Result<()> {
        self.pending_permissions = self.pending_permissions.saturating_sub(1);
        Ok(())
    }

    fn shorten_ack_timeout(&mut self, _timeout: Duration) -> printflow::Result<()> {
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    tracing::info!(version = printflow::VERSION, built = printflow::BUILD_DATE, "printflow harness");

    let config = GovernorConfig {
        // No warm-up gate in the simulation so granting is visible at once
        start_after_line: 0,
        min_grant_interval_secs: 0.0,
        ..Default::default()
    };

    let mut governor = FlowGovernor::new(config);
    let mut events = governor.events().subscribe();
    let mut host = SimulatedHost::new();

    // Connect: the host sends the line-number reset, the firmware answers
    // with the calibration acknowledgment.
    governor.on_connecting();
    host.send_next();
    governor.handle_response("ok N0 P7 B15", &mut host);

    governor.on_print_started();

    // A short job: the firmware acknowledges each line one behind the
    // host, with mid-range buffer availability.
    let planner_avail = 4u16;
    let command_avail = 9u16;
    for _ in 0..100 {
        host.send_next();
        host.current_z += 0.02;
        let ack = format!(
            "ok N{} P{} B{}",
            host.current_line - 1,
            planner_avail,
            command_avail
        );
        match governor.handle_response(&ack, &mut host) {
            LineDisposition::Pass => {}
            other => tracing::info!(?other, "governor intercepted the acknowledgment"),
        }
    }

    let leftover = governor.on_job_finished(&host);

    let snapshot = governor.snapshot();
    let stats = *governor.statistics();

    println!();
    println!("session summary");
    println!("  state:                {}", snapshot.state);
    println!("  planner buffer size:  {}", snapshot.planner_buffer_size);
    println!("  command buffer size:  {}", snapshot.command_buffer_size);
    println!("  inflight target:      {}", snapshot.inflight_target);
    println!("  grants issued:        {}", stats.sends_triggered);
    println!("  grants received:      {}", host.grants_received);
    println!("  resends:              {}", stats.resends_detected);
    println!("  leftover inflight:    {}", leftover);

    let mut event_count = 0usize;
    while let Ok(event) = events.try_recv() {
        event_count += 1;
        if let GovernorEvent::Status(message) = event {
            tracing::debug!(message, "status event");
        }
    }
    println!("  events published:     {}", event_count);

    Ok(())
}
