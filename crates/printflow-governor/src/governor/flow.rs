//! The flow governor
//!
//! Orchestrates every component against the acknowledgment stream: one
//! `FlowGovernor` per connection owns the capacity profile, the lifecycle
//! state, the run statistics, and the trigger/telemetry timers. The host's
//! connection management calls the lifecycle hooks; its receive path calls
//! `handle_response` for every line and applies the returned disposition.
//!
//! Nothing here blocks and nothing raises: every branch yields a defined
//! next state and a disposition for the line. Host action failures are
//! logged and absorbed.

use crate::governor::accounting::inflight_commands;
use crate::governor::capacity::CapacityProfile;
use crate::governor::config::{GovernorConfig, PrefixSyncClassifier, SyncClassifier};
use crate::governor::host::{HostPort, LineDisposition};
use crate::governor::state::{drain_aligned, start_gate_reached};
use crate::governor::stats::RunStatistics;
use crate::governor::telemetry::TelemetryEmitter;
use crate::governor::trigger::{SendDecision, SendTrigger, TriggerContext};
use crate::protocol::ack::{AckParser, AdvancedAck, ParsedAck};
use printflow_core::{
    EventDispatcher, GovernorEvent, GovernorSnapshot, StreamState, TelemetryReport,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Synthetic response delivered while a drain is in progress, so the
/// host's acknowledgment timeout keeps getting fed.
const BUSY_LINE: &str = "echo:busy: processing";

/// Acknowledgment timeout pushed to the host after an ack is consumed
/// during resend recovery.
const CONSUMED_ACK_TIMEOUT: Duration = Duration::from_millis(50);

/// Per-connection flow-control governor
pub struct FlowGovernor {
    config: GovernorConfig,
    sync_classifier: Arc<dyn SyncClassifier>,
    events: EventDispatcher,

    session_id: Option<Uuid>,
    state: StreamState,
    profile: Option<CapacityProfile>,
    advanced_ok_detected: bool,
    last_acked_line: u32,

    /// User intent from settings; survives automatic suspensions.
    configured_enabled: bool,
    /// What the governor is allowed to do right now.
    effective_enabled: bool,

    stats: RunStatistics,
    trigger: SendTrigger,
    telemetry: TelemetryEmitter,
}

impl FlowGovernor {
    /// Create a governor for one connection
    pub fn new(config: GovernorConfig) -> Self {
        let enabled = config.enabled;
        let trigger = SendTrigger::new(config.min_grant_interval());
        let sync_classifier = Arc::new(PrefixSyncClassifier::new(config.sync_command_prefix.clone()));

        Self {
            config,
            sync_classifier,
            events: EventDispatcher::default_with_buffer(),
            session_id: None,
            state: StreamState::Initializing,
            profile: None,
            advanced_ok_detected: false,
            last_acked_line: 0,
            configured_enabled: enabled,
            effective_enabled: enabled,
            stats: RunStatistics::default(),
            trigger,
            telemetry: TelemetryEmitter::default(),
        }
    }

    /// The status channel this governor publishes on
    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// Current lifecycle state
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Calibrated capacity profile, if detection has run
    pub fn profile(&self) -> Option<&CapacityProfile> {
        self.profile.as_ref()
    }

    /// Run statistics for the current run
    pub fn statistics(&self) -> &RunStatistics {
        &self.stats
    }

    /// Whether the governor may currently widen the send window
    pub fn is_governing(&self) -> bool {
        self.effective_enabled && self.profile.is_some() && self.state.allows_governing()
    }

    /// Push refreshed settings from the host's settings store.
    ///
    /// Re-baselines user intent: both enabled flags take the configured
    /// value, and the sync classifier is rebuilt from the configured
    /// prefix (a custom classifier installed via `set_sync_classifier`
    /// must be re-installed after this).
    pub fn apply_config(&mut self, config: GovernorConfig) -> printflow_core::Result<()> {
        config.validate()?;
        self.trigger.set_min_interval(config.min_grant_interval());
        self.configured_enabled = config.enabled;
        self.effective_enabled = config.enabled;
        self.sync_classifier = Arc::new(PrefixSyncClassifier::new(
            config.sync_command_prefix.clone(),
        ));
        self.config = config;
        Ok(())
    }

    /// Install a custom predicate for queue-draining command detection
    pub fn set_sync_classifier(&mut self, classifier: Arc<dyn SyncClassifier>) {
        self.sync_classifier = classifier;
    }

    /// Snapshot of the published governor state
    pub fn snapshot(&self) -> GovernorSnapshot {
        let profile = self.profile.unwrap_or(CapacityProfile {
            planner_buffer_size: 0,
            command_buffer_size: 0,
            inflight_target: 0,
        });
        GovernorSnapshot {
            session_id: self.session_id,
            planner_buffer_size: profile.planner_buffer_size,
            command_buffer_size: profile.command_buffer_size,
            inflight_target: profile.inflight_target,
            state: self.state,
            enabled: self.effective_enabled,
            advanced_ok_detected: self.advanced_ok_detected,
        }
    }

    // ---- lifecycle hooks -------------------------------------------------

    /// A connection attempt is starting
    pub fn on_connecting(&mut self) {
        self.session_id = Some(Uuid::new_v4());
        self.profile = None;
        self.advanced_ok_detected = false;
        self.last_acked_line = 0;
        self.transition(StreamState::Detecting);
    }

    /// The connection was torn down
    pub fn on_disconnected(&mut self) {
        self.profile = None;
        self.session_id = None;
        self.set_status("Disconnected");
        self.transition(StreamState::Disconnected);
    }

    /// A bulk file transfer to the device is starting
    pub fn on_transfer_started(&mut self) {
        self.reset_run();
        self.transition(StreamState::Transferring);
    }

    /// A print job is starting
    pub fn on_print_started(&mut self) {
        self.reset_run();
        self.transition(StreamState::WaitingToStart);
    }

    /// The running job (print or transfer) finished or failed.
    ///
    /// Returns the number of commands still unacknowledged at this point.
    /// The host considers the job done once the last line is handed off,
    /// which can be ahead of the firmware; a non-zero return tells the
    /// collaborator to keep draining before it reuses the line counter.
    pub fn on_job_finished(&mut self, host: &dyn HostPort) -> u32 {
        let leftover = inflight_commands(host.current_line_number(), self.last_acked_line, 0);
        if leftover > 0 {
            tracing::warn!(leftover, "job finished with commands still inflight");
            self.set_status(&format!("Job finished with {} commands inflight", leftover));
        }
        self.set_status("Ready");
        self.transition(StreamState::Ready);
        leftover
    }

    // ---- command-stream interceptors ------------------------------------

    /// Observe a command the host just sent to the firmware
    pub fn on_command_sent(&mut self, command: &str) {
        if !self.stream_active() {
            return;
        }
        if command.trim() == self.config.stop_command {
            tracing::debug!(command, "stop command sent, draining before stop");
            self.effective_enabled = false;
            self.transition(StreamState::Stopping);
        }
    }

    /// Observe a command the host is about to queue
    pub fn on_command_queued(&mut self, command: &str) {
        if !self.stream_active() {
            return;
        }
        if self.sync_classifier.requires_drain(command) {
            tracing::debug!(command, "queue-draining command queued, holding window");
            self.effective_enabled = false;
            self.transition(StreamState::Syncing);
        }
    }

    // ---- the acknowledgment path ----------------------------------------

    /// Process one received response line.
    ///
    /// Called exactly once per line on the host's receive path; the
    /// returned disposition tells the host what to deliver onward.
    pub fn handle_response(&mut self, line: &str, host: &mut dyn HostPort) -> LineDisposition {
        let now = Instant::now();
        let parsed = AckParser::parse(line);

        // Calibration runs against the N0 echo before anything else and
        // only while no profile exists for this session.
        if self.profile.is_none() {
            if let ParsedAck::Advanced(ref ack) = parsed {
                if let Some(profile) = CapacityProfile::from_calibration(ack) {
                    self.install_profile(profile);
                }
            }
        }

        // A resend episode ends on the first line observed with the host
        // flag lowered, whatever kind of line it is.
        if self.stats.resend_ended(host.resend_active()) {
            self.set_status("Resend over, resuming");
        }

        // Lines without both buffer fields, or without a sequence number,
        // carry nothing to account: pass them through untouched.
        let ParsedAck::Advanced(ack) = parsed else {
            return LineDisposition::Pass;
        };
        let Some(acked_line) = ack.line_number else {
            return LineDisposition::Pass;
        };

        self.last_acked_line = acked_line;
        let current_line = host.current_line_number();
        let inflight =
            inflight_commands(current_line, acked_line, host.pending_permission_count());

        if self.state == StreamState::WaitingToStart {
            if start_gate_reached(
                acked_line,
                host.current_z(),
                self.config.start_after_line,
                self.config.start_after_z,
            ) {
                self.effective_enabled = self.configured_enabled;
                self.transition(StreamState::Printing);
            } else {
                self.effective_enabled = false;
            }
        }

        if self.state == StreamState::Stopping {
            if drain_aligned(current_line, acked_line) {
                tracing::debug!(current_line, acked_line, "drain complete, stopped");
                self.transition(StreamState::Stopped);
                return LineDisposition::Pass;
            }
            return LineDisposition::Replace(BUSY_LINE.to_string());
        }

        if self.state == StreamState::Syncing {
            if drain_aligned(current_line, acked_line) {
                tracing::debug!(current_line, acked_line, "sync drain complete");
                self.effective_enabled = self.configured_enabled;
                self.transition(StreamState::Printing);
                return LineDisposition::Pass;
            }
            return LineDisposition::Replace(BUSY_LINE.to_string());
        }

        // Trigger evaluation; only meaningful once calibrated and while
        // the governor is allowed to act.
        let mut decision = SendDecision::Hold;
        if self.is_governing() {
            if host.resend_active() && self.stats.resend_began() {
                self.set_status("Resend detected, backing off");
            }
            let inflight_target = self.active_inflight_target(host);
            decision = self.trigger.decide(
                &TriggerContext {
                    inflight,
                    inflight_target,
                    command_buffer_avail: ack.command_buffer_avail,
                    resend_active: host.resend_active(),
                },
                now,
            );
        }

        if decision == SendDecision::ConsumeAck {
            tracing::warn!(inflight, line, "consuming an acknowledgment to shrink the window");
            if let Err(e) = host.shorten_ack_timeout(CONSUMED_ACK_TIMEOUT) {
                tracing::debug!(error = %e, "host refused the shortened ack timeout");
            }
            if let Err(e) = host.consume_pending_permission() {
                tracing::debug!(error = %e, "no pending permission to consume");
            }
            return LineDisposition::Suppress;
        }

        // Underruns are only meaningful while printing interactively.
        if !host.is_bulk_transfer() {
            if let Some(ref profile) = self.profile {
                self.stats.record_underruns(&ack, profile);
            }
        }

        let report_due = self.telemetry.due(now);

        if decision == SendDecision::Grant {
            match host.grant_send_permission() {
                Ok(()) => {
                    tracing::debug!(inflight, "command buffer headroom, granting a send");
                    self.stats.record_grant();
                    self.trigger.mark_granted(now);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "host rejected the extra send permission");
                }
            }
        }

        if report_due {
            self.publish_report(&ack, current_line, acked_line, inflight, host);
            self.telemetry.mark_reported(now);
        }

        LineDisposition::Pass
    }

    // ---- internals -------------------------------------------------------

    /// States in which the stream is live enough for interception
    fn stream_active(&self) -> bool {
        matches!(
            self.state,
            StreamState::Detected
                | StreamState::Transferring
                | StreamState::WaitingToStart
                | StreamState::Printing
        )
    }

    fn active_inflight_target(&self, host: &dyn HostPort) -> u16 {
        if host.is_bulk_transfer() {
            self.config.transfer_inflight_target
        } else {
            self.profile.map(|p| p.inflight_target).unwrap_or(0)
        }
    }

    fn install_profile(&mut self, profile: CapacityProfile) {
        tracing::info!(
            planner_buffer_size = profile.planner_buffer_size,
            command_buffer_size = profile.command_buffer_size,
            inflight_target = profile.inflight_target,
            "detected firmware buffer sizes"
        );
        self.profile = Some(profile);
        self.advanced_ok_detected = true;
        self.set_status("Buffer sizes detected");
        self.transition(StreamState::Detected);
    }

    fn reset_run(&mut self) {
        self.stats.reset();
        self.effective_enabled = self.configured_enabled;
    }

    fn transition(&mut self, next: StreamState) {
        if self.state == next {
            return;
        }
        tracing::debug!(from = %self.state, to = %next, "stream state transition");
        self.state = next;
        self.events.publish(GovernorEvent::State(self.snapshot()));
    }

    fn set_status(&self, message: &str) {
        self.events
            .publish(GovernorEvent::Status(message.to_string()));
    }

    fn publish_report(
        &self,
        ack: &AdvancedAck,
        current_line: u32,
        acked_line: u32,
        inflight: u32,
        host: &dyn HostPort,
    ) {
        let report = TelemetryReport {
            current_line_number: current_line,
            acked_line_number: acked_line,
            inflight,
            planner_buffer_avail: ack.planner_buffer_avail,
            command_buffer_avail: ack.command_buffer_avail,
            resends_detected: self.stats.resends_detected,
            planner_underruns_detected: self.stats.planner_underruns_detected,
            command_underruns_detected: self.stats.command_underruns_detected,
            sends_triggered: self.stats.sends_triggered,
            send_queue_depth: host.send_queue_depth(),
        };
        tracing::debug!(
            state = %self.state,
            current_line,
            acked_line,
            inflight,
            command_buffer_avail = ack.command_buffer_avail,
            send_queue_depth = report.send_queue_depth,
            "telemetry sample"
        );
        self.events.publish(GovernorEvent::Telemetry(report));
        self.set_status(if self.is_governing() {
            "Active"
        } else {
            "Monitoring"
        });
    }
}
