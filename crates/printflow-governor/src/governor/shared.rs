//! Shared governor handle
//!
//! Lifecycle events (connect, disconnect, job start/stop) typically arrive
//! from a different execution context than acknowledgment delivery. This
//! wrapper serializes both paths onto one `FlowGovernor` with a mutex, so
//! hosts can clone a handle into each callback.

use crate::governor::flow::FlowGovernor;
use crate::governor::host::{HostPort, LineDisposition};
use parking_lot::Mutex;
use printflow_core::{EventDispatcher, GovernorSnapshot};
use std::sync::Arc;

/// Clonable, thread-safe handle to a per-connection governor
#[derive(Clone)]
pub struct SharedGovernor {
    inner: Arc<Mutex<FlowGovernor>>,
}

impl SharedGovernor {
    /// Wrap a governor for cross-context use
    pub fn new(governor: FlowGovernor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(governor)),
        }
    }

    /// Process one received response line
    pub fn handle_response(&self, line: &str, host: &mut dyn HostPort) -> LineDisposition {
        self.inner.lock().handle_response(line, host)
    }

    /// A connection attempt is starting
    pub fn on_connecting(&self) {
        self.inner.lock().on_connecting();
    }

    /// The connection was torn down
    pub fn on_disconnected(&self) {
        self.inner.lock().on_disconnected();
    }

    /// A bulk file transfer is starting
    pub fn on_transfer_started(&self) {
        self.inner.lock().on_transfer_started();
    }

    /// A print job is starting
    pub fn on_print_started(&self) {
        self.inner.lock().on_print_started();
    }

    /// The running job finished or failed; returns leftover inflight
    pub fn on_job_finished(&self, host: &dyn HostPort) -> u32 {
        self.inner.lock().on_job_finished(host)
    }

    /// Observe a command the host just sent
    pub fn on_command_sent(&self, command: &str) {
        self.inner.lock().on_command_sent(command);
    }

    /// Observe a command the host is about to queue
    pub fn on_command_queued(&self, command: &str) {
        self.inner.lock().on_command_queued(command);
    }

    /// Snapshot of the published governor state
    pub fn snapshot(&self) -> GovernorSnapshot {
        self.inner.lock().snapshot()
    }

    /// The status channel the wrapped governor publishes on
    pub fn events(&self) -> EventDispatcher {
        self.inner.lock().events().clone()
    }

    /// Run a closure against the locked governor
    pub fn with<R>(&self, f: impl FnOnce(&mut FlowGovernor) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
