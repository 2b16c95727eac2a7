//! Host collaborator contract
//!
//! The governor never touches the serial link, the send queue, or the
//! resend machinery itself; it observes and steers them through this
//! trait. Implementations wrap whatever connection object the host
//! application maintains per printer.
//!
//! All methods are synchronous and must not block: the governor is called
//! inline on the acknowledgment delivery path.

use std::time::Duration;

/// What the governor tells the host to do with a received response line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineDisposition {
    /// Deliver the line to the host unmodified.
    Pass,
    /// Deliver this synthetic line instead (keeps host timeouts alive
    /// while a drain is in progress).
    Replace(String),
    /// Swallow the line entirely (eats an excess acknowledgment during
    /// resend recovery).
    Suppress,
}

/// Per-connection view of the host controller
pub trait HostPort {
    /// Line number of the most recently sent command.
    fn current_line_number(&self) -> u32;

    /// Whether the host is currently replaying a firmware resend request.
    fn resend_active(&self) -> bool;

    /// Send permissions granted but not yet consumed by the send loop.
    fn pending_permission_count(&self) -> u32;

    /// Depth of the host's outgoing send queue.
    fn send_queue_depth(&self) -> usize;

    /// Current Z height, in machine units.
    fn current_z(&self) -> f64;

    /// Whether the session is a bulk file transfer rather than an
    /// interactive print.
    fn is_bulk_transfer(&self) -> bool;

    /// Grant one send permission beyond the host's own flow control.
    fn grant_send_permission(&mut self) -> printflow_core::Result<()>;

    /// Consume one pending permission without a send.
    fn consume_pending_permission(&mut self) -> printflow_core::Result<()>;

    /// Shorten the host's next acknowledgment timeout.
    fn shorten_ack_timeout(&mut self, timeout: Duration) -> printflow_core::Result<()>;
}
