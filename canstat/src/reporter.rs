//! Condition reporter state machine
//!
//! A node announces exactly one condition at any time. The reporter encodes that rule as
//! a three-state machine and drives the scheduler accordingly:
//!
//! * `Normal`: the heartbeat sentinel (code `0xFFFF`) is broadcast every
//!   [`HEARTBEAT_INTERVAL`].
//! * `Reporting`: an active condition is broadcast every [`ERROR_INTERVAL`]. A newer
//!   `report` overwrites the condition with no history kept; `clear` reverts to `Normal`
//!   only when called with the active code (last-writer-wins), a mismatched code clears
//!   nothing.
//! * `Halted`: terminal. Entered through `stop`, never left. The node refuses all
//!   further state changes but keeps announcing its final condition on the bus for as
//!   long as the outer loop keeps polling the scheduler; failure is propagated by
//!   broadcasting, never by going silent.
//!
//! Every transition swaps the single scheduled entry at the node's status frame ID
//! (remove + re-add), which also resets the entry's period phase. The registry slot at
//! that identifier belongs to the reporter; application code must not touch it.

use canstat_core::{ErrorCode, NodeId, STATUS_DLC, Severity, Status};
use canstat_driver::frame::StandardId;

use crate::scheduler::{ScheduleError, Scheduled, Scheduler, Source};
use crate::time::{Duration, Instant};

/// Heartbeat broadcast period while no condition is active.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(1000);

/// Broadcast period of an active condition.
pub const ERROR_INTERVAL: Duration = Duration::from_millis(300);

impl Source for Status {
    fn fill(&mut self, buf: &mut [u8]) {
        buf.copy_from_slice(&self.encode());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Normal,
    Reporting,
    Halted,
}

/// Per-node condition reporter
///
/// Owns the current condition and the scheduled entry announcing it. All operations
/// complete in bounded time and are serialized through `&mut`; see the crate-level
/// concurrency notes for use from interrupt contexts.
#[derive(Debug)]
pub struct Reporter {
    node: NodeId,
    frame_id: StandardId,
    active: Status,
}

impl Reporter {
    /// Creates the reporter and registers its heartbeat entry.
    ///
    /// A freshly constructed reporter is always fully operational; there is no separate
    /// initialized state. Construction fails only if the registry rejects the heartbeat
    /// entry, which is a setup-time configuration error.
    pub fn new<S, const N: usize>(
        node: NodeId,
        registry: &mut Scheduler<S, N>,
        now: Instant,
    ) -> Result<Reporter, ScheduleError>
    where
        S: Source + From<Status>,
    {
        // NodeId::frame_id always fits 11 bits.
        let frame_id = unwrap!(StandardId::new(node.frame_id()));
        let heartbeat = unwrap!(Scheduled::new(
            frame_id,
            STATUS_DLC,
            HEARTBEAT_INTERVAL,
            S::from(Status::HEARTBEAT),
        ));
        registry.add(heartbeat, now)?;
        info!("reporter up, node {}, status frame 0x{:x}", node.get(), node.frame_id());
        Ok(Reporter {
            node,
            frame_id,
            active: Status::HEARTBEAT,
        })
    }

    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// Identifier of this node's status frame (`node << 5`).
    pub fn frame_id(&self) -> StandardId {
        self.frame_id
    }

    /// The condition currently being broadcast.
    pub fn active(&self) -> Status {
        self.active
    }

    pub fn state(&self) -> State {
        if self.active.halted {
            State::Halted
        } else if self.active.code.is_heartbeat() {
            State::Normal
        } else {
            State::Reporting
        }
    }

    pub fn is_halted(&self) -> bool {
        self.active.halted
    }

    /// Reports a condition without stopping the node.
    ///
    /// Overwrites any previously active condition. Diagnostic data beyond
    /// [`canstat_core::SPECIFIC_DATA_SIZE`] bytes is silently truncated; the ceiling is
    /// part of the wire format. No-op once halted.
    pub fn report<S, const N: usize>(
        &mut self,
        registry: &mut Scheduler<S, N>,
        now: Instant,
        code: ErrorCode,
        severity: Severity,
        data: &[u8],
    ) where
        S: Source + From<Status>,
    {
        if self.is_halted() {
            return;
        }
        self.active = Status::with_data(code, severity, data);
        info!("reporting condition {:?} ({:?})", code, severity);
        self.reschedule(registry, now, ERROR_INTERVAL);
    }

    /// Broadcasts a network-wide safe state request with `reason` as the condition code.
    pub fn trigger_safe_state<S, const N: usize>(
        &mut self,
        registry: &mut Scheduler<S, N>,
        now: Instant,
        reason: ErrorCode,
    ) where
        S: Source + From<Status>,
    {
        self.report(registry, now, reason, Severity::SafeState, &[]);
    }

    /// Clears the active condition and returns to the heartbeat.
    ///
    /// Only the code that is currently active clears anything: whichever condition was
    /// reported last wins until it is cleared by its own code, and a mismatched code is
    /// silently ignored. No-op when no condition is active or once halted.
    pub fn clear<S, const N: usize>(
        &mut self,
        registry: &mut Scheduler<S, N>,
        now: Instant,
        code: ErrorCode,
    ) where
        S: Source + From<Status>,
    {
        if self.state() != State::Reporting {
            return;
        }
        if self.active.code != code {
            trace!("ignoring clear of inactive condition {:?}", code);
            return;
        }
        self.active = Status::HEARTBEAT;
        info!("condition {:?} cleared, back to heartbeat", code);
        self.reschedule(registry, now, HEARTBEAT_INTERVAL);
    }

    /// Reports a condition and halts the node permanently.
    ///
    /// The node enters a fail-safe broadcast mode: every later `report`, `clear` or
    /// `stop` call is a no-op, while [`Scheduler::tick`] keeps announcing this condition
    /// with the halted flag set. The outer loop is expected to keep polling.
    pub fn stop<S, const N: usize>(
        &mut self,
        registry: &mut Scheduler<S, N>,
        now: Instant,
        code: ErrorCode,
        severity: Severity,
        data: &[u8],
    ) where
        S: Source + From<Status>,
    {
        if self.is_halted() {
            return;
        }
        let mut status = Status::with_data(code, severity, data);
        status.halted = true;
        self.active = status;
        error!("node halted by condition {:?} ({:?})", code, severity);
        self.reschedule(registry, now, ERROR_INTERVAL);
    }

    /// Swaps the scheduled entry at the status frame ID for one carrying the current
    /// condition, resetting its period phase.
    fn reschedule<S, const N: usize>(
        &self,
        registry: &mut Scheduler<S, N>,
        now: Instant,
        period: Duration,
    ) where
        S: Source + From<Status>,
    {
        let _ = registry.remove(self.frame_id.into());
        let entry = unwrap!(Scheduled::new(
            self.frame_id,
            STATUS_DLC,
            period,
            S::from(self.active),
        ));
        // Removing first guarantees a free slot and a free identifier.
        unwrap!(registry.add(entry, now));
    }
}
