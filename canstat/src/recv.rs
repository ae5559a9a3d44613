//! Inbound frame classification
//!
//! The receive path typically executes in an interrupt context, separate from the
//! polling context that owns the scheduler and reporter. This module therefore only
//! classifies frames and changes no state: the handler decides what a safe-state
//! broadcast or a peer's error means for this node, usually by queueing a request for
//! the polling context to act on.

use canstat_core::{NodeId, SAFE_STATE_FRAME_ID, STATUS_DLC, Status};
use canstat_driver::frame::{Frame, Id};

/// What an inbound frame means to the status network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Inbound {
    /// The network-wide safe state broadcast (identifier 0x000, wins every
    /// arbitration). React immediately.
    SafeState,
    /// A peer's status frame, heartbeat and error alike.
    Status { source: NodeId, status: Status },
    /// Not a status-network frame. Left to the application.
    Other,
}

/// Classifies an inbound frame. Performs no state change.
///
/// Identifiers are matched highest priority first: the safe-state ID, then any standard
/// identifier with a zero message-type field, which is a peer status frame. Malformed
/// status payloads fall through to [`Inbound::Other`].
pub fn classify(frame: &Frame) -> Inbound {
    let Id::Standard(id) = frame.id else {
        return Inbound::Other;
    };
    let raw = id.as_raw();
    if raw == SAFE_STATE_FRAME_ID {
        return Inbound::SafeState;
    }
    if raw & 0x1F != 0 || frame.dlc() != STATUS_DLC {
        return Inbound::Other;
    }

    let mut bytes = [0; STATUS_DLC];
    bytes.copy_from_slice(&frame.data);
    match Status::decode(&bytes) {
        Ok(status) => Inbound::Status {
            source: NodeId::from_truncating((raw >> 5) as u8),
            status,
        },
        Err(_) => {
            warn!("malformed status frame from 0x{:x}", raw);
            Inbound::Other
        }
    }
}
