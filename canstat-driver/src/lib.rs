//! Canstat driver interface
//!
//! The crate provides an interface between a CAN device driver and the Canstat stack.
//! Limited scope facilitates compatibility across versions. Driver crates should depend
//! on this crate. Canstat stack users should depend on the `canstat` crate instead.
//!
//! The stack is polled cooperatively and never blocks, so the interface is deliberately
//! synchronous: a [`Transmitter`] makes exactly one enqueue attempt per call and reports
//! whether the hardware accepted the frame. A rejected frame is the driver's way of
//! exerting back-pressure; the stack defers the remaining work to its next poll instead
//! of hammering a busy mailbox.
//!
//! Peripheral bring-up (clocks, filters, interrupts, bus start) is the driver's own
//! concern and must be completed before the stack is used.
#![no_std]

pub mod frame;

pub mod time {
    pub use embassy_time::{Duration, Instant};
}

use frame::Frame;

/// The hardware refused the frame, typically because all transmit mailboxes are busy.
///
/// Not an error condition: the caller is expected to retry on a later poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rejected;

/// Single-attempt frame transmission
///
/// Implementations must be non-blocking or bounded-time and must not retry internally.
/// The transmit resource is single-owner-at-a-time: the stack checks the result of each
/// attempt before issuing another.
pub trait Transmitter {
    fn transmit(&mut self, frame: &Frame) -> Result<(), Rejected>;
}

impl<T: Transmitter + ?Sized> Transmitter for &mut T {
    fn transmit(&mut self, frame: &Frame) -> Result<(), Rejected> {
        T::transmit(self, frame)
    }
}
