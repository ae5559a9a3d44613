//! # Canstat
//!
//! This library implements periodic status broadcasting for nodes on a classic CAN bus in
//! no_std environments. Each node repeatedly announces exactly one condition: a healthy
//! heartbeat, an active error, or a terminal halt. The stack uses fixed-capacity storage,
//! requiring no dynamic memory allocation, and is driven entirely by cooperative polling;
//! it spawns no tasks and takes no locks.
//!
//! ## Architecture
//!
//! ```text
//!  report / clear / stop          poll loop
//!          │                          │
//!          ▼                          ▼
//!    ┌──────────┐  swap entry   ┌───────────┐  transmit   ┌─────────────┐
//!    │ Reporter ├──────────────►│ Scheduler ├────────────►│ Transmitter │
//!    └──────────┘               └───────────┘             └─────────────┘
//! ```
//!
//! Components:
//! * _Scheduler_ is a registry of periodic transmissions. Each entry pairs a CAN
//!   identifier with a period and a payload [`Source`](scheduler::Source); `tick` scans
//!   the registry once and hands due frames to the driver. It knows nothing about
//!   condition semantics.
//! * _Reporter_ is the condition state machine layered on top. It owns the single
//!   scheduled entry at the node's status frame ID and rewrites that entry's payload and
//!   period on every transition: heartbeats every second while healthy, the active
//!   condition every 300 ms while reporting or halted.
//! * _Transmitter_ is the bounded-time, single-attempt transmit interface a CAN
//!   peripheral driver implements. A rejected frame defers the rest of the scan to the
//!   next poll.
//!
//! The 8-byte payload layout is defined in [`canstat_core::Status`] and is bit-exact
//! across the network. Inbound frames are classified, never acted upon, by [`recv::classify`].
//!
//! ## Concurrency model
//!
//! All mutation of a [`Scheduler`](scheduler::Scheduler) or
//! [`Reporter`](reporter::Reporter) goes through `&mut`, so serialization is enforced by
//! construction rather than by locks in the hot path. When conditions are detected in an
//! interrupt context, the handler should queue a request (e.g., through an atomic flag)
//! and let the polling context make the actual `report`/`clear` call.
//!
//! ## Examples
//!
//! ```
//! use canstat::core::{ErrorCode, NodeId, Severity, Status};
//! use canstat::frame::Frame;
//! use canstat::reporter::Reporter;
//! use canstat::scheduler::Scheduler;
//! use canstat::time::Instant;
//! use canstat::{Rejected, Transmitter};
//!
//! struct Mailbox;
//!
//! impl Transmitter for Mailbox {
//!     fn transmit(&mut self, frame: &Frame) -> Result<(), Rejected> {
//!         println!("-> {:?}", frame);
//!         Ok(())
//!     }
//! }
//!
//! let mut registry: Scheduler<Status> = Scheduler::new();
//! let mut reporter = Reporter::new(
//!     NodeId::new(2).unwrap(),
//!     &mut registry,
//!     Instant::from_millis(0),
//! )
//! .unwrap();
//!
//! // The polling loop drives all transmissions.
//! registry.tick(&mut Mailbox, Instant::from_millis(1001));
//!
//! // A reported condition replaces the heartbeat until cleared by its own code.
//! let now = Instant::from_millis(1500);
//! reporter.report(&mut registry, now, ErrorCode::new(0x0100), Severity::Warning, &[]);
//! reporter.clear(&mut registry, now, ErrorCode::new(0x0100));
//! ```
#![no_std]

pub use canstat_core as core;
pub use canstat_driver::{Rejected, Transmitter, frame, time};

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod recv;
pub mod reporter;
pub mod scheduler;
