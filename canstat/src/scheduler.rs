//! Scheduled-message registry and periodic transmit engine
//!
//! The registry tracks which frames must be re-sent at fixed intervals. Entries are kept
//! in insertion order and scanned round-robin by [`Scheduler::tick`]; order carries no
//! meaning beyond that fairness. Identifiers are unique per registry, with the standard
//! and extended ID spaces counted as disjoint.
//!
//! Capacity is fixed at build time through the const generic parameter. One slot is
//! always kept free as headroom; exceeding that ceiling is a configuration mistake of
//! the kind that should abort setup, not a condition to recover from at runtime.

use canstat_driver::frame::{Frame, Id, MAX_DLC};
use canstat_driver::{Rejected, Transmitter};
use heapless::Vec;

use crate::time::{Duration, Instant};

/// Default registry capacity.
pub const MAX_MESSAGES: usize = 32;

/// Produces the payload of a scheduled frame
///
/// Called just before every transmission with a zero-initialized buffer of the entry's
/// DLC length. Implementations re-read whatever state the payload reflects, so a frame
/// always carries current data no matter how long it sat in the registry.
pub trait Source {
    fn fill(&mut self, buf: &mut [u8]);
}

/// One periodic transmission task
pub struct Scheduled<S> {
    id: Id,
    dlc: u8,
    period: Duration,
    last_sent: Instant,
    source: S,
}

impl<S> Scheduled<S> {
    /// Creates a task transmitting `dlc` payload bytes every `period`.
    ///
    /// Returns `None` if `dlc` exceeds a classic CAN frame. The period is validated when
    /// the task is added to a registry.
    pub fn new(id: impl Into<Id>, dlc: usize, period: Duration, source: S) -> Option<Scheduled<S>> {
        if dlc > MAX_DLC {
            return None;
        }
        Some(Scheduled {
            id: id.into(),
            dlc: dlc as u8,
            period,
            last_sent: Instant::from_ticks(0),
            source,
        })
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn dlc(&self) -> usize {
        usize::from(self.dlc)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Timestamp of the last transmission, or of registration if none happened yet.
    pub fn last_sent(&self) -> Instant {
        self.last_sent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// The registry is at capacity. Setup-time fatal.
    NoSlotLeft,
    /// A zero period would make the entry due on every tick. Setup-time fatal.
    ZeroPeriod,
    /// Another entry in the same ID space already uses this identifier.
    IdOccupied,
}

/// The identifier matched no entry in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownId;

/// Fixed-capacity registry of periodic transmissions
pub struct Scheduler<S, const N: usize = MAX_MESSAGES> {
    entries: Vec<Scheduled<S>, N>,
}

impl<S, const N: usize> Scheduler<S, N> {
    pub const fn new() -> Self {
        Scheduler {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: Id) -> Option<&Scheduled<S>> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.get(id).is_some()
    }

    /// Registers a task and stamps its `last_sent` to `now`.
    ///
    /// A failed add leaves the registry unchanged. Capacity and period problems are
    /// reported before a duplicate identifier, matching their fatal-at-setup nature.
    pub fn add(&mut self, mut entry: Scheduled<S>, now: Instant) -> Result<(), ScheduleError> {
        // One slot stays free as headroom.
        if self.entries.len() + 1 >= N {
            return Err(ScheduleError::NoSlotLeft);
        }
        if entry.period.as_ticks() == 0 {
            return Err(ScheduleError::ZeroPeriod);
        }
        if self.contains(entry.id) {
            return Err(ScheduleError::IdOccupied);
        }

        entry.last_sent = now;
        debug!(
            "scheduled 0x{:x} every {} ms, {} entries",
            raw_id(entry.id),
            entry.period.as_millis(),
            self.entries.len() + 1
        );
        if self.entries.push(entry).is_err() {
            // Guarded by the headroom check above.
            unreachable!();
        }
        Ok(())
    }

    /// Unregisters the task with the given identifier, preserving the relative order of
    /// the remaining entries.
    pub fn remove(&mut self, id: Id) -> Result<(), UnknownId> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(UnknownId)?;
        self.entries.remove(index);
        debug!("unscheduled 0x{:x}, {} entries", raw_id(id), self.entries.len());
        Ok(())
    }
}

impl<S: Source, const N: usize> Scheduler<S, N> {
    /// Scans the registry once and transmits every due entry. Returns the number of
    /// frames the driver accepted.
    ///
    /// An entry is due strictly after `last_sent + period`; a frame due exactly at the
    /// boundary waits one more tick. On success `last_sent` is refreshed to the transmit
    /// time, so phase drift does not accumulate across skipped polls. A rejected
    /// transmit aborts the remaining scan: a busy mailbox must not be hammered with
    /// further attempts within the same poll, and untouched `last_sent` stamps make the
    /// deferred entries due again on the next one.
    pub fn tick(&mut self, can: &mut impl Transmitter, now: Instant) -> usize {
        let mut accepted = 0;
        for entry in self.entries.iter_mut() {
            if now <= entry.last_sent + entry.period {
                continue;
            }

            let mut buf = [0; MAX_DLC];
            let payload = &mut buf[..usize::from(entry.dlc)];
            entry.source.fill(payload);
            // DLC was validated at construction.
            let frame = unwrap!(Frame::new(entry.id, payload));

            match can.transmit(&frame) {
                Ok(()) => {
                    entry.last_sent = now;
                    accepted += 1;
                }
                Err(Rejected) => {
                    trace!("transmit of 0x{:x} rejected, deferring scan", raw_id(entry.id));
                    break;
                }
            }
        }
        accepted
    }
}

impl<S, const N: usize> Default for Scheduler<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

fn raw_id(id: Id) -> u32 {
    match id {
        Id::Standard(id) => u32::from(id.as_raw()),
        Id::Extended(id) => id.as_raw(),
    }
}
