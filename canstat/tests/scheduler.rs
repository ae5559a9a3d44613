use canstat::frame::{ExtendedId, Frame, Id, StandardId};
use canstat::scheduler::{ScheduleError, Scheduled, Scheduler, Source, UnknownId};
use canstat::time::{Duration, Instant};
use canstat::{Rejected, Transmitter};

const PERIOD: Duration = Duration::from_millis(100);

/// Records accepted frames, rejecting everything past `accept_limit`.
#[derive(Default)]
struct Bus {
    frames: Vec<Frame>,
    accept_limit: Option<usize>,
}

impl Transmitter for Bus {
    fn transmit(&mut self, frame: &Frame) -> Result<(), Rejected> {
        if self.accept_limit.is_some_and(|limit| self.frames.len() >= limit) {
            return Err(Rejected);
        }
        self.frames.push(*frame);
        Ok(())
    }
}

/// Fills the payload with an incrementing marker byte.
struct Marker(u8);

impl Source for Marker {
    fn fill(&mut self, buf: &mut [u8]) {
        self.0 += 1;
        if let Some(first) = buf.first_mut() {
            *first = self.0;
        }
    }
}

fn ms(value: u64) -> Instant {
    Instant::from_millis(value)
}

fn std_id(raw: u16) -> Id {
    StandardId::new(raw).unwrap().into()
}

fn entry(raw: u16) -> Scheduled<Marker> {
    Scheduled::new(StandardId::new(raw).unwrap(), 2, PERIOD, Marker(0)).unwrap()
}

#[test]
fn test_duplicate_id_rejected() {
    let mut registry: Scheduler<Marker> = Scheduler::new();
    registry.add(entry(0x40), ms(0)).unwrap();

    assert_eq!(
        registry.add(entry(0x40), ms(0)),
        Err(ScheduleError::IdOccupied)
    );
    assert_eq!(registry.len(), 1);

    // Same raw identifier in the extended space is a different identifier.
    let extended =
        Scheduled::new(ExtendedId::new(0x40).unwrap(), 2, PERIOD, Marker(0)).unwrap();
    registry.add(extended, ms(0)).unwrap();
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_zero_period_rejected() {
    let mut registry: Scheduler<Marker> = Scheduler::new();
    let bad = Scheduled::new(
        StandardId::new(0x40).unwrap(),
        2,
        Duration::from_millis(0),
        Marker(0),
    )
    .unwrap();
    assert_eq!(registry.add(bad, ms(0)), Err(ScheduleError::ZeroPeriod));
    assert!(registry.is_empty());
}

#[test]
fn test_capacity_keeps_headroom() {
    let mut registry: Scheduler<Marker, 4> = Scheduler::new();
    for raw in 0..3 {
        registry.add(entry(raw), ms(0)).unwrap();
    }
    assert_eq!(registry.add(entry(3), ms(0)), Err(ScheduleError::NoSlotLeft));
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_oversized_dlc_rejected() {
    assert!(Scheduled::new(StandardId::new(1).unwrap(), 9, PERIOD, Marker(0)).is_none());
}

#[test]
fn test_nothing_due_nothing_sent() {
    let mut registry: Scheduler<Marker> = Scheduler::new();
    let mut bus = Bus::default();
    registry.add(entry(0x40), ms(0)).unwrap();

    assert_eq!(registry.tick(&mut bus, ms(50)), 0);
    assert!(bus.frames.is_empty());
}

#[test]
fn test_due_boundary_is_strict() {
    let mut registry: Scheduler<Marker> = Scheduler::new();
    let mut bus = Bus::default();
    registry.add(entry(0x40), ms(0)).unwrap();

    // Due exactly at the boundary waits one more millisecond.
    assert_eq!(registry.tick(&mut bus, ms(100)), 0);
    assert_eq!(registry.tick(&mut bus, ms(101)), 1);

    // The stamp moved to the transmit time, so the next boundary is 201.
    assert_eq!(registry.tick(&mut bus, ms(201)), 0);
    assert_eq!(registry.tick(&mut bus, ms(202)), 1);
    assert_eq!(bus.frames.len(), 2);
}

#[test]
fn test_payload_buffer_zeroed_and_sized() {
    let mut registry: Scheduler<Marker> = Scheduler::new();
    let mut bus = Bus::default();
    registry.add(entry(0x40), ms(0)).unwrap();

    registry.tick(&mut bus, ms(101));
    let frame = &bus.frames[0];
    assert_eq!(frame.dlc(), 2);
    // The marker wrote byte 0; byte 1 stays zero-initialized.
    assert_eq!(&frame.data[..], &[1, 0]);
}

#[test]
fn test_rejected_transmit_aborts_scan() {
    let mut registry: Scheduler<Marker> = Scheduler::new();
    registry.add(entry(0x40), ms(0)).unwrap();
    registry.add(entry(0x60), ms(0)).unwrap();

    // The mailbox accepts one frame, then exerts back-pressure.
    let mut bus = Bus {
        accept_limit: Some(1),
        ..Bus::default()
    };
    assert_eq!(registry.tick(&mut bus, ms(101)), 1);
    assert_eq!(bus.frames[0].id, std_id(0x40));

    // The deferred entry kept its stamp and goes out on the next poll.
    bus.accept_limit = None;
    assert_eq!(registry.tick(&mut bus, ms(102)), 1);
    assert_eq!(bus.frames[1].id, std_id(0x60));

    // The first entry was not double-sent.
    assert_eq!(bus.frames.len(), 2);
}

#[test]
fn test_remove_unknown_id() {
    let mut registry: Scheduler<Marker> = Scheduler::new();
    registry.add(entry(0x40), ms(0)).unwrap();
    assert_eq!(registry.remove(std_id(0x41)), Err(UnknownId));
    // Standard and extended spaces never match each other.
    assert_eq!(
        registry.remove(ExtendedId::new(0x40).unwrap().into()),
        Err(UnknownId)
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_remove_preserves_scan_order() {
    let mut registry: Scheduler<Marker> = Scheduler::new();
    let mut bus = Bus::default();
    for raw in [0x20, 0x40, 0x60] {
        registry.add(entry(raw), ms(0)).unwrap();
    }
    registry.remove(std_id(0x40)).unwrap();

    assert_eq!(registry.tick(&mut bus, ms(101)), 2);
    let ids: Vec<Id> = bus.frames.iter().map(|frame| frame.id).collect();
    assert_eq!(ids, [std_id(0x20), std_id(0x60)]);
}
