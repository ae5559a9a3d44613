use canstat::core::{ErrorCode, NodeId, Severity, Status};
use canstat::frame::{ExtendedId, Frame, StandardId};
use canstat::recv::{Inbound, classify};

fn std_frame(raw: u16, data: &[u8]) -> Frame {
    Frame::new(StandardId::new(raw).unwrap(), data).unwrap()
}

#[test]
fn test_safe_state_wins_classification() {
    // The safe-state ID also has a zero message-type field; it must be matched first.
    assert_eq!(classify(&std_frame(0x000, &[])), Inbound::SafeState);
}

#[test]
fn test_peer_status_frame() {
    let status = Status::with_data(ErrorCode::new(0x0200), Severity::Warning, &[7]);
    let frame = std_frame(0x40, &status.encode());

    assert_eq!(
        classify(&frame),
        Inbound::Status {
            source: NodeId::new(2).unwrap(),
            status,
        }
    );
}

#[test]
fn test_heartbeat_is_a_status_frame() {
    let frame = std_frame(0x7E0, &Status::HEARTBEAT.encode());
    assert_eq!(
        classify(&frame),
        Inbound::Status {
            source: NodeId::MAX,
            status: Status::HEARTBEAT,
        }
    );
}

#[test]
fn test_unrelated_frames_left_to_application() {
    // Non-zero message-type field.
    assert_eq!(classify(&std_frame(0x41, &[0; 8])), Inbound::Other);

    // Extended identifiers are outside the status ID scheme.
    let frame = Frame::new(ExtendedId::new(0x40).unwrap(), &[0; 8]).unwrap();
    assert_eq!(classify(&frame), Inbound::Other);

    // Wrong DLC for a status frame.
    assert_eq!(classify(&std_frame(0x40, &[0; 4])), Inbound::Other);
}

#[test]
fn test_malformed_status_payload() {
    let mut bytes = Status::HEARTBEAT.encode();
    bytes[2] |= 0x80; // reserved bits must be zero
    assert_eq!(classify(&std_frame(0x40, &bytes)), Inbound::Other);
}
