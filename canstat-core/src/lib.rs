//! Canstat protocol core data types
//!
//! This crate provides basic data type definitions and the status frame wire codec used by
//! other Canstat crates. Canstat users should not depend on this crate directly. Use the
//! `canstat::core` reexport instead.
#![no_std]

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidValue;

/// Number of diagnostic data bytes carried by a status frame.
///
/// The ceiling is bound to the wire format (bytes 3..8 of the payload), not to any buffer
/// size. Longer diagnostic data is truncated, never rejected.
pub const SPECIFIC_DATA_SIZE: usize = 5;

/// Data length code of every status frame, heartbeat and error alike.
pub const STATUS_DLC: usize = 8;

/// Raw standard identifier of the network-wide safe state frame (highest bus priority).
pub const SAFE_STATE_FRAME_ID: u16 = 0x000;

/// Node identifier on the status network
///
/// The node occupies the upper 6 bits of the 11-bit standard CAN identifier; the lower
/// 5 bits form a per-node message-type field. Message type 0 is the status frame, so the
/// status frame ID of a node is `node << 5`. Lower node numbers win bus arbitration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeId(u8);

impl NodeId {
    pub const MAX: NodeId = NodeId(0x3F);

    pub const fn new(value: u8) -> Option<NodeId> {
        if value <= Self::MAX.0 {
            Some(NodeId(value))
        } else {
            None
        }
    }

    pub const fn from_truncating(value: u8) -> NodeId {
        NodeId(value & Self::MAX.0)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Raw standard CAN identifier of this node's status frame.
    ///
    /// Always a valid 11-bit identifier: `MAX << 5 == 0x7E0 < 0x800`.
    pub const fn frame_id(self) -> u16 {
        (self.0 as u16) << 5
    }
}

impl TryFrom<u8> for NodeId {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidValue)
    }
}

/// Application-defined condition code
///
/// Codes identify one condition per node; their meaning is assigned by the network
/// designer. `0xFFFF` is reserved for the healthy heartbeat and must not be used for
/// errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Reserved sentinel transmitted while no condition is active.
    pub const HEARTBEAT: ErrorCode = ErrorCode(0xFFFF);

    pub const fn new(value: u16) -> ErrorCode {
        ErrorCode(value)
    }

    pub const fn get(self) -> u16 {
        self.0
    }

    pub const fn is_heartbeat(self) -> bool {
        self.0 == Self::HEARTBEAT.0
    }
}

impl From<u16> for ErrorCode {
    fn from(value: u16) -> Self {
        ErrorCode(value)
    }
}

/// Condition severity, most to least severe
///
/// The type has explicit numeric encoding matching the flags byte of the status frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Severity {
    /// Critical failure. Every node on the bus must enter its safe state immediately.
    SafeState = 0,
    /// Major failure. The node needs immediate service intervention.
    Error = 1,
    /// Degraded but safe to continue operating. Should be serviced soon.
    Warning = 2,
    /// Maintenance information, no immediate action needed. Heartbeats use this level.
    Info = 3,
}

impl Severity {
    pub const fn try_from_u8(code: u8) -> Option<Severity> {
        if code <= Severity::Info as u8 {
            Some(Severity::from_u8_truncating(code))
        } else {
            None
        }
    }

    pub const fn from_u8_truncating(code: u8) -> Severity {
        match code & 0x3 {
            0 => Severity::SafeState,
            1 => Severity::Error,
            2 => Severity::Warning,
            _ => Severity::Info,
        }
    }

    pub const fn into_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Severity {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, InvalidValue> {
        Self::try_from_u8(value).ok_or(InvalidValue)
    }
}

/// One reported condition, as carried on the wire
///
/// Every node broadcasts exactly one `Status` at any time: the heartbeat sentinel while
/// healthy, or the active condition while reporting. The 8-byte payload layout is
/// identical for both and bit-exact across the network:
///
/// | Bytes | Content                                                  |
/// |-------|----------------------------------------------------------|
/// | 0..2  | condition code, little-endian                            |
/// | 2     | bit 0 halted, bits 1..4 severity, bits 4..8 reserved (0) |
/// | 3..8  | diagnostic data, zero-padded                             |
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub code: ErrorCode,
    pub severity: Severity,
    pub halted: bool,
    pub data: [u8; SPECIFIC_DATA_SIZE],
}

impl Status {
    /// The healthy heartbeat condition.
    pub const HEARTBEAT: Status = Status {
        code: ErrorCode::HEARTBEAT,
        severity: Severity::Info,
        halted: false,
        data: [0; SPECIFIC_DATA_SIZE],
    };

    /// Creates a condition with diagnostic data, silently truncated to
    /// [`SPECIFIC_DATA_SIZE`] bytes and zero-padded when shorter.
    pub fn with_data(code: ErrorCode, severity: Severity, data: &[u8]) -> Status {
        let mut padded = [0; SPECIFIC_DATA_SIZE];
        let len = data.len().min(SPECIFIC_DATA_SIZE);
        padded[..len].copy_from_slice(&data[..len]);
        Status {
            code,
            severity,
            halted: false,
            data: padded,
        }
    }

    const HALTED_BIT: u8 = 0;
    const SEVERITY_BIT: u8 = 1;
    const RESERVED_BIT: u8 = 4;

    pub fn encode(&self) -> [u8; STATUS_DLC] {
        let code = self.code.get().to_le_bytes();
        let flags = (self.halted as u8) << Self::HALTED_BIT
            | self.severity.into_u8() << Self::SEVERITY_BIT;
        let mut bytes = [0; STATUS_DLC];
        bytes[0] = code[0];
        bytes[1] = code[1];
        bytes[2] = flags;
        bytes[3..].copy_from_slice(&self.data);
        bytes
    }

    /// Decodes a status payload, rejecting out-of-range severity values and non-zero
    /// reserved bits.
    pub fn decode(bytes: &[u8; STATUS_DLC]) -> Result<Status, InvalidValue> {
        let flags = bytes[2];
        if flags >> Self::RESERVED_BIT != 0 {
            return Err(InvalidValue);
        }
        let severity = Severity::try_from_u8(flags >> Self::SEVERITY_BIT & 0x7).ok_or(InvalidValue)?;
        let mut data = [0; SPECIFIC_DATA_SIZE];
        data.copy_from_slice(&bytes[3..]);
        Ok(Status {
            code: ErrorCode::new(u16::from_le_bytes([bytes[0], bytes[1]])),
            severity,
            halted: flags >> Self::HALTED_BIT & 0x1 != 0,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_frame_id() {
        assert_eq!(NodeId::new(2).unwrap().frame_id(), 64);
        assert_eq!(NodeId::MAX.frame_id(), 0x7E0);
        assert!(NodeId::new(64).is_none());
        assert_eq!(NodeId::from_truncating(0x42), NodeId::new(0x02).unwrap());
    }

    #[test]
    fn test_heartbeat_encoding() {
        // Code 0xFFFF, severity Info (3), not halted, no data.
        let bytes = Status::HEARTBEAT.encode();
        assert_eq!(bytes, [0xFF, 0xFF, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_flags_byte_packing() {
        let mut status = Status::with_data(ErrorCode::new(0x0200), Severity::Error, &[]);
        assert_eq!(status.encode()[2], 0x02);
        status.halted = true;
        assert_eq!(status.encode()[2], 0x03);
        status.severity = Severity::SafeState;
        assert_eq!(status.encode()[2], 0x01);
    }

    #[test]
    fn test_code_little_endian() {
        let bytes = Status::with_data(ErrorCode::new(0xDEAD), Severity::Warning, &[]).encode();
        assert_eq!(&bytes[..2], &[0xAD, 0xDE]);
    }

    #[test]
    fn test_data_truncation() {
        let status = Status::with_data(
            ErrorCode::new(1),
            Severity::Warning,
            &[1, 2, 3, 4, 5, 6, 7],
        );
        assert_eq!(status.data, [1, 2, 3, 4, 5]);

        let status = Status::with_data(ErrorCode::new(1), Severity::Warning, &[9]);
        assert_eq!(status.data, [9, 0, 0, 0, 0]);
    }

    #[test]
    fn test_round_trip() {
        let mut status = Status::with_data(
            ErrorCode::new(0x0123),
            Severity::SafeState,
            &[0xAA, 0xBB, 0xCC],
        );
        status.halted = true;
        assert_eq!(Status::decode(&status.encode()).unwrap(), status);
        assert_eq!(
            Status::decode(&Status::HEARTBEAT.encode()).unwrap(),
            Status::HEARTBEAT
        );
    }

    #[test]
    fn test_decode_rejects_reserved_bits() {
        let mut bytes = Status::HEARTBEAT.encode();
        bytes[2] |= 0x10;
        assert!(Status::decode(&bytes).is_err());
    }

    #[test]
    fn test_decode_rejects_bad_severity() {
        let mut bytes = Status::HEARTBEAT.encode();
        bytes[2] = 4 << 1;
        assert!(Status::decode(&bytes).is_err());
    }
}
