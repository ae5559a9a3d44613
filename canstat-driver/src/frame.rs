//! Classic CAN frame object

pub use embedded_can::{ExtendedId, Id, StandardId};

/// Payload capacity of a classic CAN frame.
pub const MAX_DLC: usize = 8;

/// Classic CAN payload: up to [`MAX_DLC`] bytes plus their length
///
/// Dereferences to the populated prefix of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Data {
    bytes: [u8; MAX_DLC],
    length: u8,
}

impl Data {
    pub const fn empty() -> Data {
        Data {
            bytes: [0; MAX_DLC],
            length: 0,
        }
    }

    /// Copies the payload in. Returns `None` if it does not fit a classic frame.
    pub fn new(data: &[u8]) -> Option<Data> {
        if data.len() > MAX_DLC {
            return None;
        }
        let mut bytes = [0; MAX_DLC];
        bytes[..data.len()].copy_from_slice(data);
        Some(Data {
            bytes,
            length: data.len() as u8,
        })
    }
}

impl core::ops::Deref for Data {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.bytes[..usize::from(self.length)]
    }
}

impl core::ops::DerefMut for Data {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.bytes[..usize::from(self.length)]
    }
}

/// A classic CAN data frame prepared for transmission
///
/// The standard (11-bit) and extended (29-bit) identifier spaces are disjoint:
/// two frames with numerically equal raw identifiers in different spaces are
/// distinct frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub id: Id,
    pub data: Data,
}

impl Frame {
    pub fn new(id: impl Into<Id>, data: &[u8]) -> Option<Frame> {
        Some(Frame {
            id: id.into(),
            data: Data::new(data)?,
        })
    }

    pub fn dlc(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_length() {
        assert_eq!(Data::empty().len(), 0);
        assert_eq!(Data::new(&[1, 2, 3]).unwrap().as_ref(), &[1, 2, 3]);
        assert_eq!(Data::new(&[0; 8]).unwrap().len(), 8);
        assert!(Data::new(&[0; 9]).is_none());
    }

    #[test]
    fn test_id_spaces_disjoint() {
        let std_frame = Frame::new(StandardId::new(0x40).unwrap(), &[]).unwrap();
        let ext_frame = Frame::new(ExtendedId::new(0x40).unwrap(), &[]).unwrap();
        assert_ne!(std_frame.id, ext_frame.id);
    }
}
