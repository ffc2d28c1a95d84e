//! Framed messages exchanged over the radio.
//!
//! Wire format, staged through the chip FIFO:
//! `[1-byte length][8-byte source][8-byte destination][payload]`,
//! where the length field counts the 16 address bytes plus the payload.

use heapless::Vec;

/// Node address length, bytes. Addresses are raw bytes, not NUL terminated.
pub const ADDRESS_LEN: usize = 8;

/// Longest payload the one-byte wire length field can encode.
pub const MAX_PAYLOAD: usize = 239;

/// Payload buffer capacity. Sized past [`MAX_PAYLOAD`] so oversized payloads
/// are rejected at transmit time instead of silently truncated here.
pub const DATA_CAPACITY: usize = 255;

/// One framed message.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet {
    /// Sender address.
    pub source: [u8; ADDRESS_LEN],
    /// Recipient address.
    pub destination: [u8; ADDRESS_LEN],
    /// Application payload. Owned by the packet.
    pub data: Vec<u8, DATA_CAPACITY>,
}

impl Packet {
    /// Empty packet between the given addresses.
    pub fn new(source: [u8; ADDRESS_LEN], destination: [u8; ADDRESS_LEN]) -> Self {
        Self {
            source,
            destination,
            data: Vec::new(),
        }
    }

    /// Packet carrying a copy of `data`, or `None` if `data` does not fit
    /// the payload buffer.
    pub fn with_data(
        source: [u8; ADDRESS_LEN],
        destination: [u8; ADDRESS_LEN],
        data: &[u8],
    ) -> Option<Self> {
        let data = Vec::from_slice(data).ok()?;
        Some(Self {
            source,
            destination,
            data,
        })
    }

    /// Total wire length: the value of the one-byte length field.
    pub fn wire_len(&self) -> usize {
        2 * ADDRESS_LEN + self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_len_counts_addresses() {
        let packet = Packet::with_data([1; 8], [2; 8], b"ping").unwrap();
        assert_eq!(packet.wire_len(), 20);
        assert_eq!(Packet::new([0; 8], [0; 8]).wire_len(), 16);
    }

    #[test]
    fn with_data_rejects_oversized_payload() {
        assert!(Packet::with_data([0; 8], [0; 8], &[0; DATA_CAPACITY]).is_some());
        assert!(Packet::with_data([0; 8], [0; 8], &[0; DATA_CAPACITY + 1]).is_none());
    }
}
