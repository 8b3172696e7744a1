// Wheel HID report decoding
// Raw 4-byte input reports from the dial's hidraw node

/// Wire size of one dial input report.
pub const REPORT_LEN: usize = 4;

/// Decoded dial input report.
///
/// Layout on the wire: `[report_id, button, rotation_hb, rotation_lb]`.
/// `rotation_lb` is carried through for logging but not interpreted;
/// the firmware only signals direction in the high byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelPacket {
    pub report_id: u8,
    pub button: u8,
    pub rotation_hb: u8,
    pub rotation_lb: u8,
}

impl WheelPacket {
    /// Decode a raw report buffer.
    ///
    /// Returns `None` unless the buffer is exactly [`REPORT_LEN`] bytes;
    /// the caller logs and discards short or oversized reads. Field values
    /// are not range-checked; unknown values simply match no event rule
    /// downstream.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() != REPORT_LEN {
            return None;
        }

        Some(Self {
            report_id: data[0],
            button: data[1],
            rotation_hb: data[2],
            rotation_lb: data[3],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_length() {
        let pkt = WheelPacket::parse(&[0x01, 0x02, 0x03, 0x04]).unwrap();
        assert_eq!(pkt.report_id, 0x01);
        assert_eq!(pkt.button, 0x02);
        assert_eq!(pkt.rotation_hb, 0x03);
        assert_eq!(pkt.rotation_lb, 0x04);
    }

    #[test]
    fn test_parse_rejects_wrong_lengths() {
        assert_eq!(WheelPacket::parse(&[]), None);
        assert_eq!(WheelPacket::parse(&[0x01]), None);
        assert_eq!(WheelPacket::parse(&[0x01, 0x02, 0x03]), None);
        assert_eq!(WheelPacket::parse(&[0x01, 0x02, 0x03, 0x04, 0x05]), None);
        assert_eq!(WheelPacket::parse(&[0u8; 64]), None);
    }

    #[test]
    fn test_parse_tolerates_any_field_values() {
        // No range validation: out-of-vocabulary bytes still decode.
        let pkt = WheelPacket::parse(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(pkt.button, 0xFF);
        assert_eq!(pkt.rotation_hb, 0xFF);
    }
}
