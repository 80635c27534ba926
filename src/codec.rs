//! Conversion between host integers and the dongle's little-endian wire order.

/// Convert a 16-bit value to or from little-endian order.
///
/// Identity on little-endian hosts, a byte swap on big-endian hosts. The
/// conversion is its own inverse.
pub fn convert_le_u16(value: u16) -> u16 {
    u16::from_le(value)
}

/// Convert a 32-bit value to or from little-endian order.
pub fn convert_le_u32(value: u32) -> u32 {
    u32::from_le(value)
}

pub fn encode_u16(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

pub fn encode_u32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Decode a little-endian u16 from the start of `bytes`, zero-extending short input
pub fn decode_u16(bytes: &[u8]) -> u16 {
    let mut raw = [0u8; 2];
    let len = bytes.len().min(raw.len());
    raw[..len].copy_from_slice(&bytes[..len]);
    u16::from_le_bytes(raw)
}

/// Decode a little-endian u32 from the start of `bytes`, zero-extending short input
pub fn decode_u32(bytes: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    let len = bytes.len().min(raw.len());
    raw[..len].copy_from_slice(&bytes[..len]);
    u32::from_le_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for value in [0u16, 1, 0x00ff, 0x1234, 0x8000, u16::MAX] {
            assert_eq!(convert_le_u16(convert_le_u16(value)), value);
            assert_eq!(decode_u16(&encode_u16(value)), value);
        }
        for value in [0u32, 1, 0x1234_5678, 0x8000_0000, u32::MAX] {
            assert_eq!(convert_le_u32(convert_le_u32(value)), value);
            assert_eq!(decode_u32(&encode_u32(value)), value);
        }
    }

    #[test]
    fn test_little_endian_reference_vectors() {
        assert_eq!(encode_u16(0x1234), [0x34, 0x12]);
        assert_eq!(encode_u32(0x0001_2c00), [0x00, 0x2c, 0x01, 0x00]);
        assert_eq!(decode_u32(&[0x60, 0x00, 0x00, 0x00]), 0x60);

        #[cfg(target_endian = "little")]
        {
            assert_eq!(convert_le_u16(0xbeef), 0xbeef);
            assert_eq!(convert_le_u32(0xdead_beef), 0xdead_beef);
        }
    }

    #[test]
    fn test_decode_short_input() {
        assert_eq!(decode_u32(&[0x10, 0x27, 0x00]), 10_000);
        assert_eq!(decode_u16(&[]), 0);
    }
}
