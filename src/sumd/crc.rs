//! # CRC-16/CCITT Implementation
//!
//! CRC-16 checksum used by SUMD frames.
//!
//! **Polynomial**: 0x1021 (x^16 + x^12 + x^5 + 1)
//! **Initial Value**: 0x0000
//! **Reflection**: none, **Final XOR**: none (also known as CRC-16/XMODEM)

/// CRC-16/CCITT polynomial
const CRC16_POLY: u16 = 0x1021;

/// Precomputed CRC16 lookup table, indexed by the high byte of the accumulator
const CRC16_TABLE: [u16; 256] = generate_crc16_table();

/// Generate CRC16 lookup table at compile time
const fn generate_crc16_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut j = 0;

        while j < 8 {
            if (crc & 0x8000) != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Calculate CRC-16/CCITT checksum using lookup table
///
/// # Arguments
///
/// * `data` - Byte slice to calculate CRC for (header + payload)
///
/// # Returns
///
/// * `u16` - Calculated CRC16 checksum
///
/// # Examples
///
/// ```
/// use sumd_bridge::sumd::crc::crc16_ccitt;
///
/// assert_eq!(crc16_ccitt(b"123456789"), 0x31C3);
/// ```
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;

    for &byte in data {
        let index = ((crc >> 8) as u8 ^ byte) as usize;
        crc = (crc << 8) ^ CRC16_TABLE[index];
    }

    crc
}

/// Calculate CRC-16/CCITT checksum bit by bit (slow, for verification)
///
/// Used to cross-check the lookup table.
#[allow(dead_code)]
fn crc16_ccitt_slow(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;

    for &byte in data {
        crc ^= (byte as u16) << 8;

        for _ in 0..8 {
            if (crc & 0x8000) != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_empty() {
        assert_eq!(crc16_ccitt(&[]), 0x0000);
    }

    #[test]
    fn test_crc16_check_value() {
        // Standard CRC-16/XMODEM check value
        assert_eq!(crc16_ccitt(b"123456789"), 0x31C3);
        assert_eq!(crc16_ccitt_slow(b"123456789"), 0x31C3);
    }

    #[test]
    fn test_crc16_single_byte() {
        assert_eq!(crc16_ccitt(&[0x00]), 0x0000);
        assert_eq!(crc16_ccitt(&[0xA8]), 0x34E2);
        assert_eq!(crc16_ccitt(&[0xA8]), crc16_ccitt_slow(&[0xA8]));
    }

    #[test]
    fn test_crc16_default_frame_vector() {
        let data = [
            0xA8, 0x01, 0x05, 0x2E, 0xE0, 0x2E, 0xE0, 0x20, 0x80, 0x2E, 0xE0, 0x2E, 0xE0,
        ];
        assert_eq!(crc16_ccitt(&data), 0x5927);
    }

    #[test]
    fn test_crc16_lookup_table_matches_slow() {
        let test_data = [
            vec![0x01, 0x02, 0x03],
            vec![0xFF, 0xFE, 0xFD],
            vec![0xA8, 0x01, 0x05, 0x1F, 0x40],
            vec![0x00; 13],
            vec![0xFF; 32],
        ];

        for data in test_data.iter() {
            assert_eq!(
                crc16_ccitt(data),
                crc16_ccitt_slow(data),
                "CRC mismatch for data: {:?}",
                data
            );
        }
    }

    #[test]
    fn test_crc16_table_every_byte() {
        for byte in 0..=255u8 {
            assert_eq!(crc16_ccitt(&[byte]), crc16_ccitt_slow(&[byte]));
        }
    }

    #[test]
    fn test_crc16_is_deterministic() {
        let data = [0xA8, 0x01, 0x05, 0x2E, 0xE0];
        assert_eq!(crc16_ccitt(&data), crc16_ccitt(&data));
    }

    #[test]
    fn test_crc16_changes_with_data() {
        let data1 = [0xA8, 0x01, 0x05, 0x2E, 0xE0];
        let data2 = [0xA8, 0x01, 0x05, 0x2E, 0xE1];

        assert_ne!(crc16_ccitt(&data1), crc16_ccitt(&data2), "CRC should change when data changes");
    }
}
