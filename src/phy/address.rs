// Address codeword: [flag=0] [address >> 3 : 18] [function : 2]
// The low 3 address bits are not sent, they select the frame slot instead.

use super::bch::encode_codeword;
use crate::utils::consts::{ADDRESS_FLAG, DATA_MASK, FRAME_SIZE};

/// Address codeword together with the batch position it must occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressWord {
    pub codeword: u32,
    /// Codewords preceding the address word after the sync word
    pub slot_offset: usize,
}

/// Frame (0..8) a receiver listens to
pub fn frame_slot(address: u32) -> usize {
    (address & 0x7) as usize
}

pub fn slot_offset(address: u32) -> usize {
    frame_slot(address) * FRAME_SIZE
}

/// Encode an address and 2-bit function code
///
/// Out-of-range input is truncated, never rejected.
pub fn encode_address(address: u32, function_bits: u8) -> AddressWord {
    let data = (((address >> 3) << 2) | (function_bits & 0x3) as u32) & DATA_MASK;

    AddressWord {
        codeword: encode_codeword(data | ADDRESS_FLAG),
        slot_offset: slot_offset(address),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_offset_range() {
        for address in 0..1024u32 {
            let offset = encode_address(address, 0).slot_offset;
            assert!(offset <= 14);
            assert_eq!(offset % 2, 0);
            assert_eq!(offset, encode_address(address % 8, 0).slot_offset);
        }
        assert_eq!(slot_offset(0), slot_offset(8));
        assert_eq!(slot_offset(7), 14);
    }

    #[test]
    fn test_known_address() {
        let word = encode_address(1001, 3);
        assert_eq!(word.codeword, 0x000F_BBCF);
        assert_eq!(word.slot_offset, 2);
    }

    #[test]
    fn test_address_flag_is_clear() {
        // 0x1FFFFF is the largest 21-bit address; anything wider is truncated
        for address in [0x1F_FFFF, 0xFFFF_FFFF, 0x0020_0000] {
            let word = encode_address(address, 3);
            assert_eq!(word.codeword >> 31, 0);
            assert_eq!(word.codeword.count_ones() % 2, 0);
        }
        assert_eq!(
            encode_address(0xFFFF_FFFF, 0).codeword,
            encode_address(0x001F_FFFF, 0).codeword
        );
    }

    #[test]
    fn test_function_bits_are_masked() {
        assert_eq!(encode_address(1001, 7), encode_address(1001, 3));
        assert_ne!(
            encode_address(1001, 0).codeword,
            encode_address(1001, 1).codeword
        );
    }
}
