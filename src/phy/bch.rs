// BCH(31,21) codeword encoder with even parity
// Generator: x^10 + x^9 + x^8 + x^6 + x^5 + x^3 + 1 (0b11101101001)

use crate::utils::consts::{CRC_BITS, CRC_GENERATOR, PAYLOAD_MASK};

/// Number of columns the generator is slid across (payload width)
const CRC_COLUMNS: u32 = 21;

/// Calculate the 10 CRC bits for a 21-bit payload
///
/// Plain GF(2) long division: the generator starts aligned with bit 30 of
/// the 31-bit register and moves one column right per step.
pub fn calculate_crc(payload: u32) -> u32 {
    let mut divisor = CRC_GENERATOR << (CRC_COLUMNS - 1);
    let mut register = (payload & PAYLOAD_MASK) << CRC_BITS;

    for column in 0..CRC_COLUMNS {
        if (register >> (30 - column)) & 1 != 0 {
            register ^= divisor;
        }
        divisor >>= 1;
    }

    register & ((1 << CRC_BITS) - 1)
}

/// Even parity bit over all set bits of `value`
pub fn parity(value: u32) -> u32 {
    value.count_ones() % 2
}

/// Build the final codeword: [payload:21] [crc:10] [parity:1]
pub fn encode_codeword(payload: u32) -> u32 {
    let payload = payload & PAYLOAD_MASK;
    let with_crc = (payload << CRC_BITS) | calculate_crc(payload);
    (with_crc << 1) | parity(with_crc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::consts::{FRAME_SYNC, IDLE_CODEWORD, MESSAGE_FLAG};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Remainder of the 31-bit code part against the generator
    fn syndrome(codeword: u32) -> u32 {
        let mut data = codeword >> 1;
        for i in (10..31).rev() {
            if data & (1 << i) != 0 {
                data ^= CRC_GENERATOR << (i - 10);
            }
        }
        data & 0x3FF
    }

    #[test]
    fn test_zero_payload() {
        assert_eq!(calculate_crc(0), 0);
        assert_eq!(encode_codeword(0), 0);
    }

    #[test]
    fn test_reference_words_are_codewords() {
        // Idle and sync are themselves valid BCH codewords
        assert_eq!(encode_codeword(IDLE_CODEWORD >> 11), IDLE_CODEWORD);
        assert_eq!(encode_codeword(FRAME_SYNC >> 11), FRAME_SYNC);
    }

    #[test]
    fn test_known_codewords() {
        assert_eq!(encode_codeword(1), 0x0000_0ED3);
        assert_eq!(encode_codeword(MESSAGE_FLAG), 0x8000_0769);
        assert_eq!(encode_codeword(0x1F_FFFF), 0xFFFF_FFFF);
        // address 1001, function 3
        assert_eq!(encode_codeword(0x1F7), 0x000F_BBCF);
    }

    #[test]
    fn test_payload_is_masked() {
        assert_eq!(encode_codeword(0xFFE0_0001), encode_codeword(1));
    }

    #[test]
    fn test_parity_and_crc_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for _ in 0..10_000 {
            let payload: u32 = rng.random_range(0..=PAYLOAD_MASK);
            let codeword = encode_codeword(payload);

            assert_eq!(codeword.count_ones() % 2, 0, "odd parity for {payload:#x}");
            assert_eq!(syndrome(codeword), 0, "bad crc for {payload:#x}");
            assert_eq!(codeword >> 11, payload);
            assert_eq!(codeword, encode_codeword(payload));
        }
    }

    #[test]
    fn test_single_bit_error_is_detected() {
        let codeword = encode_codeword(0x12345);
        for bit in 1..32 {
            assert_ne!(syndrome(codeword ^ (1 << bit)), 0);
        }
    }
}
