// Message packing: characters -> 20-bit message codewords
// Characters are written LSB first. A sync word is inserted whenever the
// batch position wraps.

use super::bch::encode_codeword;
use crate::utils::consts::{
    BATCH_SIZE, BITS_PER_CHAR_NUMERIC, BITS_PER_CHAR_TEXT, BITS_PER_WORD, FRAME_SYNC,
    MESSAGE_FLAG,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Numeric alphabet, indexed by 4-bit symbol value
const NUMERIC_TABLE: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '*', 'U', ' ', '-', ')', '(',
];

/// Symbol used to fill the tail of a numeric message
const NUMERIC_SPACE: u32 = 0xC;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 7-bit ASCII
    #[default]
    Alphanumeric,
    /// 4-bit BCD-like digits
    Numeric,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Alphanumeric => "alphanumeric",
            DataType::Numeric => "numeric",
        }
    }

    pub fn bits_per_char(&self) -> usize {
        match self {
            DataType::Alphanumeric => BITS_PER_CHAR_TEXT,
            DataType::Numeric => BITS_PER_CHAR_NUMERIC,
        }
    }

    /// Symbol value for a character, before bit reversal
    fn symbol(&self, c: char) -> u32 {
        match self {
            DataType::Alphanumeric => c as u32 & 0x7F,
            DataType::Numeric => match NUMERIC_TABLE.iter().position(|&n| n == c) {
                Some(value) => value as u32,
                None => {
                    warn!("'{}' has no numeric symbol, sending space", c.escape_debug());
                    NUMERIC_SPACE
                }
            },
        }
    }

    /// Fill symbol for a partial last word; `None` pads with zero bits
    fn fill_symbol(&self) -> Option<u32> {
        match self {
            DataType::Alphanumeric => None,
            DataType::Numeric => Some(NUMERIC_SPACE),
        }
    }

    /// Message codewords needed for `chars` characters (sync words excluded)
    pub fn words_for_chars(&self, chars: usize) -> usize {
        (chars * self.bits_per_char()).div_ceil(BITS_PER_WORD)
    }
}

/// Accumulates message bits and tracks the position inside the batch
struct MessageWriter {
    out: Vec<u32>,
    word: u32,
    num_bits: usize,
    position: usize,
}

impl MessageWriter {
    fn new(start_position: usize) -> Self {
        Self {
            out: Vec::new(),
            word: 0,
            num_bits: 0,
            position: start_position % BATCH_SIZE,
        }
    }

    fn push_bit(&mut self, bit: u32) {
        self.word = (self.word << 1) | (bit & 1);
        self.num_bits += 1;
        if self.num_bits == BITS_PER_WORD {
            self.flush_word();
        }
    }

    /// Push `width` bits of `symbol`, least significant first
    fn push_symbol(&mut self, symbol: u32, width: usize) {
        for i in 0..width {
            self.push_bit(symbol >> i);
        }
    }

    fn flush_word(&mut self) {
        self.out.push(encode_codeword(self.word | MESSAGE_FLAG));
        self.word = 0;
        self.num_bits = 0;

        self.position += 1;
        if self.position == BATCH_SIZE {
            self.out.push(FRAME_SYNC);
            self.position = 0;
        }
    }

    fn finish(mut self, data_type: DataType) -> Vec<u32> {
        if self.num_bits > 0 {
            match data_type.fill_symbol() {
                Some(fill) => {
                    while self.num_bits > 0 {
                        self.push_symbol(fill, data_type.bits_per_char());
                    }
                }
                None => {
                    self.word <<= BITS_PER_WORD - self.num_bits;
                    self.flush_word();
                }
            }
        }
        self.out
    }
}

/// Pack `message` into message codewords, starting at batch position
/// `start_position`. Sync words are included in the output.
pub fn pack(start_position: usize, message: &str, data_type: DataType) -> Vec<u32> {
    let mut writer = MessageWriter::new(start_position);
    let width = data_type.bits_per_char();

    for c in message.chars() {
        writer.push_symbol(data_type.symbol(c), width);
    }

    let out = writer.finish(data_type);
    debug!(
        "Packed {} chars ({}) into {} words from position {}",
        message.chars().count(),
        data_type.name(),
        out.len(),
        start_position
    );
    out
}

/// Pack 7-bit text
pub fn pack_text(start_position: usize, text: &str) -> Vec<u32> {
    pack(start_position, text, DataType::Alphanumeric)
}

/// Pack numeric digits
pub fn pack_numeric(start_position: usize, digits: &str) -> Vec<u32> {
    pack(start_position, digits, DataType::Numeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_words(words: &[u32]) -> usize {
        words.iter().filter(|&&w| w != FRAME_SYNC).count()
    }

    #[test]
    fn test_empty_message() {
        assert!(pack_text(0, "").is_empty());
        assert!(pack_numeric(5, "").is_empty());
    }

    #[test]
    fn test_single_char_lsb_first() {
        // 'A' = 0x41 -> LSB first 1000001, left aligned in 20 bits
        let words = pack_text(1, "A");
        assert_eq!(words, vec![0xC100_057F]);
        assert_eq!(words[0] >> 31, 1);
        assert_eq!((words[0] >> 11) & 0xFFFFF, 0b1000001 << 13);
    }

    #[test]
    fn test_word_count() {
        for chars in 0..120 {
            let text = "p".repeat(chars);
            let words = pack_text(3, &text);
            assert_eq!(message_words(&words), (7 * chars).div_ceil(20));
            assert_eq!(message_words(&words), DataType::Alphanumeric.words_for_chars(chars));
        }
    }

    #[test]
    fn test_sync_inserted_at_batch_boundary() {
        let words = pack_text(15, &"x".repeat(50));
        // 350 bits -> 18 words, crossing two batch boundaries
        assert_eq!(words.len(), 20);
        assert_eq!(words[0], 0x8F1E_387B);
        assert_eq!(words[1], FRAME_SYNC);
        assert_eq!(words[2], 0xC78F_1C3D);
        // counter restarts at 0, so the next sync follows 16 message words
        assert_eq!(words[18], FRAME_SYNC);
        assert_eq!(message_words(&words[2..18]), 16);
    }

    #[test]
    fn test_sync_after_final_partial_word() {
        // 3 chars = 21 bits -> 2 words; the partial one lands on position 15
        let words = pack_text(14, "abc");
        assert_eq!(words.len(), 3);
        assert_eq!(words[2], FRAME_SYNC);
    }

    #[test]
    fn test_start_position_wraps() {
        assert_eq!(pack_text(17, "hello world"), pack_text(1, "hello world"));
    }

    #[test]
    fn test_non_ascii_uses_low_bits() {
        // U+00C1 keeps its low 7 bits, same as 'A'
        assert_eq!(pack_text(0, "\u{00C1}"), pack_text(0, "A"));
    }

    #[test]
    fn test_numeric_packing() {
        // five digits fill exactly one word
        assert_eq!(pack_numeric(0, "12345"), vec![0xC261_572C]);
        // a short message is filled with spaces, not zeros
        assert_eq!(pack_numeric(0, "123"), vec![0xC261_9CE1]);
        assert_eq!(pack_numeric(0, "123"), pack_numeric(0, "123  "));
    }

    #[test]
    fn test_numeric_unknown_char_is_space() {
        assert_eq!(pack_numeric(0, "1x3"), pack_numeric(0, "1 3"));
    }

    #[test]
    fn test_numeric_word_count() {
        for chars in 0..60 {
            let digits = "7".repeat(chars);
            let words = pack_numeric(2, &digits);
            assert_eq!(message_words(&words), (4 * chars).div_ceil(20));
        }
    }
}
