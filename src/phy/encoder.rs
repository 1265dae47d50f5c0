use super::address::encode_address;
use super::packer::{DataType, pack};
use crate::utils::consts::{
    BATCH_SIZE, FRAME_SYNC, IDLE_CODEWORD, PREAMBLE_WORD, PREAMBLE_WORDS,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A single page: one address, one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub address: u32,
    pub function: u8,
    pub message: String,
    #[serde(default)]
    pub data_type: DataType,
}

impl Page {
    pub fn new(address: u32, function: u8, message: impl Into<String>) -> Self {
        Self {
            address,
            function,
            message: message.into(),
            data_type: DataType::Alphanumeric,
        }
    }

    pub fn numeric(address: u32, function: u8, digits: impl Into<String>) -> Self {
        Self {
            data_type: DataType::Numeric,
            ..Self::new(address, function, digits)
        }
    }
}

/// Fully assembled word sequence, ready for modulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    words: Vec<u32>,
}

impl Transmission {
    pub fn assemble(page: &Page) -> Self {
        let words = assemble_with(page.address, page.function, &page.message, page.data_type);

        info!(
            "Assembled page for address {} (function {}, {}): {} words, {} bits",
            page.address,
            page.function & 0x3,
            page.data_type.name(),
            words.len(),
            words.len() * 32
        );

        Self { words }
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn into_words(self) -> Vec<u32> {
        self.words
    }

    /// Words after the preamble
    pub fn batches(&self) -> &[u32] {
        &self.words[PREAMBLE_WORDS..]
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn bit_len(&self) -> usize {
        self.words.len() * 32
    }

    /// On-air time in seconds at `bit_rate` baud
    pub fn duration_secs(&self, bit_rate: u32) -> f64 {
        self.bit_len() as f64 / bit_rate.max(1) as f64
    }
}

/// Assemble an alphanumeric page
pub fn assemble(address: u32, function_bits: u8, text: &str) -> Vec<u32> {
    assemble_with(address, function_bits, text, DataType::Alphanumeric)
}

/// Build the transmission:
/// [Preamble x18] [Sync] [Idle x slot_offset] [Address] [Message...] [Idle...]
pub fn assemble_with(
    address: u32,
    function_bits: u8,
    message: &str,
    data_type: DataType,
) -> Vec<u32> {
    let address_word = encode_address(address, function_bits);
    let message_words = pack(address_word.slot_offset + 1, message, data_type);

    let mut out = Vec::with_capacity(
        PREAMBLE_WORDS + 2 + address_word.slot_offset + message_words.len() + BATCH_SIZE,
    );

    out.extend(std::iter::repeat_n(PREAMBLE_WORD, PREAMBLE_WORDS));
    out.push(FRAME_SYNC);
    out.extend(std::iter::repeat_n(IDLE_CODEWORD, address_word.slot_offset));
    out.push(address_word.codeword);
    out.extend(message_words);

    // remainder - 1 idles; this does not complete the batch, and 0 or 1 leftover words get none
    let written = out.len() - PREAMBLE_WORDS;
    let padding = (written % BATCH_SIZE).saturating_sub(1);
    out.extend(std::iter::repeat_n(IDLE_CODEWORD, padding));

    debug!(
        "slot offset {}, {} words after preamble, {} trailing idle",
        address_word.slot_offset,
        written,
        padding
    );

    out
}
