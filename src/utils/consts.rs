/// 日志级别（可被 RUST_LOG 覆盖）
pub const LOG_LEVEL: &str = "info";

/// JACK 客户端名称
pub const JACK_CLIENT_NAME: &str = "pocsag_tx";

/// 输出端口名称
pub const OUTPUT_PORT_NAME: &str = "pocsag_out";

/// 进度更新间隔（毫秒）
pub const PROGRESS_UPDATE_INTERVAL_MS: u64 = 50;

/// Blocks queued towards the JACK callback before `write` blocks
pub const JACK_QUEUE_BLOCKS: usize = 64;

/// Give up waiting for the JACK callback to drain after this long
pub const JACK_DRAIN_TIMEOUT_MS: u64 = 5000;

// ============================================================================
// POCSAG wire format
// ============================================================================

/// Alternating 1,0 bits sent before the first batch
pub const PREAMBLE_BITS: usize = 576;

pub const PREAMBLE_WORD: u32 = 0xAAAA_AAAA;

pub const PREAMBLE_WORDS: usize = PREAMBLE_BITS / 32;

/// Start of every batch
pub const FRAME_SYNC: u32 = 0x7CD2_15D8;

pub const IDLE_CODEWORD: u32 = 0x7A89_C197;

/// Codewords per batch (8 frames x 2 words)
pub const BATCH_SIZE: usize = 16;

/// Codewords per frame
pub const FRAME_SIZE: usize = 2;

/// Type flag of an address codeword (bit 20 of the payload)
pub const ADDRESS_FLAG: u32 = 0x00_0000;

/// Type flag of a message codeword (bit 20 of the payload)
pub const MESSAGE_FLAG: u32 = 0x10_0000;

/// Function bits conventionally used for alphanumeric pages
pub const TEXT_FUNCTION: u8 = 0x3;

/// Function bits conventionally used for numeric pages
pub const NUMERIC_FUNCTION: u8 = 0x0;

pub const BITS_PER_WORD: usize = 20;

pub const BITS_PER_CHAR_TEXT: usize = 7;

pub const BITS_PER_CHAR_NUMERIC: usize = 4;

pub const CRC_BITS: usize = 10;

/// BCH(31,21) generator: x^10 + x^9 + x^8 + x^6 + x^5 + x^3 + 1
pub const CRC_GENERATOR: u32 = 0b111_0110_1001;

/// Flag + data bits of a codeword
pub const PAYLOAD_MASK: u32 = 0x1F_FFFF;

/// Data bits of a codeword
pub const DATA_MASK: u32 = 0x0F_FFFF;

// ============================================================================
// Audio output
// ============================================================================

/// Sample rate (Hz) for file and pipe outputs
pub const SAMPLE_RATE: u32 = 48000;

/// Default baud rate
pub const DEFAULT_BIT_RATE: u32 = 1200;

/// Baud rates defined by the protocol
pub const STANDARD_BIT_RATES: [u32; 3] = [512, 1200, 2400];

/// Output amplitude, close to full scale (124/128)
pub const DEFAULT_LEVEL: f32 = 0.97;

pub const DEFAULT_CHANNELS: u16 = 1;
