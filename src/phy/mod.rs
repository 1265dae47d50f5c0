// Physical layer: POCSAG framing and baseband line coding

pub mod address;
pub mod bch;
pub mod encoder;
pub mod line_coding;
pub mod packer;

pub use address::{AddressWord, encode_address};
pub use bch::encode_codeword;
pub use encoder::{Page, Transmission, assemble, assemble_with};
pub use line_coding::LevelModulator;
pub use packer::{DataType, pack, pack_numeric, pack_text};
