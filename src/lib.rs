//! POCSAG paging transmitter
//!
//! Builds bit-exact POCSAG transmissions (preamble, batches, BCH(31,21)
//! codewords) and renders them as a two-level audio signal for an external
//! FM transmitter.
//!
//! ```no_run
//! use pocsag_tx::audio::BufferSink;
//! use pocsag_tx::transmission::transmit;
//!
//! let mut sink = BufferSink::new(48000);
//! let transmission = transmit(1001, 3, "test 1 2 3 4 5", 1200, false, &mut sink)?;
//! assert_eq!(transmission.words()[0], 0xAAAA_AAAA);
//! # Ok::<(), pocsag_tx::error::SinkError>(())
//! ```

pub mod audio;
pub mod device;
pub mod error;
pub mod phy;
pub mod transmission;
pub mod ui;
pub mod utils;
