// Two-level (NRZ) line coding: 1 -> high, 0 -> low, MSB first
// Any FSK is done by the transmitter that receives this audio.

use crate::audio::AudioSink;
use crate::error::SinkResult;
use crate::utils::consts::DEFAULT_LEVEL;
use tracing::{debug, info, warn};

pub struct LevelModulator {
    samples_per_bit: usize,
    inverted: bool,
    high: f32,
    low: f32,
}

impl LevelModulator {
    /// `sample_rate / bit_rate` samples per bit, at least one
    pub fn new(sample_rate: u32, bit_rate: u32, inverted: bool) -> Self {
        let bit_rate = bit_rate.max(1);
        if sample_rate % bit_rate != 0 {
            warn!(
                "{} Hz is not a multiple of {} baud, bit timing will drift",
                sample_rate, bit_rate
            );
        }
        let samples_per_bit = ((sample_rate / bit_rate) as usize).max(1);

        info!("LevelModulator initialized:");
        info!("  - sample rate: {} Hz", sample_rate);
        info!("  - bit rate: {} baud", bit_rate);
        info!("  - samples_per_bit: {}", samples_per_bit);
        info!("  - inverted: {}", inverted);

        Self {
            samples_per_bit,
            inverted,
            high: DEFAULT_LEVEL,
            low: -DEFAULT_LEVEL,
        }
    }

    /// Symmetric output levels at +/- `level`
    pub fn with_level(mut self, level: f32) -> Self {
        self.high = level;
        self.low = -level;
        self
    }

    pub fn samples_per_bit(&self) -> usize {
        self.samples_per_bit
    }

    pub fn samples_for_words(&self, num_words: usize) -> usize {
        num_words * 32 * self.samples_per_bit
    }

    /// Output level for a single bit
    pub fn level(&self, bit: bool) -> f32 {
        if bit ^ self.inverted { self.high } else { self.low }
    }

    pub fn encode_word_into(&self, word: u32, samples: &mut Vec<f32>) {
        for i in (0..32).rev() {
            let level = self.level((word >> i) & 1 == 1);
            samples.extend(std::iter::repeat_n(level, self.samples_per_bit));
        }
    }

    /// words -> audio samples
    pub fn encode(&self, words: &[u32]) -> Vec<f32> {
        let mut samples = Vec::with_capacity(self.samples_for_words(words.len()));
        for &word in words {
            self.encode_word_into(word, &mut samples);
        }
        samples
    }

    /// Stream `words` to `sink`, one word per write
    ///
    /// `on_word` is called after each word has been accepted by the sink.
    pub fn modulate<S, F>(&self, words: &[u32], sink: &mut S, mut on_word: F) -> SinkResult<()>
    where
        S: AudioSink + ?Sized,
        F: FnMut(usize),
    {
        let mut block = Vec::with_capacity(self.samples_for_words(1));
        for (i, &word) in words.iter().enumerate() {
            block.clear();
            self.encode_word_into(word, &mut block);
            sink.write(&block)?;
            on_word(i + 1);
        }

        debug!(
            "Modulated {} words into {} samples",
            words.len(),
            self.samples_for_words(words.len())
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::BufferSink;

    #[test]
    fn test_samples_per_bit() {
        assert_eq!(LevelModulator::new(48000, 1200, false).samples_per_bit(), 40);
        assert_eq!(LevelModulator::new(48000, 2400, false).samples_per_bit(), 20);
        assert_eq!(LevelModulator::new(48000, 512, false).samples_per_bit(), 93);
        assert_eq!(LevelModulator::new(8000, 0, false).samples_per_bit(), 8000);
        assert_eq!(LevelModulator::new(1000, 4000, false).samples_per_bit(), 1);
    }

    #[test]
    fn test_msb_first() {
        let modulator = LevelModulator::new(4, 2, false).with_level(1.0);
        let samples = modulator.encode(&[0x8000_0001]);
        assert_eq!(samples.len(), 64);
        assert_eq!(&samples[..2], &[1.0, 1.0]);
        assert!(samples[2..62].iter().all(|&s| s == -1.0));
        assert_eq!(&samples[62..], &[1.0, 1.0]);
    }

    #[test]
    fn test_inverted() {
        let normal = LevelModulator::new(48000, 2400, false).encode(&[0xAAAA_AAAA]);
        let inverted = LevelModulator::new(48000, 2400, true).encode(&[0xAAAA_AAAA]);
        assert_eq!(normal.len(), inverted.len());
        for (a, b) in normal.iter().zip(&inverted) {
            assert_eq!(*a, -*b);
        }
        assert_eq!(inverted[0], -DEFAULT_LEVEL);
    }

    #[test]
    fn test_modulate_to_sink() {
        let modulator = LevelModulator::new(48000, 1200, false);
        let mut sink = BufferSink::new(48000);
        let mut progress = Vec::new();

        modulator
            .modulate(&[0xFFFF_0000, 0x0000_FFFF], &mut sink, |n| progress.push(n))
            .unwrap();

        assert_eq!(progress, vec![1, 2]);
        assert_eq!(sink.samples().len(), modulator.samples_for_words(2));
        assert_eq!(sink.samples(), modulator.encode(&[0xFFFF_0000, 0x0000_FFFF]).as_slice());
    }
}
