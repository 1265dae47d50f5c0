// Raw PCM for piping into e.g. `aplay -t raw -f U8 -c 1 -r 48000`

use super::AudioSink;
use crate::error::SinkResult;
use byteorder::{LittleEndian, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PcmFormat {
    /// Unsigned 8 bit, 128 = silence
    #[default]
    U8,
    /// Signed 16 bit little endian
    S16Le,
}

impl PcmFormat {
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            PcmFormat::U8 => 1,
            PcmFormat::S16Le => 2,
        }
    }

    pub fn aplay_name(&self) -> &'static str {
        match self {
            PcmFormat::U8 => "U8",
            PcmFormat::S16Le => "S16_LE",
        }
    }
}

pub struct RawSink<W: Write> {
    out: W,
    sample_rate: u32,
    channels: u16,
    format: PcmFormat,
}

impl<W: Write> RawSink<W> {
    pub fn new(out: W, sample_rate: u32, channels: u16, format: PcmFormat) -> Self {
        debug!(
            "Raw PCM output: -f {} -c {} -r {}",
            format.aplay_name(),
            channels,
            sample_rate
        );
        Self {
            out,
            sample_rate,
            channels: channels.max(1),
            format,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for RawSink<W> {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn write(&mut self, samples: &[f32]) -> SinkResult<()> {
        let mut buf =
            Vec::with_capacity(samples.len() * self.channels as usize * self.format.bytes_per_sample());
        for &sample in samples {
            let sample = sample.clamp(-1.0, 1.0);
            for _ in 0..self.channels {
                match self.format {
                    PcmFormat::U8 => buf.write_u8((sample * 127.0 + 128.0) as u8)?,
                    PcmFormat::S16Le => {
                        buf.write_i16::<LittleEndian>((sample * i16::MAX as f32) as i16)?
                    }
                }
            }
        }
        self.out.write_all(&buf)?;
        Ok(())
    }

    fn close(&mut self) -> SinkResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_levels() {
        let mut sink = RawSink::new(Vec::new(), 48000, 1, PcmFormat::U8);
        sink.write(&[1.0, -1.0, 0.0, 0.97, -0.97]).unwrap();
        sink.close().unwrap();
        assert_eq!(sink.into_inner(), vec![255, 1, 128, 251, 4]);
    }

    #[test]
    fn test_s16le_bytes() {
        let mut sink = RawSink::new(Vec::new(), 48000, 1, PcmFormat::S16Le);
        sink.write(&[1.0, -1.0]).unwrap();
        assert_eq!(sink.into_inner(), vec![0xFF, 0x7F, 0x01, 0x80]);
    }

    #[test]
    fn test_channels_interleaved() {
        let mut sink = RawSink::new(Vec::new(), 8000, 2, PcmFormat::U8);
        sink.write(&[1.0, 0.0]).unwrap();
        assert_eq!(sink.into_inner(), vec![255, 255, 128, 128]);
    }

    #[test]
    fn test_format_from_json() {
        let format: PcmFormat = serde_json::from_str("\"s16le\"").unwrap();
        assert_eq!(format, PcmFormat::S16Le);
    }
}
