use super::AudioSink;
use crate::error::{SinkError, SinkResult};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// 16-bit PCM WAV file output
pub struct WavSink {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    sample_rate: u32,
    channels: u16,
    written: usize,
}

impl WavSink {
    pub fn create(path: &Path, sample_rate: u32, channels: u16) -> SinkResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let channels = channels.max(1);
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::create(path, spec)
            .map_err(|err| SinkError::Unavailable(format!("{}: {err}", path.display())))?;

        info!(
            "Writing WAV: {} ({} Hz, {} ch, 16 bit)",
            path.display(),
            sample_rate,
            channels
        );

        Ok(Self {
            writer: Some(writer),
            sample_rate,
            channels,
            written: 0,
        })
    }

    /// Frames written so far
    pub fn frames_written(&self) -> usize {
        self.written
    }
}

impl AudioSink for WavSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn write(&mut self, samples: &[f32]) -> SinkResult<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| SinkError::Write("WAV file already finalized".into()))?;

        let amplitude = i16::MAX as f32;
        for &sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * amplitude) as i16;
            for _ in 0..self.channels {
                writer
                    .write_sample(value)
                    .map_err(|err| SinkError::Write(format!("{err}")))?;
            }
        }
        self.written += samples.len();
        Ok(())
    }

    fn close(&mut self) -> SinkResult<()> {
        if let Some(writer) = self.writer.take() {
            writer
                .finalize()
                .map_err(|err| SinkError::Close(format!("{err}")))?;
            info!("WAV finalized: {} frames", self.written);
        }
        Ok(())
    }
}
