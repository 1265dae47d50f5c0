//! Audio outputs
//!
//! Every output implements [`AudioSink`]: a blocking, mono `f32` sample
//! consumer at a fixed sample rate that must be closed explicitly.

pub mod raw;
pub mod wav;

use crate::error::{SinkError, SinkResult};

pub use raw::{PcmFormat, RawSink};
pub use wav::WavSink;

pub trait AudioSink {
    fn sample_rate(&self) -> u32;

    /// Write mono samples in [-1.0, 1.0]; may block until the sink has room
    fn write(&mut self, samples: &[f32]) -> SinkResult<()>;

    /// Flush everything and release the output
    fn close(&mut self) -> SinkResult<()>;
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn write(&mut self, samples: &[f32]) -> SinkResult<()> {
        (**self).write(samples)
    }

    fn close(&mut self) -> SinkResult<()> {
        (**self).close()
    }
}

/// In-memory sink
#[derive(Debug, Clone)]
pub struct BufferSink {
    sample_rate: u32,
    samples: Vec<f32>,
    closed: bool,
}

impl BufferSink {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples: Vec::new(),
            closed: false,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl AudioSink for BufferSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn write(&mut self, samples: &[f32]) -> SinkResult<()> {
        if self.closed {
            return Err(SinkError::Write("buffer already closed".into()));
        }
        self.samples.extend_from_slice(samples);
        Ok(())
    }

    fn close(&mut self) -> SinkResult<()> {
        self.closed = true;
        Ok(())
    }
}
