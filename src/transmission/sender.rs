/// Pager sender: page -> words -> samples -> sink
use crate::audio::AudioSink;
use crate::error::SinkResult;
use crate::phy::{LevelModulator, Page, Transmission};
use crate::transmission::TransmitterConfig;
use crate::ui::progress::{ProgressManager, templates};
use tracing::{debug, info};

const PROGRESS_ID: &str = "transmit";

pub struct PagerSender {
    config: TransmitterConfig,
}

impl PagerSender {
    pub fn new(config: TransmitterConfig) -> Self {
        Self { config }
    }

    pub fn new_default() -> Self {
        Self::new(TransmitterConfig::default())
    }

    pub fn config(&self) -> &TransmitterConfig {
        &self.config
    }

    /// Modulator matching `sample_rate` and the configured bit rate
    pub fn modulator(&self, sample_rate: u32) -> LevelModulator {
        LevelModulator::new(sample_rate, self.config.bit_rate, self.config.inverted)
            .with_level(self.config.level)
    }

    pub fn encode(&self, page: &Page) -> Transmission {
        Transmission::assemble(page)
    }

    /// Encode `page` and play it through `sink`, closing the sink afterwards
    ///
    /// Any sink failure abandons the transmission.
    pub fn send<S: AudioSink + ?Sized>(
        &self,
        page: &Page,
        sink: &mut S,
        progress: Option<&ProgressManager>,
    ) -> SinkResult<Transmission> {
        let transmission = self.encode(page);
        self.send_transmission(&transmission, sink, progress)?;
        Ok(transmission)
    }

    pub fn send_transmission<S: AudioSink + ?Sized>(
        &self,
        transmission: &Transmission,
        sink: &mut S,
        progress: Option<&ProgressManager>,
    ) -> SinkResult<()> {
        let modulator = self.modulator(sink.sample_rate());
        let words = transmission.words();

        info!(
            "Transmitting {} words at {} baud ({:.2} s)",
            words.len(),
            self.config.bit_rate,
            transmission.duration_secs(self.config.bit_rate)
        );

        if let Some(progress) = progress {
            let _ = progress.create_bar(
                PROGRESS_ID,
                words.len() as u64,
                templates::TRANSMIT,
                &format!("{} baud", self.config.bit_rate),
            );
        }

        modulator.modulate(words, sink, |sent| {
            if let Some(progress) = progress {
                let _ = progress.set_position(PROGRESS_ID, sent as u64);
            }
        })?;
        sink.close()?;

        if let Some(progress) = progress {
            let _ = progress.finish(PROGRESS_ID, "done");
        }
        debug!("Sink closed");
        Ok(())
    }
}

/// Single entry point: encode one page and play it on `sink`
pub fn transmit<S: AudioSink + ?Sized>(
    address: u32,
    function_bits: u8,
    message: &str,
    bit_rate: u32,
    inverted: bool,
    sink: &mut S,
) -> SinkResult<Transmission> {
    let sender = PagerSender::new(TransmitterConfig {
        bit_rate,
        inverted,
        ..TransmitterConfig::default()
    });
    sender.send(&Page::new(address, function_bits, message), sink, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::BufferSink;
    use crate::error::SinkError;
    use crate::utils::consts::IDLE_CODEWORD;

    /// Accepts a fixed number of writes, then fails
    struct FailingSink {
        writes_left: usize,
        closed: bool,
    }

    impl AudioSink for FailingSink {
        fn sample_rate(&self) -> u32 {
            48000
        }

        fn write(&mut self, _samples: &[f32]) -> SinkResult<()> {
            if self.writes_left == 0 {
                return Err(SinkError::Write("device vanished".into()));
            }
            self.writes_left -= 1;
            Ok(())
        }

        fn close(&mut self) -> SinkResult<()> {
            self.closed = true;
            Ok(())
        }
    }

    #[test]
    fn test_send_to_buffer() {
        let sender = PagerSender::new_default();
        let mut sink = BufferSink::new(48000);
        let transmission = sender
            .send(&Page::new(1001, 3, "test 1 2 3 4 5"), &mut sink, None)
            .unwrap();

        assert!(sink.is_closed());
        assert_eq!(sink.samples().len(), transmission.bit_len() * 40);
    }

    #[test]
    fn test_sink_rate_drives_modulator() {
        let sender = PagerSender::new_default();
        let mut sink = BufferSink::new(24000);
        let transmission = sender.send(&Page::new(0, 0, ""), &mut sink, None).unwrap();
        assert_eq!(sink.samples().len(), transmission.bit_len() * 20);
    }

    #[test]
    fn test_write_failure_abandons_transmission() {
        let sender = PagerSender::new_default();
        let mut sink = FailingSink {
            writes_left: 3,
            closed: false,
        };
        let result = sender.send(&Page::new(1001, 3, "hello"), &mut sink, None);

        assert!(matches!(result, Err(SinkError::Write(_))));
        assert!(!sink.closed);
    }

    #[test]
    fn test_transmit_entry_point() {
        let mut sink = BufferSink::new(48000);
        let transmission = transmit(1, 0, "", 2400, true, &mut sink).unwrap();
        assert_eq!(&transmission.words()[19..21], &[IDLE_CODEWORD, IDLE_CODEWORD]);
        // inverted: the first preamble bit (1) is sent low
        assert!(sink.samples()[0] < 0.0);
        assert_eq!(sink.samples().len(), transmission.bit_len() * 20);
    }
}
