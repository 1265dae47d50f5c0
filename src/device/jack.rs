use crate::audio::AudioSink;
use crate::error::{SinkError, SinkResult};
use crate::utils::consts::{
    JACK_DRAIN_TIMEOUT_MS, JACK_QUEUE_BLOCKS, PROGRESS_UPDATE_INTERVAL_MS,
};
use crossbeam_channel::{Receiver, SendTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub fn print_jack_info(client: &jack::Client) -> (usize, usize) {
    let sample_rate = client.sample_rate();
    let buffer_size = client.buffer_size();
    info!("JACK Server Info:");
    info!("  Sample Rate: {} Hz", sample_rate);
    info!("  Buffer Size: {} samples", buffer_size);
    info!(
        "  Buffer Duration: {:.2} ms",
        (buffer_size as f64 / sample_rate as f64) * 1000.0
    );
    (sample_rate as usize, buffer_size as usize)
}

pub fn connect_output_to_first_system_input(client: &jack::Client, out_port_name: &str) {
    let system_input_ports = client.ports(
        None,
        None,
        jack::PortFlags::IS_INPUT | jack::PortFlags::IS_PHYSICAL,
    );
    debug!("{} physical input found.", system_input_ports.len());

    match system_input_ports.first() {
        Some(system_in) => match client.connect_ports_by_name(out_port_name, system_in) {
            Ok(_) => info!("Connected Output: {} -> {}", out_port_name, system_in),
            Err(e) => error!(
                "Failed connecting Output {} -> {}: {}",
                out_port_name, system_in, e
            ),
        },
        None => warn!("Missing physical playback port, {} left unconnected", out_port_name),
    }
}

/// Counters shared between the writer and the process callback
#[derive(Clone, Default)]
struct PlaybackShared {
    played: Arc<AtomicUsize>,
    drained: Arc<AtomicBool>,
}

/// Blocks waiting to be played, consumed on the realtime thread
struct PlaybackQueue {
    queue: Receiver<Vec<f32>>,
    block: Vec<f32>,
    cursor: usize,
    shared: PlaybackShared,
}

impl PlaybackQueue {
    fn next_sample(&mut self) -> Option<f32> {
        while self.cursor >= self.block.len() {
            match self.queue.try_recv() {
                Ok(block) => {
                    self.block = block;
                    self.cursor = 0;
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    self.shared.drained.store(true, Ordering::SeqCst);
                    return None;
                }
            }
        }
        let sample = self.block[self.cursor];
        self.cursor += 1;
        Some(sample)
    }
}

struct PlaybackHandler {
    out_port: jack::Port<jack::AudioOut>,
    source: PlaybackQueue,
}

impl jack::ProcessHandler for PlaybackHandler {
    fn process(&mut self, _: &jack::Client, ps: &jack::ProcessScope) -> jack::Control {
        let out_buffer = self.out_port.as_mut_slice(ps);

        // Underrun and end of stream both play silence
        let mut played = 0;
        for out_sample in out_buffer.iter_mut() {
            *out_sample = match self.source.next_sample() {
                Some(sample) => {
                    played += 1;
                    sample
                }
                None => 0.0,
            };
        }

        self.source
            .shared
            .played
            .fetch_add(played, Ordering::Relaxed);
        jack::Control::Continue
    }
}

/// Live output through a JACK port
///
/// `write` blocks once `JACK_QUEUE_BLOCKS` blocks are waiting for the
/// process callback, which is the only backpressure in the pipeline.
pub struct JackSink {
    active_client: Option<jack::AsyncClient<(), PlaybackHandler>>,
    queue: Option<Sender<Vec<f32>>>,
    shared: PlaybackShared,
    running: Arc<AtomicBool>,
    sample_rate: u32,
    queued: usize,
}

impl JackSink {
    pub fn open(client_name: &str, port_name: &str) -> SinkResult<Self> {
        let (client, status) =
            jack::Client::new(client_name, jack::ClientOptions::NO_START_SERVER)
                .map_err(|e| SinkError::Unavailable(format!("JACK client: {e}")))?;
        info!("JACK client status: {:?}", status);
        let (sample_rate, _buffer_size) = print_jack_info(&client);

        let out_port = client
            .register_port(port_name, jack::AudioOut::default())
            .map_err(|e| SinkError::Unavailable(format!("JACK port {port_name}: {e}")))?;
        let out_port_name = out_port
            .name()
            .map_err(|e| SinkError::Unavailable(format!("JACK port name: {e}")))?;

        let (tx, rx) = crossbeam_channel::bounded::<Vec<f32>>(JACK_QUEUE_BLOCKS);
        let shared = PlaybackShared::default();
        let handler = PlaybackHandler {
            out_port,
            source: PlaybackQueue {
                queue: rx,
                block: Vec::new(),
                cursor: 0,
                shared: shared.clone(),
            },
        };

        let active_client = client
            .activate_async((), handler)
            .map_err(|e| SinkError::Unavailable(format!("JACK activate: {e}")))?;
        connect_output_to_first_system_input(active_client.as_client(), &out_port_name);

        Ok(Self {
            active_client: Some(active_client),
            queue: Some(tx),
            shared,
            running: Arc::new(AtomicBool::new(true)),
            sample_rate: sample_rate as u32,
            queued: 0,
        })
    }

    /// Abort writes once `running` is cleared (e.g. from a Ctrl-C handler)
    pub fn with_running_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = running;
        self
    }

    /// Samples the process callback has sent to the port
    pub fn played(&self) -> usize {
        self.shared.played.load(Ordering::Relaxed)
    }

    fn check_running(&self) -> SinkResult<()> {
        if self.running.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SinkError::Interrupted)
        }
    }

    fn wait_drained(&self) -> SinkResult<()> {
        let deadline = Instant::now()
            + Duration::from_millis(JACK_DRAIN_TIMEOUT_MS)
            + Duration::from_secs_f64(self.queued as f64 / self.sample_rate.max(1) as f64);

        while !self.shared.drained.load(Ordering::SeqCst) {
            self.check_running()?;
            if Instant::now() > deadline {
                return Err(SinkError::Close(format!(
                    "playback did not drain ({} of {} samples played)",
                    self.played(),
                    self.queued
                )));
            }
            std::thread::sleep(Duration::from_millis(PROGRESS_UPDATE_INTERVAL_MS));
        }
        Ok(())
    }

    fn deactivate(&mut self) -> SinkResult<()> {
        if let Some(active_client) = self.active_client.take() {
            active_client
                .deactivate()
                .map_err(|e| SinkError::Close(format!("JACK deactivate: {e}")))?;
            info!("JACK client deactivated after {} samples", self.played());
        }
        Ok(())
    }
}

impl AudioSink for JackSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn write(&mut self, samples: &[f32]) -> SinkResult<()> {
        let queue = self
            .queue
            .as_ref()
            .ok_or_else(|| SinkError::Write("JACK output already closed".into()))?;

        let mut block = samples.to_vec();
        loop {
            self.check_running()?;
            match queue.send_timeout(block, Duration::from_millis(PROGRESS_UPDATE_INTERVAL_MS)) {
                Ok(()) => break,
                Err(SendTimeoutError::Timeout(returned)) => block = returned,
                Err(SendTimeoutError::Disconnected(_)) => {
                    return Err(SinkError::Write("JACK process callback is gone".into()));
                }
            }
        }
        self.queued += samples.len();
        Ok(())
    }

    fn close(&mut self) -> SinkResult<()> {
        // Dropping the sender lets the callback observe the end of stream
        if self.queue.take().is_some() {
            self.wait_drained()?;
        }
        self.deactivate()
    }
}

impl Drop for JackSink {
    fn drop(&mut self) {
        self.queue.take();
        if let Err(err) = self.deactivate() {
            error!("Error deactivating client: {}", err);
        }
    }
}
