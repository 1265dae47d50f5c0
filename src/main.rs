use clap::{Parser, ValueEnum};
use pocsag_tx::audio::{AudioSink, RawSink, WavSink};
use pocsag_tx::device::JackSink;
use pocsag_tx::error::SinkError;
use pocsag_tx::phy::{DataType, Page};
use pocsag_tx::transmission::{PagerSender, TransmitterConfig};
use pocsag_tx::ui::{self, progress::ProgressManager};
use pocsag_tx::utils::consts::*;
use pocsag_tx::utils::dump::{TransmissionDump, format_words_binary};
use pocsag_tx::utils::logging::init_logging;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Output {
    /// Live playback through JACK
    Jack,
    /// 16-bit WAV file
    Wav,
    /// Raw PCM on stdout
    Raw,
}

#[derive(Parser)]
#[command(author, version, about = "POCSAG pager transmitter (audio-level output)", long_about = None)]
struct Cli {
    /// Receiver address (capcode, 21 bits)
    #[arg(short, long)]
    address: u32,

    /// Function bits (0-3)
    #[arg(short, long, default_value_t = TEXT_FUNCTION, value_parser = clap::value_parser!(u8).range(0..=3))]
    function: u8,

    /// Message text; prompted for when omitted
    #[arg(short, long)]
    message: Option<String>,

    /// Send the message as numeric digits
    #[arg(long)]
    numeric: bool,

    /// Baud rate (512/1200/2400)
    #[arg(short, long)]
    rate: Option<u32>,

    /// Invert the output levels
    #[arg(short, long)]
    inverted: bool,

    /// JSON transmitter config
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Output::Jack)]
    output: Output,

    /// Target file for `--output wav`
    #[arg(long, default_value = "pocsag.wav")]
    wav_path: PathBuf,

    /// Print every word as 32 binary digits
    #[arg(long)]
    print_words: bool,

    /// Write the assembled words as JSON
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<TransmitterConfig, String> {
    let mut config = match &cli.config {
        Some(path) => TransmitterConfig::from_json_file(path).map_err(|e| e.to_string())?,
        None => TransmitterConfig::default(),
    };
    if let Some(rate) = cli.rate {
        config.bit_rate = rate;
    }
    config.inverted |= cli.inverted;
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn read_message(cli: &Cli) -> Result<String, String> {
    match &cli.message {
        Some(message) => Ok(message.clone()),
        None => dialoguer::Input::<String>::new()
            .with_prompt("Message")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| format!("Failed to read message: {}", e)),
    }
}

fn open_jack() -> Result<JackSink, SinkError> {
    let running = Arc::new(AtomicBool::new(true));

    // Ctrl+C stops playback through the sink instead of killing the JACK client
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .ok(); // Ignore error if handler already set

    Ok(JackSink::open(JACK_CLIENT_NAME, OUTPUT_PORT_NAME)?.with_running_flag(running))
}

fn open_sink(cli: &Cli, config: &TransmitterConfig) -> Result<Box<dyn AudioSink>, SinkError> {
    Ok(match cli.output {
        Output::Jack => Box::new(open_jack()?),
        Output::Wav => Box::new(WavSink::create(
            &cli.wav_path,
            config.sample_rate,
            config.channels,
        )?),
        Output::Raw => Box::new(RawSink::new(
            BufWriter::new(io::stdout().lock()),
            config.sample_rate,
            config.channels,
            config.pcm_format,
        )),
    })
}

fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(&cli)?;
    let message = read_message(&cli)?;

    let page = Page {
        address: cli.address,
        function: cli.function,
        message,
        data_type: if cli.numeric {
            DataType::Numeric
        } else {
            DataType::Alphanumeric
        },
    };
    if cli.address > 0x1F_FFFF {
        warn!("Address {} exceeds 21 bits and will be truncated", cli.address);
    }

    let sender = PagerSender::new(config.clone());
    let transmission = sender.encode(&page);

    if cli.print_words {
        let listing = format_words_binary(transmission.words());
        match cli.output {
            // stdout is reserved for samples
            Output::Raw => eprint!("{}", listing),
            _ => print!("{}", listing),
        }
    }
    if let Some(path) = &cli.dump {
        TransmissionDump::new(&page, &transmission, config.bit_rate)
            .write_json(path)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        info!("Words written to {}", path.display());
    }

    let mut sink = open_sink(&cli, &config).map_err(|e| e.to_string())?;
    let progress = ProgressManager::new();
    let progress = match cli.output {
        Output::Raw => None,
        _ => Some(&progress),
    };

    sender
        .send_transmission(&transmission, &mut sink, progress)
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    ui::print_banner();

    match run(Cli::parse()) {
        Ok(()) => {
            info!("Exiting gracefully...");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
