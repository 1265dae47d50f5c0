use crate::phy::{DataType, Page, Transmission};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Record of an assembled transmission
#[derive(Debug, Serialize, Deserialize)]
pub struct TransmissionDump {
    pub address: u32,
    pub function: u8,
    pub data_type: DataType,
    pub message: String,
    pub bit_rate: u32,
    pub duration_secs: f64,
    /// Words as `0x%08X`
    pub words: Vec<String>,
}

impl TransmissionDump {
    pub fn new(page: &Page, transmission: &Transmission, bit_rate: u32) -> Self {
        Self {
            address: page.address,
            function: page.function & 0x3,
            data_type: page.data_type,
            message: page.message.clone(),
            bit_rate,
            duration_secs: transmission.duration_secs(bit_rate),
            words: transmission
                .words()
                .iter()
                .map(|w| format!("0x{w:08X}"))
                .collect(),
        }
    }

    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

/// One word per line as 32 binary digits
pub fn format_words_binary(words: &[u32]) -> String {
    words.iter().map(|w| format!("{w:032b}\n")).collect()
}
