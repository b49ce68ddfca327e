//! Serialize a small stream of tagged records to a file and read the raw
//! bytes back, showing the staging buffer, string interning and the
//! `std::io` adapter working together.
//!
//! Run with
//!
//! ```bash
//! cargo run -p datamodem --example record_stream
//! ```

use std::fs::File;
use std::io::{BufWriter, Read};

use datamodem::{DataWriter, IoSink};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join("datamodem-record-stream.bin");

    // Each record: interned tag, i64 timestamp, UTF payload.
    let records = [
        ("sensor/temp", 1_722_550_000i64, "21.5°C"),
        ("sensor/hum", 1_722_550_001, "40%"),
        ("sensor/temp", 1_722_550_002, "21.6°C"),
        ("sensor/temp", 1_722_550_003, "21.8°C"),
    ];

    let file = BufWriter::new(File::create(&path)?);
    let mut writer = DataWriter::using_3byte_sequences(IoSink(file));
    for (tag, at, payload) in records {
        writer.write_interned_utf(tag)?;
        writer.write_i64(at)?;
        writer.write_utf(payload)?;
    }
    writer.flush()?;
    writer.close()?;

    let mut bytes = Vec::new();
    File::open(&path)?.read_to_end(&mut bytes)?;
    println!("wrote {} records in {} bytes:", records.len(), bytes.len());
    for chunk in bytes.chunks(16) {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02X}")).collect();
        println!("  {}", hex.join(" "));
    }

    std::fs::remove_file(&path)?;
    Ok(())
}
