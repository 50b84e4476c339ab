//! Pointer output sinks.
//!
//! The pipeline publishes one [`PointerFrame`] per processed frame to every
//! registered sink. Overlay renderers and cursor injectors live outside this
//! crate and plug in through [`PointerSink`]; the JSONL writer here records
//! the stream to disk.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ipoint_common::error::{IpointError, IpointResult};
use ipoint_model::pointer::PointerFrame;
use ipoint_model::stream::{PointerRecord, PointerStreamHeader};

/// Receives pointer frames from the tracking pipeline.
pub trait PointerSink: Send {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Handle one frame.
    fn publish(&mut self, frame: &PointerFrame) -> IpointResult<()>;

    /// Flush any buffered output.
    fn flush(&mut self) -> IpointResult<()> {
        Ok(())
    }
}

/// Keeps every frame in memory. Handy for tests and short replays.
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Vec<PointerFrame>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[PointerFrame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<PointerFrame> {
        self.frames
    }
}

impl PointerSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn publish(&mut self, frame: &PointerFrame) -> IpointResult<()> {
        self.frames.push(*frame);
        Ok(())
    }
}

const WRITER_SINK: &str = "jsonl";

/// Writes pointer records to a JSONL file in append-only mode.
pub struct JsonlPointerWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    records_written: u64,
}

impl JsonlPointerWriter {
    /// Create the file, writing the header as the first line.
    pub fn create(path: impl AsRef<Path>, header: &PointerStreamHeader) -> IpointResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);

        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| IpointError::sink(WRITER_SINK, format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            path,
            records_written: 0,
        })
    }

    /// Write one record as a JSONL line.
    pub fn write_record(&mut self, record: &PointerRecord) -> IpointResult<()> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| IpointError::sink(WRITER_SINK, format!("Failed to write record: {e}")))?;
        self.records_written += 1;

        if self.records_written % 1000 == 0 {
            self.flush_buffer()?;
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> IpointResult<()> {
        self.writer
            .flush()
            .map_err(|e| IpointError::sink(WRITER_SINK, format!("Failed to flush records: {e}")))
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointerSink for JsonlPointerWriter {
    fn name(&self) -> &str {
        WRITER_SINK
    }

    fn publish(&mut self, frame: &PointerFrame) -> IpointResult<()> {
        self.write_record(&PointerRecord::from(frame))
    }

    fn flush(&mut self) -> IpointResult<()> {
        self.flush_buffer()
    }
}

impl Drop for JsonlPointerWriter {
    fn drop(&mut self) {
        let _ = self.flush_buffer();
    }
}
