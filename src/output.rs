//! Output management module
//!
//! Buffered writers for generated passwords: a single ordered output file for
//! the `apply` command and one partition file per password length for `batch`.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Prefix of the partition files and counters of the batch mode
pub const PARTITION_PREFIX: &str = "length-";

/// Name of the partition holding passwords of `length` characters
pub fn partition_name(length: usize) -> String {
    format!("{}{}", PARTITION_PREFIX, length)
}

/// Output file writer with buffering
pub struct OutputWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: u64,
    bytes_written: u64,
}

impl OutputWriter {
    /// Create (or truncate) the file at `path`
    pub fn new(path: PathBuf, buffer_size: usize) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            writer: BufWriter::with_capacity(buffer_size, file),
            path,
            lines_written: 0,
            bytes_written: 0,
        })
    }

    /// Write a line to the output
    pub fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.lines_written += 1;
        self.bytes_written += line.len() as u64 + 1; // +1 for newline
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// One output file per password length, created on first use
pub struct PartitionedOutput {
    writers: BTreeMap<usize, OutputWriter>,
    output_dir: PathBuf,
    buffer_size: usize,
}

impl PartitionedOutput {
    pub fn new(output_dir: PathBuf, buffer_size: usize) -> Self {
        Self {
            writers: BTreeMap::new(),
            output_dir,
            buffer_size,
        }
    }

    /// Path of the partition file for `length`
    pub fn partition_path(&self, length: usize) -> PathBuf {
        self.output_dir.join(format!("{}.txt", partition_name(length)))
    }

    /// Write a password to the partition of its length
    pub fn write_line(&mut self, line: &str, length: usize) -> anyhow::Result<()> {
        if !self.writers.contains_key(&length) {
            let writer = OutputWriter::new(self.partition_path(length), self.buffer_size)?;
            self.writers.insert(length, writer);
        }

        match self.writers.get_mut(&length) {
            Some(writer) => writer.write_line(line),
            None => anyhow::bail!("No writer for {}", partition_name(length)),
        }
    }

    /// Flush all writers
    pub fn flush_all(&mut self) -> anyhow::Result<()> {
        for writer in self.writers.values_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    /// `(length, lines, bytes)` of every partition written so far, by length
    pub fn get_stats(&self) -> Vec<(usize, u64, u64)> {
        self.writers
            .iter()
            .map(|(&len, w)| (len, w.lines_written(), w.bytes_written()))
            .collect()
    }

    /// Output paths by length
    pub fn get_paths(&self) -> Vec<(usize, PathBuf)> {
        self.writers
            .iter()
            .map(|(&len, w)| (len, w.path().to_path_buf()))
            .collect()
    }
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
