//! Core processing engine
//!
//! Runs a rule over phrase files. [`Generator`] maps one file to one output
//! file line by line; [`BatchProcessor`] spreads a corpus over the rayon pool
//! and buckets the passwords by length.

use crate::cli::{Args, Command};
use crate::encoding::PhraseLines;
use crate::filter::LengthRange;
use crate::output::{ensure_output_dir, partition_name, OutputWriter, PartitionedOutput};
use crate::progress::{
    create_bytes_progress_bar, create_lines_progress_bar, format_number, print_bullet, print_header,
    print_info, print_success, print_warning, Heartbeat, ProcessingStats,
};
use crate::rules::Rule;

use bytesize::ByteSize;
use colored::*;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Lines handed to the worker pool at once
pub const CHUNK_LINES: usize = 64 * 1024;

/// Configuration of the `apply` command
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub buffer_size: usize,
    pub quiet: bool,
    pub verbose: bool,
}

impl GeneratorConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let Command::Apply { input, output, .. } = &args.command else {
            anyhow::bail!("Not an apply command");
        };

        Ok(Self {
            input: input.clone(),
            output: output.clone(),
            buffer_size: args.parse_buffer_size()?,
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }
}

/// Applies a rule to every line of one file, keeping the line order
pub struct Generator {
    rule: Rule,
    config: GeneratorConfig,
    stats: Arc<ProcessingStats>,
}

impl Generator {
    pub fn new(rule: Rule, config: GeneratorConfig) -> Self {
        Self {
            rule,
            config,
            stats: Arc::new(ProcessingStats::new()),
        }
    }

    pub fn process(&self) -> anyhow::Result<()> {
        let input = &self.config.input;
        if !input.is_file() {
            anyhow::bail!("Input file does not exist: {:?}", input);
        }

        let mut lines = PhraseLines::open(input)?;
        let size = lines.size() as u64;
        self.stats.add_file(size);

        if !self.config.quiet {
            print_header("Generating passwords...");
            print_info(&format!("Input:  {:?} ({}, {})", input, ByteSize(size), lines.encoding().name()));
            print_info(&format!("Output: {:?}", self.config.output));
        }

        let mut output = OutputWriter::new(self.config.output.clone(), self.config.buffer_size)?;

        let pb = if self.config.quiet {
            ProgressBar::hidden()
        } else {
            create_bytes_progress_bar(size, "Generating...")
        };

        loop {
            let chunk = lines.read_chunk(CHUNK_LINES);
            if chunk.is_empty() {
                break;
            }

            // par_iter keeps the input order in the collected vector
            let passwords: Vec<String> = chunk.par_iter().map(|line| self.rule.apply(line)).collect();
            for password in &passwords {
                output.write_line(password)?;
            }

            self.stats.add_lines(chunk.len() as u64);
            self.stats.add_written(passwords.len() as u64);
            pb.set_position(lines.position() as u64);
        }

        output.flush()?;
        self.stats.add_lossy(lines.lossy_lines());
        self.stats.complete_file(size);
        pb.finish_with_message("Complete".green().to_string());

        if !self.config.quiet {
            print_success(&format!(
                "{} passwords written to {:?}",
                format_number(output.lines_written()),
                output.path()
            ));
            if self.config.verbose {
                self.stats.print_summary();
            }
        }

        Ok(())
    }

    pub fn stats(&self) -> Arc<ProcessingStats> {
        Arc::clone(&self.stats)
    }
}

/// Configuration of the `batch` command
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub lengths: LengthRange,
    pub recursive: bool,
    pub extensions: Vec<String>,
    pub buffer_size: usize,
    pub quiet: bool,
    pub verbose: bool,
}

impl BatchConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let Command::Batch {
            input,
            output,
            min_length,
            max_length,
            recursive,
            ..
        } = &args.command
        else {
            anyhow::bail!("Not a batch command");
        };

        Ok(Self {
            input: input.clone(),
            output_dir: output.clone(),
            lengths: LengthRange::new(*min_length, *max_length)?,
            recursive: *recursive,
            extensions: args.get_extensions(),
            buffer_size: args.parse_buffer_size()?,
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }
}

/// Applies a rule to a whole corpus and writes `length-<N>.txt` partitions
pub struct BatchProcessor {
    rule: Rule,
    config: BatchConfig,
    stats: Arc<ProcessingStats>,
}

impl BatchProcessor {
    pub fn new(rule: Rule, config: BatchConfig) -> Self {
        Self {
            rule,
            config,
            stats: Arc::new(ProcessingStats::new()),
        }
    }

    /// Process input (file or directory)
    pub fn process(&self) -> anyhow::Result<()> {
        if !self.config.quiet {
            print_header("Scanning input...");
        }

        let files = self.collect_files(&self.config.input)?;

        if files.is_empty() {
            print_warning("No files found to process!");
            return Ok(());
        }

        if !self.config.quiet {
            let total_size: u64 = files.iter().map(|(_, size)| *size).sum();
            print_info(&format!("Found {} files ({} total)", files.len(), ByteSize(total_size)));
            print_header(&format!(
                "Generating passwords of length {} to {}...",
                self.config.lengths.min(),
                self.config.lengths.max()
            ));
        }

        ensure_output_dir(&self.config.output_dir)?;
        let mut output = PartitionedOutput::new(self.config.output_dir.clone(), self.config.buffer_size);

        let heartbeat = Heartbeat::new(if self.config.quiet {
            ProgressBar::hidden()
        } else {
            create_lines_progress_bar("Generating...")
        });

        for (path, size) in &files {
            if self.config.verbose {
                heartbeat
                    .bar()
                    .set_message(format!("Processing {:?}...", path.file_name().unwrap_or_default()));
            }

            self.process_file(path, &heartbeat, &mut output)?;
            self.stats.complete_file(*size);
        }

        output.flush_all()?;
        heartbeat.bar().set_position(self.stats.get_total_lines());
        heartbeat.bar().finish_with_message("Complete".green().to_string());

        if !self.config.quiet {
            print_success("Output files created:");
            for ((len, path), (_, lines, _)) in output.get_paths().into_iter().zip(output.get_stats()) {
                print_bullet(&format!("Length {}: {:?} ({} passwords)", len, path, format_number(lines)));
            }
            self.stats.print_summary();
        }

        Ok(())
    }

    /// Collect all files to process
    fn collect_files(&self, input: &Path) -> anyhow::Result<Vec<(PathBuf, u64)>> {
        let mut files = Vec::new();

        if input.is_file() {
            let size = fs::metadata(input)?.len();
            files.push((input.to_path_buf(), size));
            self.stats.add_file(size);
        } else if input.is_dir() {
            let walker = if self.config.recursive {
                WalkDir::new(input)
            } else {
                WalkDir::new(input).max_depth(1)
            };

            for entry in walker.sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();

                if path.is_file() {
                    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                        if self.config.extensions.contains(&ext.to_lowercase()) {
                            let size = fs::metadata(path)?.len();
                            files.push((path.to_path_buf(), size));
                            self.stats.add_file(size);
                        }
                    }
                }
            }
        } else {
            anyhow::bail!("Input path does not exist: {:?}", input);
        }

        Ok(files)
    }

    /// Run the rule over one file and route its passwords
    fn process_file(&self, path: &Path, heartbeat: &Heartbeat, output: &mut PartitionedOutput) -> anyhow::Result<()> {
        let mut lines = PhraseLines::open(path)?;
        log::debug!("Processing {:?} as {}", path, lines.encoding().name());

        loop {
            let chunk = lines.read_chunk(CHUNK_LINES);
            if chunk.is_empty() {
                break;
            }

            let routed: Vec<Option<(usize, String)>> = chunk
                .par_iter()
                .map(|line| {
                    if heartbeat.beat(self.stats.add_line()) {
                        self.stats.add_heartbeat();
                    }
                    let password = self.rule.apply(line);
                    self.config.lengths.route(&password).map(|len| (len, password))
                })
                .collect();

            for entry in routed {
                match entry {
                    Some((length, password)) => {
                        output.write_line(&password, length)?;
                        self.stats.increment_partition(&partition_name(length));
                        self.stats.add_written(1);
                    }
                    None => self.stats.add_dropped(1),
                }
            }
        }

        self.stats.add_lossy(lines.lossy_lines());
        Ok(())
    }

    pub fn stats(&self) -> Arc<ProcessingStats> {
        Arc::clone(&self.stats)
    }
}
