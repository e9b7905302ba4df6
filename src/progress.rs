//! Progress display module
//!
//! Styled status output, progress bars and processing statistics.

use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Lines between two liveness signals of a batch worker
pub const HEARTBEAT_INTERVAL: u64 = 1000;

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════╗
║    ____ __        __  ____        _                          ║
║   |  _ \\ \      / / |  _ \ _   _| | ___  ___               ║
║   | |_) |\ \ /\ / /  | |_) | | | | |/ _ \/ __|              ║
║   |  __/  \ V  V /   |  _ <| |_| | |  __/\__ \              ║
║   |_|      \_/\_/    |_| \_\\__,_|_|\___||___/              ║
║                                                              ║
║          Password Generation Rules For Text Corpora          ║
║                                                   v0.1.0     ║
╚══════════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a styled progress bar counting lines
pub fn create_lines_progress_bar(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} lines ({per_sec}) {msg}")
            .unwrap()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Create a bytes-based progress bar
pub fn create_bytes_progress_bar(total_bytes: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);

    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Processing statistics, shared between workers
#[derive(Debug)]
pub struct ProcessingStats {
    pub total_files: AtomicU64,
    pub processed_files: AtomicU64,
    pub total_bytes: AtomicU64,
    pub processed_bytes: AtomicU64,
    pub total_lines: AtomicU64,
    pub written_lines: AtomicU64,
    pub dropped_lines: AtomicU64,
    pub lossy_lines: AtomicU64,
    pub heartbeats: AtomicU64,
    partitions: Mutex<BTreeMap<String, u64>>,
    pub start_time: Instant,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            total_files: AtomicU64::new(0),
            processed_files: AtomicU64::new(0),
            total_bytes: AtomicU64::new(0),
            processed_bytes: AtomicU64::new(0),
            total_lines: AtomicU64::new(0),
            written_lines: AtomicU64::new(0),
            dropped_lines: AtomicU64::new(0),
            lossy_lines: AtomicU64::new(0),
            heartbeats: AtomicU64::new(0),
            partitions: Mutex::new(BTreeMap::new()),
            start_time: Instant::now(),
        }
    }

    pub fn add_file(&self, size: u64) {
        self.total_files.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_add(size, Ordering::Relaxed);
    }

    pub fn complete_file(&self, size: u64) {
        self.processed_files.fetch_add(1, Ordering::Relaxed);
        self.processed_bytes.fetch_add(size, Ordering::Relaxed);
    }

    /// Count a processed line and return the new total
    pub fn add_line(&self) -> u64 {
        self.total_lines.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn add_lines(&self, count: u64) {
        self.total_lines.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_written(&self, count: u64) {
        self.written_lines.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_dropped(&self, count: u64) {
        self.dropped_lines.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_lossy(&self, count: u64) {
        self.lossy_lines.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_heartbeat(&self) {
        self.heartbeats.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the counter of a named output partition
    pub fn increment_partition(&self, name: &str) {
        let mut partitions = self.partitions.lock().unwrap_or_else(|e| e.into_inner());
        *partitions.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Snapshot of the partition counters, by name
    pub fn partition_counts(&self) -> BTreeMap<String, u64> {
        self.partitions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn get_total_files(&self) -> u64 {
        self.total_files.load(Ordering::Relaxed)
    }

    pub fn get_processed_files(&self) -> u64 {
        self.processed_files.load(Ordering::Relaxed)
    }

    pub fn get_total_bytes(&self) -> u64 {
        self.total_bytes.load(Ordering::Relaxed)
    }

    pub fn get_processed_bytes(&self) -> u64 {
        self.processed_bytes.load(Ordering::Relaxed)
    }

    pub fn get_total_lines(&self) -> u64 {
        self.total_lines.load(Ordering::Relaxed)
    }

    pub fn get_written_lines(&self) -> u64 {
        self.written_lines.load(Ordering::Relaxed)
    }

    pub fn get_dropped_lines(&self) -> u64 {
        self.dropped_lines.load(Ordering::Relaxed)
    }

    pub fn get_lossy_lines(&self) -> u64 {
        self.lossy_lines.load(Ordering::Relaxed)
    }

    pub fn get_heartbeats(&self) -> u64 {
        self.heartbeats.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn lines_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.get_total_lines() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print final statistics
    pub fn print_summary(&self) {
        println!();
        println!("{}", "═".repeat(60).green());
        println!("{}", "                    PROCESSING COMPLETE".green().bold());
        println!("{}", "═".repeat(60).green());
        println!();

        println!("  {} {}/{}", "Files processed:".green(),
            self.get_processed_files(), self.get_total_files());
        println!("  {} {} / {}", "Data processed: ".green(),
            ByteSize(self.get_processed_bytes()),
            ByteSize(self.get_total_bytes()));
        println!();

        println!("  {} {}", "Phrases:        ".green(), format_number(self.get_total_lines()));
        println!("  {} {}", "Passwords:      ".green().bold(),
            format_number(self.get_written_lines()).green().bold());

        let dropped = self.get_dropped_lines();
        if dropped > 0 {
            println!("  {} {}", "Out of range:   ".yellow(), format_number(dropped));
        }

        let lossy = self.get_lossy_lines();
        if lossy > 0 {
            println!("  {} {}", "Lossy decoded:  ".red(), format_number(lossy).red());
        }

        let partitions = self.partition_counts();
        if !partitions.is_empty() {
            println!();
            for (name, count) in &partitions {
                println!("  {} {:<16} {}", "•".green(), name, format_number(*count));
            }
        }

        println!();
        println!("  {} {}", "Duration:       ".green(), format_duration(self.elapsed()));
        println!("  {} {:.2} lines/sec", "Throughput:     ".green(), self.lines_per_second());
        println!();
        println!("{}", "═".repeat(60).green());
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Liveness signal for long corpus scans.
///
/// Workers call [`Heartbeat::beat`] with the running line count; every
/// [`HEARTBEAT_INTERVAL`] lines the progress display is refreshed.
pub struct Heartbeat {
    bar: ProgressBar,
    interval: u64,
}

impl Heartbeat {
    pub fn new(bar: ProgressBar) -> Self {
        Self {
            bar,
            interval: HEARTBEAT_INTERVAL,
        }
    }

    /// Returns true when this count triggered a signal
    pub fn beat(&self, processed: u64) -> bool {
        if processed % self.interval != 0 {
            return false;
        }
        self.bar.set_position(processed);
        log::trace!("Heartbeat at {} lines", processed);
        true
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    }
}
