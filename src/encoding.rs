//! Phrase input
//!
//! Reads phrase corpora line by line. Files are memory-mapped and their
//! encoding is sniffed from the first bytes, so Latin-1 or UTF-16 corpora are
//! transcoded to UTF-8 before they reach the rules.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes sampled for encoding detection
const DETECTION_SAMPLE: usize = 64 * 1024;

/// Detect the encoding of a file from its BOM or a sample of its content
pub fn detect_encoding(path: &Path) -> anyhow::Result<&'static Encoding> {
    let mut sample = Vec::with_capacity(DETECTION_SAMPLE);
    File::open(path)?
        .take(DETECTION_SAMPLE as u64)
        .read_to_end(&mut sample)?;

    if sample.is_empty() {
        return Ok(encoding_rs::UTF_8);
    }

    if let Some((encoding, _)) = Encoding::for_bom(&sample) {
        return Ok(encoding);
    }

    if std::str::from_utf8(&sample).is_ok() {
        return Ok(encoding_rs::UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(&sample, sample.len() < DETECTION_SAMPLE);
    let encoding = detector.guess(None, true);
    log::debug!("Detected {} for {:?}", encoding.name(), path);

    Ok(encoding)
}

/// Iterator over the lines of a phrase file.
///
/// Every line is yielded, empty ones included, so that outputs stay aligned
/// with inputs. Line terminators (`\n` or `\r\n`) are removed.
pub struct PhraseLines {
    mmap: Option<memmap2::Mmap>,
    encoding: &'static Encoding,
    position: usize,
    lossy_lines: u64,
}

impl PhraseLines {
    /// Open a file with automatic encoding detection
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let encoding = detect_encoding(path)?;
        Self::with_encoding(path, encoding)
    }

    /// Open a file with a known encoding
    pub fn with_encoding(path: &Path, encoding: &'static Encoding) -> anyhow::Result<Self> {
        let file = File::open(path)?;

        // Empty files cannot be mapped on every platform
        if file.metadata()?.len() == 0 {
            return Ok(Self {
                mmap: None,
                encoding,
                position: 0,
                lossy_lines: 0,
            });
        }

        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        let position = Encoding::for_bom(&mmap).map_or(0, |(_, bom_len)| bom_len);

        Ok(Self {
            mmap: Some(mmap),
            encoding,
            position,
            lossy_lines: 0,
        })
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Total size of the mapped file in bytes
    pub fn size(&self) -> usize {
        self.mmap.as_ref().map_or(0, |m| m.len())
    }

    /// Byte offset of the next line
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of lines that needed lossy decoding so far
    pub fn lossy_lines(&self) -> u64 {
        self.lossy_lines
    }

    /// Collect up to `max` lines
    pub fn read_chunk(&mut self, max: usize) -> Vec<String> {
        self.by_ref().take(max).collect()
    }

    fn decode(&mut self, start: usize, end: usize) -> String {
        let Some(mmap) = self.mmap.as_ref() else {
            return String::new();
        };
        let bytes = &mmap[start..end];

        let (decoded, had_errors) = if self.encoding == encoding_rs::UTF_8 {
            match std::str::from_utf8(bytes) {
                Ok(s) => (s.to_string(), false),
                Err(_) => (String::from_utf8_lossy(bytes).into_owned(), true),
            }
        } else {
            let (decoded, had_errors) = self.encoding.decode_without_bom_handling(bytes);
            (decoded.into_owned(), had_errors)
        };

        if had_errors {
            self.lossy_lines += 1;
            log::warn!("Encoding errors in line at byte {}, using lossy conversion", start);
        }

        decoded
    }

    /// Find the end of the current line and the start of the next one.
    ///
    /// Lines end at `\n`, `\r\n` or a lone `\r`.
    fn line_bounds(&self, data: &[u8]) -> (usize, usize) {
        let remaining = &data[self.position..];

        if self.encoding == encoding_rs::UTF_16LE || self.encoding == encoding_rs::UTF_16BE {
            // Terminators are two-byte units here, search on unit boundaries
            let (newline, cr): ([u8; 2], [u8; 2]) = if self.encoding == encoding_rs::UTF_16LE {
                ([b'\n', 0], [b'\r', 0])
            } else {
                ([0, b'\n'], [0, b'\r'])
            };
            let found = remaining
                .chunks_exact(2)
                .position(|unit| unit == newline || unit == cr)
                .map(|i| i * 2);
            return match found {
                Some(i) => {
                    let crlf = remaining[i..i + 2] == cr && remaining.get(i + 2..i + 4) == Some(&newline[..]);
                    let next = if crlf { i + 4 } else { i + 2 };
                    (self.position + i, self.position + next)
                }
                None => (data.len(), data.len()),
            };
        }

        match memchr::memchr2(b'\n', b'\r', remaining) {
            Some(i) => {
                let crlf = remaining[i] == b'\r' && remaining.get(i + 1) == Some(&b'\n');
                let next = if crlf { i + 2 } else { i + 1 };
                (self.position + i, self.position + next)
            }
            None => (data.len(), data.len()),
        }
    }
}

impl Iterator for PhraseLines {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let (end, next) = {
            let mmap = self.mmap.as_ref()?;
            if self.position >= mmap.len() {
                return None;
            }
            self.line_bounds(mmap)
        };

        let start = self.position;
        self.position = next;
        Some(self.decode(start, end))
    }
}
