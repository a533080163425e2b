//! Console I/O for befunge-plus.
//!
//! The interpreter talks to the outside world through two small traits so
//! that the CLI can use stdin/stdout while tests use in-memory buffers.
//!
//! # Input
//!
//! Both reads follow formatted stream extraction: leading ASCII whitespace is
//! skipped first.
//!
//! - `read_int`: optional sign and decimal digits. No digits, or end of
//!   input, reads as 0.
//! - `read_char`: the next byte. End of input reads as -1.
//!
//! # Output
//!
//! Integers are written in decimal with no separator; characters as a single
//! byte. Writers are flushed after every write so output interleaves with
//! prompts and reads.

use std::io::{BufRead, Write};

use crate::core::error::{BefError, BefResult};

// ═══════════════════════════════════════════════════════════════════════════════
// Traits
// ═══════════════════════════════════════════════════════════════════════════════

/// Source for the `&` and `~` instructions.
pub trait InputSource {
    /// Read a decimal integer.
    fn read_int(&mut self) -> BefResult<i64>;

    /// Read one byte, or -1 at end of input.
    fn read_char(&mut self) -> BefResult<i64>;
}

/// Sink for the `.` and `,` instructions.
pub trait OutputSink {
    fn write_int(&mut self, n: i64) -> BefResult<()>;

    fn write_char(&mut self, c: u8) -> BefResult<()>;

    fn flush(&mut self) -> BefResult<()> {
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Reader Input
// ═══════════════════════════════════════════════════════════════════════════════

/// Input from any buffered reader.
pub struct ReaderInput<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn peek_byte(&mut self) -> BefResult<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(BefError::io("read", e)),
            }
        }
    }

    fn next_byte(&mut self) -> BefResult<Option<u8>> {
        let byte = self.peek_byte()?;
        if byte.is_some() {
            self.reader.consume(1);
        }
        Ok(byte)
    }

    fn skip_whitespace(&mut self) -> BefResult<()> {
        while let Some(b) = self.peek_byte()? {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.reader.consume(1);
        }
        Ok(())
    }
}

impl ReaderInput<std::io::StdinLock<'static>> {
    /// Input from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(std::io::stdin().lock())
    }
}

impl<R: BufRead> InputSource for ReaderInput<R> {
    fn read_int(&mut self) -> BefResult<i64> {
        self.skip_whitespace()?;

        let negative = match self.peek_byte()? {
            Some(b'-') => {
                self.reader.consume(1);
                true
            }
            Some(b'+') => {
                self.reader.consume(1);
                false
            }
            _ => false,
        };

        let mut n: i64 = 0;
        while let Some(b) = self.peek_byte()? {
            if !b.is_ascii_digit() {
                break;
            }
            // Out-of-range input saturates, as stream extraction does
            n = n.saturating_mul(10).saturating_add((b - b'0') as i64);
            self.reader.consume(1);
        }

        Ok(if negative { -n } else { n })
    }

    fn read_char(&mut self) -> BefResult<i64> {
        self.skip_whitespace()?;
        Ok(self.next_byte()?.map_or(-1, |b| b as i64))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Writer Output
// ═══════════════════════════════════════════════════════════════════════════════

/// Output to any writer, flushed after each write.
pub struct WriterOutput<W: Write> {
    writer: W,
}

impl<W: Write> WriterOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterOutput<std::io::Stdout> {
    /// Output to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> OutputSink for WriterOutput<W> {
    fn write_int(&mut self, n: i64) -> BefResult<()> {
        write!(self.writer, "{}", n).map_err(|e| BefError::io("write", e))?;
        self.flush()
    }

    fn write_char(&mut self, c: u8) -> BefResult<()> {
        self.writer.write_all(&[c]).map_err(|e| BefError::io("write", e))?;
        self.flush()
    }

    fn flush(&mut self) -> BefResult<()> {
        self.writer.flush().map_err(|e| BefError::io("flush", e))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Recorded Output
// ═══════════════════════════════════════════════════════════════════════════════

/// One item written by `.` or `,`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputItem {
    Int(i64),
    Char(u8),
}

/// Output kept in memory.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    items: Vec<OutputItem>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[OutputItem] {
        &self.items
    }

    /// The bytes a console would have received.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for item in &self.items {
            match item {
                OutputItem::Int(n) => bytes.extend_from_slice(n.to_string().as_bytes()),
                OutputItem::Char(c) => bytes.push(*c),
            }
        }
        bytes
    }

    /// The output as text, with invalid UTF-8 replaced.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.to_bytes()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl OutputSink for OutputBuffer {
    fn write_int(&mut self, n: i64) -> BefResult<()> {
        self.items.push(OutputItem::Int(n));
        Ok(())
    }

    fn write_char(&mut self, c: u8) -> BefResult<()> {
        self.items.push(OutputItem::Char(c));
        Ok(())
    }
}
