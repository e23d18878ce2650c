pub mod binary;
pub mod source;
pub mod text;

use std::io::{self, BufRead, BufReader, Read};

pub use source::{InputSource, Rewind};

/// One bit destined for modulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Zero,
    One,
}

impl Symbol {
    pub fn from_bit(bit: u8) -> Self {
        if bit & 1 == 1 {
            Symbol::One
        } else {
            Symbol::Zero
        }
    }

    pub fn is_on(self) -> bool {
        self == Symbol::One
    }
}

/// How input units are turned into symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Every byte is 8 symbols, least-significant bit first
    Binary,
    /// ASCII '0' / '1' characters, everything else skipped
    Text,
}

impl InputMode {
    /// Symbols produced by a single input unit (byte or character)
    pub fn decode(self, unit: u8, out: &mut Vec<Symbol>) {
        match self {
            InputMode::Binary => out.extend(binary::byte_symbols(unit)),
            InputMode::Text => out.extend(text::char_symbol(unit)),
        }
    }
}

/// Reads one unit at a time from the input and hands out symbols
///
/// A read error ends the current pass exactly like end-of-stream does.
pub struct SymbolReader<R: Read> {
    reader: BufReader<R>,
    mode: InputMode,
    pending: Vec<Symbol>,
    cursor: usize,
}

impl<R: Read> SymbolReader<R> {
    pub fn new(inner: R, mode: InputMode) -> Self {
        Self {
            reader: BufReader::new(inner),
            mode,
            pending: Vec::with_capacity(8),
            cursor: 0,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Read the next unit, `None` once the stream is exhausted or broken
    fn next_unit(&mut self) -> Option<u8> {
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!("input read failed, treating as end of stream: {}", e);
                    return None;
                }
            };
            let unit = *buf.first()?;
            self.reader.consume(1);
            return Some(unit);
        }
    }

    /// Next symbol of the current pass
    pub fn next_symbol(&mut self) -> Option<Symbol> {
        while self.cursor >= self.pending.len() {
            self.pending.clear();
            self.cursor = 0;
            let unit = self.next_unit()?;
            self.mode.decode(unit, &mut self.pending);
        }
        let symbol = self.pending[self.cursor];
        self.cursor += 1;
        Some(symbol)
    }
}

impl<R: Read + Rewind> SymbolReader<R> {
    /// Seek the underlying input back to its start, dropping anything buffered
    pub fn rewind(&mut self) -> io::Result<()> {
        self.reader.get_mut().rewind()?;
        // Bytes read ahead of the old position are stale now
        let stale = self.reader.buffer().len();
        self.reader.consume(stale);
        self.pending.clear();
        self.cursor = 0;
        Ok(())
    }
}

impl<R: Read> Iterator for SymbolReader<R> {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        self.next_symbol()
    }
}
