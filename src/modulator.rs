//! On-Off-Keying of a symbol stream into baseband IQ samples.
//!
//! Every symbol is held for `symbol_period_us`, which at `sample_rate_hz`
//! is `floor(symbol_period_us * sample_rate_hz / 1e6)` identical sample
//! pairs. A one keys the I channel fully on, a zero leaves it off, and Q
//! stays silent throughout.

use std::io::{self, Read};

use crate::input::{InputMode, Rewind, Symbol, SymbolReader};
use crate::output::IqSink;

pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 10_000_000;
pub const DEFAULT_SYMBOL_PERIOD_US: u32 = 127;

const MICROS_PER_SECOND: u64 = 1_000_000;

/// Signed 8-bit IQ sample pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IqSample {
    pub i: i8,
    pub q: i8,
}

impl IqSample {
    pub const ON: IqSample = IqSample { i: 127, q: 0 };
    pub const OFF: IqSample = IqSample { i: 0, q: 0 };

    pub fn new(i: i8, q: i8) -> Self {
        Self { i, q }
    }

    pub fn for_symbol(symbol: Symbol) -> Self {
        if symbol.is_on() {
            Self::ON
        } else {
            Self::OFF
        }
    }

    /// Wire bytes, I first
    pub fn to_bytes(self) -> [u8; 2] {
        [self.i as u8, self.q as u8]
    }
}

/// Timing for a run, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OokConfig {
    pub sample_rate_hz: u32,
    pub symbol_period_us: u32,
}

impl Default for OokConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            symbol_period_us: DEFAULT_SYMBOL_PERIOD_US,
        }
    }
}

impl OokConfig {
    pub fn samples_per_symbol(&self) -> u64 {
        self.symbol_period_us as u64 * self.sample_rate_hz as u64 / MICROS_PER_SECOND
    }
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Complete passes over the input
    pub passes: u64,
    pub symbols: u64,
    /// Sample pairs written
    pub samples: u64,
}

pub struct Modulator<'a> {
    config: &'a OokConfig,
    mode: InputMode,
}

impl<'a> Modulator<'a> {
    pub fn new(config: &'a OokConfig, mode: InputMode) -> Self {
        Self { config, mode }
    }

    pub fn samples_per_symbol(&self) -> u64 {
        self.config.samples_per_symbol()
    }

    /// Modulate one pass over `input`, stopping at end of stream
    pub fn run_once<R, S>(&self, input: R, sink: &mut S) -> io::Result<RunSummary>
    where
        R: Read,
        S: IqSink + ?Sized,
    {
        let mut reader = SymbolReader::new(input, self.mode);
        let mut summary = RunSummary::default();
        self.modulate_pass(&mut reader, sink, &mut summary)?;
        summary.passes = 1;
        sink.finish()?;
        Ok(summary)
    }

    /// Modulate `input`, looping back to its start forever when `repeat` is set
    ///
    /// A rewind that fails ends the run instead of spinning on end of stream.
    /// An empty seekable input with `repeat` never returns.
    pub fn run<R, S>(&self, input: R, sink: &mut S, repeat: bool) -> io::Result<RunSummary>
    where
        R: Read + Rewind,
        S: IqSink + ?Sized,
    {
        let mut reader = SymbolReader::new(input, self.mode);
        let mut summary = RunSummary::default();

        loop {
            let before = summary.samples;
            self.modulate_pass(&mut reader, sink, &mut summary)?;
            summary.passes += 1;
            tracing::debug!(
                "pass {} done: {} sample pairs",
                summary.passes,
                summary.samples - before
            );

            if !repeat {
                break;
            }
            if let Err(e) = reader.rewind() {
                tracing::warn!("cannot rewind input, stopping repeat: {}", e);
                break;
            }
        }

        sink.finish()?;
        Ok(summary)
    }

    fn modulate_pass<R, S>(
        &self,
        reader: &mut SymbolReader<R>,
        sink: &mut S,
        summary: &mut RunSummary,
    ) -> io::Result<()>
    where
        R: Read,
        S: IqSink + ?Sized,
    {
        let samples_per_symbol = self.samples_per_symbol();
        while let Some(symbol) = reader.next_symbol() {
            sink.write_run(IqSample::for_symbol(symbol), samples_per_symbol)?;
            summary.symbols += 1;
            summary.samples += samples_per_symbol;
        }
        Ok(())
    }
}
