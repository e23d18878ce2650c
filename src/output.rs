use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::modulator::IqSample;

/// Pairs per chunk when writing a run of identical samples
const RUN_CHUNK_PAIRS: usize = 4096;

/// Destination for generated IQ samples
pub trait IqSink {
    fn write_sample(&mut self, sample: IqSample) -> io::Result<()>;

    /// Write `count` copies of `sample`
    fn write_run(&mut self, sample: IqSample, count: u64) -> io::Result<()> {
        for _ in 0..count {
            self.write_sample(sample)?;
        }
        Ok(())
    }

    /// Flush whatever is still buffered
    fn finish(&mut self) -> io::Result<()>;
}

/// Headerless interleaved int8 I/Q, the format hackrf_transfer and friends read
pub struct RawIqWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> RawIqWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
        }
    }

    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> IqSink for RawIqWriter<W> {
    fn write_sample(&mut self, sample: IqSample) -> io::Result<()> {
        self.writer.write_all(&sample.to_bytes())
    }

    fn write_run(&mut self, sample: IqSample, count: u64) -> io::Result<()> {
        let pair = sample.to_bytes();
        let chunk_pairs = count.min(RUN_CHUNK_PAIRS as u64) as usize;
        let chunk: Vec<u8> = pair.iter().copied().cycle().take(chunk_pairs * 2).collect();

        let mut remaining = count;
        while remaining > 0 {
            let n = remaining.min(chunk_pairs as u64) as usize;
            self.writer.write_all(&chunk[..n * 2])?;
            remaining -= n as u64;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Write IQ samples as a stereo 8-bit WAV file (I=left channel, Q=right channel)
pub struct WavIqWriter {
    writer: Option<WavWriter<BufWriter<File>>>,
}

impl WavIqWriter {
    pub fn create<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Self, hound::Error> {
        let spec = WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 8,
            sample_format: SampleFormat::Int,
        };

        let writer = WavWriter::create(path, spec)?;
        Ok(Self {
            writer: Some(writer),
        })
    }
}

impl IqSink for WavIqWriter {
    fn write_sample(&mut self, sample: IqSample) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "WAV writer already finalized"))?;
        writer.write_sample(sample.i).map_err(hound_to_io)?;
        writer.write_sample(sample.q).map_err(hound_to_io)
    }

    fn finish(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(writer) => writer.finalize().map_err(hound_to_io),
            None => Ok(()),
        }
    }
}

fn hound_to_io(err: hound::Error) -> io::Error {
    match err {
        hound::Error::IoError(e) => e,
        other => io::Error::new(io::ErrorKind::Other, other),
    }
}
