use std::io::{self, Cursor, Read};

use ook_iq::input::Rewind;
use ook_iq::{InputMode, IqSample, IqSink, Modulator, OokConfig, RawIqWriter};

/// Collects pairs until `limit`, then fails like a closed pipe
struct LimitedSink {
    pairs: Vec<IqSample>,
    limit: usize,
}

impl IqSink for LimitedSink {
    fn write_sample(&mut self, sample: IqSample) -> io::Result<()> {
        if self.pairs.len() >= self.limit {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"));
        }
        self.pairs.push(sample);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Seekable input whose rewinds start failing after a few successes
struct FlakyRewind {
    inner: Cursor<Vec<u8>>,
    rewinds_left: usize,
}

impl Read for FlakyRewind {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Rewind for FlakyRewind {
    fn rewind(&mut self) -> io::Result<()> {
        if self.rewinds_left == 0 {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "not seekable"));
        }
        self.rewinds_left -= 1;
        self.inner.set_position(0);
        Ok(())
    }
}

/// Hands out its data once, then reports a read failure
struct BrokenAfter {
    data: Option<Vec<u8>>,
}

impl Read for BrokenAfter {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.take() {
            Some(data) => {
                buf[..data.len()].copy_from_slice(&data);
                Ok(data.len())
            }
            None => Err(io::Error::new(io::ErrorKind::Other, "device gone")),
        }
    }
}

fn config(sample_rate_hz: u32, symbol_period_us: u32) -> OokConfig {
    OokConfig {
        sample_rate_hz,
        symbol_period_us,
    }
}

fn single_pass(config: &OokConfig, mode: InputMode, input: &[u8]) -> Vec<u8> {
    let mut sink = RawIqWriter::new(Vec::new());
    Modulator::new(config, mode)
        .run(Cursor::new(input.to_vec()), &mut sink, false)
        .unwrap();
    sink.into_inner().unwrap()
}

#[test]
fn identical_runs_are_byte_identical() {
    let config = config(3_000_000, 2);
    let input = b"\x00\x7f\xc3 some bytes".to_vec();
    assert_eq!(
        single_pass(&config, InputMode::Binary, &input),
        single_pass(&config, InputMode::Binary, &input)
    );
}

#[test]
fn one_byte_at_two_megasamples() {
    let out = single_pass(&config(2_000_000, 1), InputMode::Binary, &[0x01]);
    assert_eq!(out.len(), 32);
    assert_eq!(out[..4], [127u8, 0, 127, 0]);
    assert!(out[4..].iter().all(|b| *b == 0));
}

#[test]
fn repeat_output_is_concatenated_passes() {
    let config = config(2_000_000, 1);
    let input = b"10x1".to_vec();
    let pass = single_pass(&config, InputMode::Text, &input);
    let pairs_per_pass = pass.len() / 2;

    for k in 1..=4 {
        let mut sink = LimitedSink {
            pairs: Vec::new(),
            limit: pairs_per_pass * k,
        };
        let err = Modulator::new(&config, InputMode::Text)
            .run(Cursor::new(input.clone()), &mut sink, true)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        let written: Vec<u8> = sink.pairs.iter().flat_map(|s| s.to_bytes()).collect();
        assert_eq!(written, pass.repeat(k));
    }
}

#[test]
fn failed_rewind_ends_the_run() {
    let config = config(1_000_000, 1);
    let input = FlakyRewind {
        inner: Cursor::new(vec![0xffu8]),
        rewinds_left: 2,
    };
    let mut sink = RawIqWriter::new(Vec::new());
    let summary = Modulator::new(&config, InputMode::Binary)
        .run(input, &mut sink, true)
        .unwrap();

    assert_eq!(summary.passes, 3);
    assert_eq!(summary.symbols, 24);
    let out = sink.into_inner().unwrap();
    assert_eq!(out.len(), 48);
    assert!(out.chunks_exact(2).all(|pair| pair == [127u8, 0]));
}

#[test]
fn empty_input_with_repeat_produces_nothing() {
    let config = OokConfig::default();
    let input = FlakyRewind {
        inner: Cursor::new(Vec::new()),
        rewinds_left: 5,
    };
    let mut sink = RawIqWriter::new(Vec::new());
    let summary = Modulator::new(&config, InputMode::Text)
        .run(input, &mut sink, true)
        .unwrap();

    assert_eq!(summary.passes, 6);
    assert_eq!(summary.samples, 0);
    assert!(sink.into_inner().unwrap().is_empty());
}

#[test]
fn read_error_is_end_of_stream() {
    let config = config(1_000_000, 1);
    let mut sink = RawIqWriter::new(Vec::new());
    let summary = Modulator::new(&config, InputMode::Text)
        .run_once(
            BrokenAfter {
                data: Some(b"110".to_vec()),
            },
            &mut sink,
        )
        .unwrap();

    assert_eq!(summary.symbols, 3);
    assert_eq!(sink.into_inner().unwrap(), vec![127, 0, 127, 0, 0, 0]);
}

#[test]
fn zero_samples_per_symbol_writes_nothing() {
    let config = config(500_000, 1);
    assert_eq!(config.samples_per_symbol(), 0);
    assert!(single_pass(&config, InputMode::Binary, b"anything at all").is_empty());
}
