use anyhow::{bail, Context};
use clap::Parser;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ook_iq::args::{parse_sample_rate, parse_symbol_period};
use ook_iq::logging::init_logging;
use ook_iq::{InputMode, InputSource, IqSink, Modulator, OokConfig, RawIqWriter, WavIqWriter};

/// Convert a bit stream into OOK-modulated int8 IQ samples
#[derive(Parser, Debug)]
#[command(name = "ook-iq")]
#[command(version, about, long_about = None)]
struct Args {
    /// Sample rate in Hz
    #[arg(
        short,
        long,
        value_name = "HZ",
        default_value = "10000000",
        value_parser = parse_sample_rate,
        allow_hyphen_values = true
    )]
    sample_rate: u32,

    /// Symbol period in microseconds
    #[arg(
        short = 'p',
        long,
        value_name = "US",
        default_value = "127",
        value_parser = parse_symbol_period,
        allow_hyphen_values = true
    )]
    symbol_period: u32,

    /// Input file (use '-' for stdin)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Loop the input forever
    #[arg(short, long)]
    repeat: bool,

    /// Decode ASCII '1' and '0' characters instead of raw bits
    #[arg(short, long)]
    text: bool,

    /// Output file instead of stdout (use '-' for stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write a stereo 8-bit WAV (I=left, Q=right) instead of raw IQ
    #[arg(short, long, requires = "output")]
    wav: bool,

    /// Verbose output on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Usage errors exit 1, --help and --version exit 0
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_broken_pipe(&e) => {
            tracing::debug!("output closed by reader, stopping");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = OokConfig {
        sample_rate_hz: args.sample_rate,
        symbol_period_us: args.symbol_period,
    };
    let mode = if args.text {
        InputMode::Text
    } else {
        InputMode::Binary
    };

    let output = args.output.as_deref().filter(|path| !is_stdio(path));
    if args.wav && output.is_none() {
        bail!("WAV output needs a file path, not stdout");
    }

    let input = InputSource::open(&args.input)
        .with_context(|| format!("cannot open input '{}'", args.input.display()))?;
    if args.repeat && input.is_stdin() {
        tracing::debug!("repeat on stdin only works when stdin is a seekable file");
    }

    let modulator = Modulator::new(&config, mode);
    tracing::debug!(
        "sample rate {} Hz, symbol period {} us, {} samples per symbol, {:?} input",
        config.sample_rate_hz,
        config.symbol_period_us,
        modulator.samples_per_symbol(),
        mode
    );
    if modulator.samples_per_symbol() == 0 {
        tracing::warn!(
            "symbol period {} us is shorter than one sample at {} Hz, no samples will be written",
            config.symbol_period_us,
            config.sample_rate_hz
        );
    }

    let mut sink: Box<dyn IqSink> = match output {
        None => Box::new(RawIqWriter::new(io::stdout().lock())),
        Some(path) if args.wav => Box::new(
            WavIqWriter::create(path, config.sample_rate_hz)
                .with_context(|| format!("cannot create WAV file '{}'", path.display()))?,
        ),
        Some(path) => Box::new(RawIqWriter::new(
            File::create(path)
                .with_context(|| format!("cannot create output '{}'", path.display()))?,
        )),
    };

    let summary = modulator.run(input, &mut *sink, args.repeat)?;
    tracing::info!(
        "wrote {} sample pairs for {} symbols in {} pass(es)",
        summary.samples,
        summary.symbols,
        summary.passes
    );

    Ok(())
}

fn is_stdio(path: &Path) -> bool {
    path == Path::new("-")
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
}
