pub mod args;
pub mod input;
pub mod logging;
pub mod modulator;
pub mod output;

pub use input::{InputMode, InputSource, Symbol};
pub use modulator::{IqSample, Modulator, OokConfig, RunSummary};
pub use output::{IqSink, RawIqWriter, WavIqWriter};
