use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Stdin};
use std::path::Path;

/// Path that selects standard input instead of a file
pub const STDIN_PATH: &str = "-";

/// Input that can be restarted from its first byte
pub trait Rewind {
    fn rewind(&mut self) -> io::Result<()>;
}

impl Rewind for File {
    fn rewind(&mut self) -> io::Result<()> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }
}

impl<T: AsRef<[u8]>> Rewind for Cursor<T> {
    fn rewind(&mut self) -> io::Result<()> {
        self.set_position(0);
        Ok(())
    }
}

/// Where the bit stream comes from
pub enum InputSource {
    File(File),
    Stdin(Stdin),
}

impl InputSource {
    /// Open `path`, or standard input for `-`
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        if path == Path::new(STDIN_PATH) {
            return Ok(InputSource::Stdin(io::stdin()));
        }
        Ok(InputSource::File(File::open(path)?))
    }

    pub fn is_stdin(&self) -> bool {
        matches!(self, InputSource::Stdin(_))
    }
}

impl Read for InputSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            InputSource::File(file) => file.read(buf),
            InputSource::Stdin(stdin) => stdin.read(buf),
        }
    }
}

impl Rewind for InputSource {
    fn rewind(&mut self) -> io::Result<()> {
        match self {
            InputSource::File(file) => Rewind::rewind(file),
            // Pipes and terminals cannot seek; files redirected onto stdin can
            InputSource::Stdin(stdin) => stdin_rewind(stdin),
        }
    }
}

#[cfg(unix)]
fn stdin_rewind(_stdin: &mut Stdin) -> io::Result<()> {
    use std::os::fd::AsFd;

    let fd = io::stdin().as_fd().try_clone_to_owned()?;
    let mut file = File::from(fd);
    file.seek(SeekFrom::Start(0)).map(|_| ())
}

#[cfg(not(unix))]
fn stdin_rewind(_stdin: &mut Stdin) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "standard input cannot be rewound",
    ))
}
