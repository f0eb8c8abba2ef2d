use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

/// Where a reader pulls its bytes from
pub(super) enum ReaderSource {
    /// File opened lazily on `read()`
    FilePath(PathBuf),
    /// Caller-supplied byte stream
    Stream(Box<dyn Read>),
}

impl ReaderSource {
    pub(super) fn describe(&self) -> String {
        match self {
            ReaderSource::FilePath(path) => path.display().to_string(),
            ReaderSource::Stream(_) => "<stream>".to_string(),
        }
    }

    pub(super) fn open(self) -> io::Result<Box<dyn Read>> {
        match self {
            ReaderSource::FilePath(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
            ReaderSource::Stream(stream) => Ok(stream),
        }
    }
}

/// Read adapter tracking the current byte offset
pub(super) struct CountingReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> CountingReader<R> {
    pub(super) fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    pub(super) fn position(&self) -> u64 {
        self.position
    }

    /// Read one byte, `None` on a clean end of file
    pub(super) fn read_tag(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}
