//! Accepted streams and the bounded request-line reader.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

use thiserror::Error;

/// A connection accepted by the listener.
#[derive(Debug)]
pub enum ConnectionStream {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl ConnectionStream {
    /// Bounds how long a single read may block.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.set_read_timeout(timeout),
            #[cfg(unix)]
            Self::Unix(stream) => stream.set_read_timeout(timeout),
        }
    }
}

impl Read for ConnectionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for ConnectionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            Self::Unix(stream) => stream.flush(),
        }
    }
}

/// Serves accepted connections.
pub trait ConnectionHandler: Send + Sync + 'static {
    /// Handles one connection to completion. Must not panic.
    fn handle(&self, stream: ConnectionStream);
}

/// Failure to read one request line.
#[derive(Debug, Error)]
pub enum LineError {
    #[error("request exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to read request: {0}")]
    Io(#[from] io::Error),
}

/// Reads one newline-terminated line of at most `limit` bytes.
///
/// Returns `Ok(None)` when the peer closes without sending anything. A
/// peer that closes after a partial line yields that partial line.
pub fn read_request_line<R: Read>(reader: &mut R, limit: usize) -> Result<Option<Vec<u8>>, LineError> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let read = read_chunk(reader, &mut chunk)?;
        if read == 0 {
            return Ok((!buffer.is_empty()).then_some(buffer));
        }
        let received = &chunk[..read];
        let newline = received.iter().position(|byte| *byte == b'\n');
        let end = newline.map_or(read, |position| position + 1);
        buffer.extend_from_slice(&received[..end]);
        if buffer.len() > limit {
            return Err(LineError::TooLarge { limit });
        }
        if newline.is_some() {
            return Ok(Some(buffer));
        }
    }
}

fn read_chunk<R: Read>(reader: &mut R, chunk: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(chunk) {
            Ok(read) => return Ok(read),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
}
