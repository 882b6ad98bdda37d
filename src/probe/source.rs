//! Line sources feeding the probe parser

use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader, Lines};

/// Anything that yields text lines until end of stream
#[async_trait]
pub trait LineSource: Send {
    /// Next line without its terminator, or None at end of stream
    async fn next_line(&mut self) -> io::Result<Option<String>>;
}

#[async_trait]
impl<R> LineSource for Lines<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        Lines::next_line(self).await
    }
}

/// Interleaves the lines of two streams in arrival order
///
/// Ends once both streams are exhausted. A read error on either side is
/// returned immediately.
pub struct MergedOutput<O, E> {
    stdout: Option<Lines<BufReader<O>>>,
    stderr: Option<Lines<BufReader<E>>>,
}

impl<O, E> MergedOutput<O, E>
where
    O: AsyncRead + Unpin + Send,
    E: AsyncRead + Unpin + Send,
{
    pub fn new(stdout: Option<O>, stderr: Option<E>) -> Self {
        Self {
            stdout: stdout.map(|s| BufReader::new(s).lines()),
            stderr: stderr.map(|s| BufReader::new(s).lines()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Stdout,
    Stderr,
}

#[async_trait]
impl<O, E> LineSource for MergedOutput<O, E>
where
    O: AsyncRead + Unpin + Send,
    E: AsyncRead + Unpin + Send,
{
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            let (side, read) = match (self.stdout.as_mut(), self.stderr.as_mut()) {
                (None, None) => return Ok(None),
                (Some(out), None) => (Side::Stdout, out.next_line().await),
                (None, Some(err)) => (Side::Stderr, err.next_line().await),
                (Some(out), Some(err)) => tokio::select! {
                    read = out.next_line() => (Side::Stdout, read),
                    read = err.next_line() => (Side::Stderr, read),
                },
            };

            match read? {
                Some(line) => return Ok(Some(line)),
                None => match side {
                    Side::Stdout => self.stdout = None,
                    Side::Stderr => self.stderr = None,
                },
            }
        }
    }
}
