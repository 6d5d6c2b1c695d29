//! Deadline-bounded reads over a [`ByteSource`].
//!
//! Every primitive here takes a wall-clock budget for the whole read, not
//! a per-byte gap. While the budget lasts the reader drains whatever the
//! source has buffered and sleeps a short tick when it has nothing; on
//! expiry it fails with [`Error::Timeout`].

use std::thread;
use std::time::{Duration, Instant};

use log::trace;

use crate::error::{Error, Result};
use crate::matcher::TokenMatcher;
use crate::stream::ByteSource;

/// Sleep between `available()` polls while a budget lasts.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

pub(crate) struct Reader<S> {
    source: S,
}

impl<S: ByteSource> Reader<S> {
    pub(crate) fn new(source: S) -> Reader<S> {
        Reader { source }
    }

    pub(crate) fn into_inner(self) -> S {
        self.source
    }

    /// One byte within the deadline, or `Timeout`.
    pub(crate) fn next_byte(&mut self, deadline: Instant) -> Result<u8> {
        loop {
            if self.source.available()? {
                return Ok(self.source.read_byte()?);
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Accumulate bytes until `terminator` arrives (it is kept in the
    /// returned buffer) or `max` bytes have been read.
    pub(crate) fn read_into(
        &mut self,
        terminator: u8,
        max: usize,
        timeout: Duration,
    ) -> Result<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        let mut buf = Vec::with_capacity(max);
        loop {
            let byte = self.next_byte(deadline)?;
            buf.push(byte);
            if byte == terminator || buf.len() >= max {
                return Ok(buf);
            }
        }
    }

    /// One CRLF-terminated line, at most `max` raw bytes.
    ///
    /// The final two buffered bytes are dropped unconditionally. Callers
    /// only use this on replies the firmware terminates with CRLF, and
    /// size `max` so a cut-off line still parses usefully.
    pub(crate) fn read_line(&mut self, max: usize, timeout: Duration) -> Result<String> {
        let raw = self.read_into(b'\n', max, timeout)?;
        let cut = raw.len().saturating_sub(2);
        let line = String::from_utf8_lossy(&raw[..cut]).into_owned();
        trace!("<- line {:?}", line);
        Ok(line)
    }

    /// Consume the stream until `token` has appeared.
    pub(crate) fn expect_token(&mut self, token: &[u8], timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut matcher = TokenMatcher::new(token);
        loop {
            if matcher.push(self.next_byte(deadline)?) {
                trace!("<- token {:?}", String::from_utf8_lossy(token));
                return Ok(());
            }
        }
    }

    /// Consume the stream until `pass` or `fail` has appeared; `fail`
    /// becomes a `ResponseFailed` error. If both complete on the same
    /// byte, `pass` wins.
    pub(crate) fn expect_either(
        &mut self,
        pass: &[u8],
        fail: &[u8],
        timeout: Duration,
    ) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut wanted = TokenMatcher::new(pass);
        let mut unwanted = TokenMatcher::new(fail);
        loop {
            let byte = self.next_byte(deadline)?;
            if wanted.push(byte) {
                trace!("<- token {:?}", String::from_utf8_lossy(pass));
                return Ok(());
            }
            if unwanted.push(byte) {
                let token = String::from_utf8_lossy(fail).trim_end().to_string();
                trace!("<- failure token {:?}", token);
                return Err(Error::ResponseFailed(token));
            }
        }
    }
}
