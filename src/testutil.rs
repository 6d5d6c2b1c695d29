//! In-memory stream doubles for the unit suites.

use std::collections::VecDeque;
use std::io;

use crate::stream::ByteSource;

/// Replays a scripted byte sequence as the module side of the link.
///
/// `available()` is true while script bytes remain, so a driver that asks
/// for more than the script holds ends up on the polling path and times
/// out the way it would against a silent module.
pub(crate) struct ScriptedSource {
    bytes: VecDeque<u8>,
}

impl ScriptedSource {
    pub(crate) fn new(script: &[u8]) -> ScriptedSource {
        ScriptedSource {
            bytes: script.iter().copied().collect(),
        }
    }

    /// Bytes the exercised operation left unread.
    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl ByteSource for ScriptedSource {
    fn available(&mut self) -> io::Result<bool> {
        Ok(!self.bytes.is_empty())
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        self.bytes
            .pop_front()
            .ok_or_else(|| io::ErrorKind::UnexpectedEof.into())
    }
}

/// A source whose port has gone away: reports a waiting byte, then fails
/// the read.
pub(crate) struct BrokenSource;

impl ByteSource for BrokenSource {
    fn available(&mut self) -> io::Result<bool> {
        Ok(true)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        Err(io::ErrorKind::BrokenPipe.into())
    }
}
