//! The inbound half of the link between the driver and whatever owns the
//! port.
//!
//! The driver never opens or configures a port itself; the caller hands it
//! an already-open pair of halves. The outbound half is any
//! [`std::io::Write`]. The inbound half needs one capability `Read` does
//! not offer, a non-blocking "is a byte waiting" probe, so it is expressed
//! as the [`ByteSource`] trait below.

use std::io;

/// Inbound bytes from the module.
///
/// The driver only calls [`read_byte`](Self::read_byte) after
/// [`available`](Self::available) has reported a waiting byte, so
/// implementations are free to make `read_byte` block.
pub trait ByteSource {
    /// True iff at least one byte can be read without blocking.
    fn available(&mut self) -> io::Result<bool>;

    /// Read one byte.
    ///
    /// The module side of the link never closes, so end-of-stream here
    /// means the port itself went away; implementations should surface it
    /// as an error rather than a sentinel.
    fn read_byte(&mut self) -> io::Result<u8>;
}

#[cfg(feature = "serialport")]
impl ByteSource for Box<dyn serialport::SerialPort> {
    fn available(&mut self) -> io::Result<bool> {
        let queued = self.bytes_to_read()?;
        Ok(queued > 0)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        loop {
            match self.read(&mut byte) {
                Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(_) => return Ok(byte[0]),
                Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}
