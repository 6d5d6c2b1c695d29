// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/license/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option.  This file may not be copied, modified, or distributed
// except according to those terms.

//! A pure Rust host-side driver for ESP8266 Wi-Fi modules running the
//! AI-Thinker revision-018 AT command firmware.
//!
//! The aim of this driver is to provide a typed, no non-sense API over
//! the module's chatty line protocol: probing readiness, switching Wi-Fi
//! modes, scanning and joining access points, opening TCP/UDP transports
//! and moving framed payloads, without the caller ever touching `OK` /
//! `ERROR` token streams or `+IPD` framing.
//!
//! The driver owns nothing but the two halves of an already-open byte
//! stream, typically a serial port at 9600 baud. Opening and configuring
//! that port stays on the caller's side; any [`std::io::Write`] works as
//! the outbound half, and the inbound half implements the one-method-more
//! [`ByteSource`] trait (the `serialport` cargo feature ships an
//! implementation for [`serialport`](https://crates.io/crates/serialport)
//! ports).
//!
//! Every operation is synchronous and bounded by a wall-clock budget.
//! When a budget expires mid-reply the stream is left dirty; issuing
//! [`Driver::is_ready`] is the usual way back to a known state, since its
//! probe consumes forward until the module acknowledges.
//!
//! # Examples
//!
//! ## Joining a network
//!
//! ```rust,no_run
//! use std::io::Write;
//! use std::time::Duration;
//!
//! use esp8266_at::{ByteSource, Driver, WifiMode};
//!
//! # fn demo(source: impl ByteSource, sink: impl Write) -> esp8266_at::Result<()> {
//! let mut module = Driver::new(source, sink);
//! module.set_wifi_mode(WifiMode::Station, Duration::from_millis(200))?;
//! module.join_ap("HomeNet", "hunter2", Duration::from_millis(4000))?;
//! println!("station ip: {}", module.get_ip(Duration::from_millis(200))?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Scanning for access points
//!
//! ```rust,no_run
//! use std::io::Write;
//!
//! use esp8266_at::{ByteSource, Driver, DEFAULT_LONG_TIMEOUT};
//!
//! # fn demo(source: impl ByteSource, sink: impl Write) -> esp8266_at::Result<()> {
//! let mut module = Driver::new(source, sink);
//! for ap in module.get_access_points(DEFAULT_LONG_TIMEOUT)? {
//!     println!("{}", ap);
//! }
//! # Ok(())
//! # }
//! ```

mod ap;
mod error;
mod matcher;
mod reader;
mod stream;
#[cfg(test)]
mod testutil;
mod wire;

use std::collections::HashSet;
use std::io::Write;
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::reader::Reader;

pub use crate::ap::AccessPoint;
pub use crate::error::{Error, Result};
pub use crate::stream::ByteSource;
pub use crate::wire::{Encryption, UdpPeerMode, WifiMode};

/// Default budget for quick query/response commands.
pub const DEFAULT_SHORT_TIMEOUT: Duration = Duration::from_millis(200);
/// Default budget for scans, restarts and joins.
pub const DEFAULT_LONG_TIMEOUT: Duration = Duration::from_millis(4000);
/// Fixed wait for a remote peer to start an inbound `+IPD` frame.
pub const CLIENT_CONNECT_TIMEOUT: Duration = Duration::from_millis(10_000);

// Terminal and inline tokens of the reply vocabulary.
const OK: &[u8] = b"OK\r\n";
const ERROR: &[u8] = b"ERROR\r\n";
const FAIL: &[u8] = b"FAIL\r\n";
const READY: &[u8] = b"ready\r\n";
const IPD: &[u8] = b"+IPD,";

// Reply-line caps, sized to what the rev-018 firmware emits.
const MODE_LINE_MAX: usize = 20;
const IP_LINE_MAX: usize = 20;
const VERSION_LINE_MAX: usize = 30;
const AP_LINE_MAX: usize = 100;
const IPD_LENGTH_MAX: usize = 10;

/// The driver.
///
/// Owns the two stream halves for its whole life and keeps no other
/// state: the module's mode, IP and join status are re-interrogated on
/// every query, never cached. One instance drives one module from one
/// thread; callers needing concurrency serialize externally.
pub struct Driver<S, W> {
    reader: Reader<S>,
    sink: W,
    short_timeout: Duration,
    long_timeout: Duration,
}

impl<S: ByteSource, W: Write> Driver<S, W> {
    // Private methods and functions

    /// Frame and send one command: `AT`, the verb if any, CRLF.
    fn send_command(&mut self, verb: &str) -> Result<()> {
        debug!("-> AT{}{}", if verb.is_empty() { "" } else { "+" }, verb);
        self.sink.write_all(b"AT")?;
        if !verb.is_empty() {
            self.sink.write_all(b"+")?;
            self.sink.write_all(verb.as_bytes())?;
        }
        self.sink.write_all(b"\r\n")?;
        self.sink.flush()?;
        Ok(())
    }

    /// Bytes on the wire with no framing. The firmware rejects the `+`
    /// prefix on `ATE0`/`ATE1`, which go through here.
    fn send_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.write_all(bytes)?;
        self.sink.flush()?;
        Ok(())
    }

    // Public API

    /// Wrap an already-open stream pair and probe the module.
    ///
    /// If the module answers the probe, command echo is switched off;
    /// every reply parser in this driver assumes echoed command text is
    /// absent. A module that stays silent (not powered yet, wrong line
    /// rate) is tolerated; probe it later with
    /// [`is_ready`](Self::is_ready).
    ///
    /// Dropping the driver does not close the caller's streams; see
    /// [`release`](Self::release).
    pub fn new(source: S, sink: W) -> Driver<S, W> {
        let mut driver = Driver {
            reader: Reader::new(source),
            sink,
            short_timeout: DEFAULT_SHORT_TIMEOUT,
            long_timeout: DEFAULT_LONG_TIMEOUT,
        };
        let probe_budget = driver.short_timeout;
        if driver.is_ready(probe_budget) {
            if let Err(err) = driver.disable_echo(probe_budget) {
                debug!("echo-off after construction probe failed: {}", err);
            }
        } else {
            debug!("module did not answer the construction probe");
        }
        driver
    }

    /// Probe the module with a bare `AT`.
    ///
    /// Never fails: any I/O fault, timeout or `ERROR` reply comes back as
    /// `false`. Doubles as the recovery step after a timed-out operation
    /// has left reply bytes unread: the probe consumes forward until
    /// `OK` or its budget runs out.
    pub fn is_ready(&mut self, timeout: Duration) -> bool {
        let outcome = self
            .send_command("")
            .and_then(|()| self.reader.expect_either(OK, ERROR, timeout));
        match outcome {
            Ok(()) => true,
            Err(err) => {
                debug!("readiness probe failed: {}", err);
                false
            }
        }
    }

    /// Switch off command echo (`ATE0`).
    pub fn disable_echo(&mut self, timeout: Duration) -> Result<()> {
        debug!("-> ATE0");
        self.send_raw(b"ATE0\r\n")?;
        self.reader.expect_either(OK, ERROR, timeout)
    }

    /// Switch command echo back on (`ATE1`).
    ///
    /// The reply parsers cannot cope with echoed command text; call
    /// [`disable_echo`](Self::disable_echo) again before issuing anything
    /// else.
    pub fn enable_echo(&mut self, timeout: Duration) -> Result<()> {
        debug!("-> ATE1");
        self.send_raw(b"ATE1\r\n")?;
        self.reader.expect_either(OK, ERROR, timeout)
    }

    /// Firmware revision string (`AT+GMR`).
    pub fn firmware_version(&mut self, timeout: Duration) -> Result<String> {
        self.send_command("GMR")?;
        let version = self.reader.read_line(VERSION_LINE_MAX, timeout)?;
        self.reader.expect_either(OK, ERROR, timeout)?;
        Ok(version)
    }

    /// Current mode of the Wi-Fi radio (`AT+CWMODE?`).
    pub fn get_wifi_mode(&mut self, timeout: Duration) -> Result<WifiMode> {
        self.send_command("CWMODE?")?;
        self.reader.expect_token(b"+CWMODE:", timeout)?;
        let digit = self.reader.read_into(b'\r', 1, timeout)?;
        self.reader.expect_token(OK, timeout)?;
        let code = digit[0] as char;
        WifiMode::from_code(code)
            .ok_or_else(|| Error::Protocol(format!("unknown wifi mode code {code:?}")))
    }

    /// Set the mode of the Wi-Fi radio (`AT+CWMODE=`).
    ///
    /// The firmware answers `no change` instead of `OK` when the
    /// requested mode is already active; both count as success.
    pub fn set_wifi_mode(&mut self, mode: WifiMode, timeout: Duration) -> Result<()> {
        self.send_command(&format!("CWMODE={}", mode.code()))?;
        let first = self.reader.read_line(MODE_LINE_MAX, timeout)?;
        if first == "no change" {
            return Ok(());
        }
        self.reader.expect_token(OK, timeout)
    }

    /// Restart the module (`AT+RST`) and wait for its `ready` banner.
    ///
    /// A restart re-enables command echo on the module side, so echo is
    /// switched back off (within the short default budget) before this
    /// returns. Restarting takes a while; use a long budget.
    pub fn restart(&mut self, timeout: Duration) -> Result<()> {
        self.send_command("RST")?;
        self.reader.expect_token(READY, timeout)?;
        debug!("module restarted");
        let echo_budget = self.short_timeout;
        self.disable_echo(echo_budget)
    }

    /// Current station IP address (`AT+CIFSR`).
    ///
    /// The firmware reports `0.0.0.0` when it has not joined a network;
    /// that is passed through, not treated as an error.
    pub fn get_ip(&mut self, timeout: Duration) -> Result<String> {
        self.send_command("CIFSR")?;
        let ip = self.reader.read_line(IP_LINE_MAX, timeout)?;
        self.reader.expect_token(OK, timeout)?;
        Ok(ip)
    }

    /// Allow or forbid multiple concurrent connections (`AT+CIPMUX`).
    pub fn set_mux_mode(&mut self, enabled: bool, timeout: Duration) -> Result<()> {
        self.send_command(&format!("CIPMUX={}", if enabled { 1 } else { 0 }))?;
        self.reader.expect_token(OK, timeout)
    }

    /// Start listening for inbound TCP connections (`AT+CIPSERVER=1`).
    ///
    /// With `port: None` or `Some(0)` the module keeps its default port.
    pub fn start_tcp_server(&mut self, port: Option<u16>, timeout: Duration) -> Result<()> {
        match port {
            Some(port) if port > 0 => self.send_command(&format!("CIPSERVER=1,{port}"))?,
            _ => self.send_command("CIPSERVER=1")?,
        }
        self.reader.expect_token(OK, timeout)
    }

    /// Open a TCP connection to `ip:port` (`AT+CIPSTART="TCP",…`).
    pub fn start_tcp_client(&mut self, ip: &str, port: u16, timeout: Duration) -> Result<()> {
        self.send_command(&format!("CIPSTART=\"TCP\",\"{ip}\",{port}"))?;
        self.reader.expect_either(OK, ERROR, timeout)
    }

    /// Open a UDP transport (`AT+CIPSTART="UDP",…`).
    ///
    /// `peer` controls whether the remote end may change after start; see
    /// [`UdpPeerMode`].
    pub fn start_udp_client(
        &mut self,
        ip: &str,
        remote_port: u16,
        local_port: u16,
        peer: UdpPeerMode,
        timeout: Duration,
    ) -> Result<()> {
        self.send_command(&format!(
            "CIPSTART=\"UDP\",\"{ip}\",{remote_port},{local_port},{}",
            peer.code()
        ))?;
        self.reader.expect_either(OK, ERROR, timeout)
    }

    /// Join an access point (`AT+CWJAP`).
    ///
    /// The firmware answers `FAIL` (not `ERROR`) when association or
    /// authentication fails. Joining takes seconds; use a long budget.
    pub fn join_ap(&mut self, ssid: &str, password: &str, timeout: Duration) -> Result<()> {
        self.send_command(&format!("CWJAP=\"{ssid}\",\"{password}\""))?;
        self.reader.expect_either(OK, FAIL, timeout)
    }

    /// Close the open TCP or UDP transport (`AT+CIPCLOSE`).
    pub fn close_ip_client(&mut self, timeout: Duration) -> Result<()> {
        self.send_command("CIPCLOSE")?;
        self.reader.expect_either(OK, ERROR, timeout)
    }

    /// Scan for access points (`AT+CWLAP`).
    ///
    /// Requires station or dual mode. Records that compare equal collapse
    /// to one entry. The scan itself takes seconds; `timeout` bounds each
    /// reply line, so use a long budget.
    pub fn get_access_points(&mut self, timeout: Duration) -> Result<HashSet<AccessPoint>> {
        self.send_command("CWLAP")?;
        let mut found = HashSet::new();
        loop {
            let line = self.reader.read_line(AP_LINE_MAX, timeout)?;
            match line.as_str() {
                "" => continue,
                "OK" => return Ok(found),
                "ERROR" => {
                    return Err(Error::ResponseFailed(
                        "Device not in station or dual mode.".to_string(),
                    ))
                }
                _ => {
                    found.insert(AccessPoint::parse(&line)?);
                }
            }
        }
    }

    /// Send one payload over the open transport (`AT+CIPSEND`).
    pub fn send(&mut self, payload: &[u8], timeout: Duration) -> Result<()> {
        self.send_command(&format!("CIPSEND={}", payload.len()))?;
        trace!("-> {} payload bytes", payload.len());
        self.send_raw(payload)?;
        self.reader.expect_either(OK, ERROR, timeout)
    }

    /// Wait for one inbound `+IPD` frame and copy its payload into `buf`.
    ///
    /// Blocks up to [`CLIENT_CONNECT_TIMEOUT`] for a frame to start, then
    /// reads the announced length *plus one trailing byte* within
    /// `timeout`, so size `buf` to `length + 1`. Whatever does not fit in
    /// `buf` is still consumed from the stream, keeping the byte count
    /// aligned with the module, and discarded. Returns how many bytes
    /// were written into `buf`.
    pub fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        self.reader.expect_token(IPD, CLIENT_CONNECT_TIMEOUT)?;
        let length_budget = self.short_timeout;
        let field = self.reader.read_into(b':', IPD_LENGTH_MAX, length_budget)?;
        let digits = match field.split_last() {
            Some((&b':', digits)) => digits,
            _ => &field[..],
        };
        let length: usize = std::str::from_utf8(digits)
            .ok()
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| {
                Error::Protocol(format!(
                    "bad +IPD length field: {:?}",
                    String::from_utf8_lossy(&field)
                ))
            })?;
        trace!("<- +IPD frame, {} bytes announced", length);

        let total = length + 1;
        let deadline = Instant::now() + timeout;
        let mut copied = 0;
        for _ in 0..total {
            let byte = self.reader.next_byte(deadline)?;
            if copied < buf.len() {
                buf[copied] = byte;
                copied += 1;
            }
        }
        Ok(copied)
    }

    /// Default budget for quick commands; used by the construction probe
    /// and the echo-off after [`restart`](Self::restart).
    pub fn short_timeout(&self) -> Duration {
        self.short_timeout
    }

    pub fn set_short_timeout(&mut self, timeout: Duration) {
        self.short_timeout = timeout;
    }

    /// Default budget for scans, restarts and joins.
    pub fn long_timeout(&self) -> Duration {
        self.long_timeout
    }

    pub fn set_long_timeout(&mut self, timeout: Duration) {
        self.long_timeout = timeout;
    }

    /// Hand the stream halves back. The driver never closes them.
    pub fn release(self) -> (S, W) {
        (self.reader.into_inner(), self.sink)
    }
}
