//! Access-point records reported by `AT+CWLAP`.

use std::fmt;

use crate::error::{Error, Result};
use crate::wire::Encryption;

const RECORD_PREFIX: &str = "+CWLAP:(";

/// One access point seen during a scan.
///
/// Equality and hashing cover all five fields, so a scan that reports the
/// same network twice collapses to one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessPoint {
    /// Security in use on the network.
    pub encryption: Encryption,
    /// Network name, exactly as reported (no unescaping).
    pub ssid: String,
    /// Received signal strength in dBm.
    pub rssi: i32,
    /// BSSID, colon-separated hex as reported.
    pub mac: String,
    /// Radio channel.
    pub channel: u32,
}

impl AccessPoint {
    /// Parse one `+CWLAP:(enc,"ssid",rssi,"mac",ch)` line.
    ///
    /// The record body is split on commas before quotes are stripped, so
    /// an SSID containing a comma does not survive the trip; the firmware
    /// offers no escaping that would make it recoverable.
    pub(crate) fn parse(line: &str) -> Result<AccessPoint> {
        let body = line
            .strip_prefix(RECORD_PREFIX)
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| Error::Protocol(format!("not an access point record: {line:?}")))?;

        let fields: Vec<&str> = body.split(',').collect();
        if fields.len() != 5 {
            return Err(Error::Protocol(format!(
                "expected 5 fields in access point record, got {}: {line:?}",
                fields.len()
            )));
        }

        let encryption = single_char(fields[0])
            .and_then(Encryption::from_code)
            .ok_or_else(|| Error::Protocol("Unexpected encryption code.".to_string()))?;
        let ssid = unquote(fields[1]).to_string();
        let rssi = fields[2]
            .parse::<i32>()
            .map_err(|_| Error::Protocol(format!("bad RSSI field: {:?}", fields[2])))?;
        let mac = unquote(fields[3]).to_string();
        let channel = fields[4]
            .parse::<u32>()
            .map_err(|_| Error::Protocol(format!("bad channel field: {:?}", fields[4])))?;

        Ok(AccessPoint {
            encryption,
            ssid,
            rssi,
            mac,
            channel,
        })
    }
}

impl fmt::Display for AccessPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} [{}] ch {} {} dBm {}",
            self.ssid, self.mac, self.channel, self.rssi, self.encryption
        )
    }
}

fn single_char(field: &str) -> Option<char> {
    let mut chars = field.chars();
    let first = chars.next()?;
    if chars.next().is_none() {
        Some(first)
    } else {
        None
    }
}

/// Strip one pair of surrounding quotes; anything else stays verbatim.
fn unquote(field: &str) -> &str {
    field
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(field)
}
