//! Enumerated settings and their single-digit wire codes.
//!
//! The firmware encodes each of these as one ASCII digit. Every enum
//! carries the code table in both directions; an unknown inbound digit is
//! never defaulted, callers turn it into a protocol error.

use std::fmt;

/// Operating mode of the Wi-Fi radio (`AT+CWMODE`).
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum WifiMode {
    /// Client of an existing access point.
    Station,
    /// Stand-alone access point.
    AccessPoint,
    /// Station and access point at the same time.
    Both,
}

impl WifiMode {
    /// The digit the firmware uses for this mode.
    pub fn code(self) -> char {
        match self {
            WifiMode::Station => '1',
            WifiMode::AccessPoint => '2',
            WifiMode::Both => '3',
        }
    }

    /// Inverse of [`code`](Self::code); `None` for an unknown digit.
    pub fn from_code(code: char) -> Option<WifiMode> {
        match code {
            '1' => Some(WifiMode::Station),
            '2' => Some(WifiMode::AccessPoint),
            '3' => Some(WifiMode::Both),
            _ => None,
        }
    }
}

impl fmt::Display for WifiMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            WifiMode::Station => "station",
            WifiMode::AccessPoint => "access point",
            WifiMode::Both => "station+ap",
        };
        f.write_str(name)
    }
}

/// How a UDP transport treats its remote peer (`AT+CIPSTART="UDP",…`).
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum UdpPeerMode {
    /// Only talk to the remote given at start.
    UseDefinedRemote,
    /// The remote may be changed once, by the first inbound datagram.
    ChangeRemoteOnce,
    /// The remote follows whoever sent the last inbound datagram.
    EstablishPeer,
}

impl UdpPeerMode {
    pub fn code(self) -> char {
        match self {
            UdpPeerMode::UseDefinedRemote => '0',
            UdpPeerMode::ChangeRemoteOnce => '1',
            UdpPeerMode::EstablishPeer => '2',
        }
    }

    pub fn from_code(code: char) -> Option<UdpPeerMode> {
        match code {
            '0' => Some(UdpPeerMode::UseDefinedRemote),
            '1' => Some(UdpPeerMode::ChangeRemoteOnce),
            '2' => Some(UdpPeerMode::EstablishPeer),
            _ => None,
        }
    }
}

impl fmt::Display for UdpPeerMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            UdpPeerMode::UseDefinedRemote => "fixed remote",
            UdpPeerMode::ChangeRemoteOnce => "remote may change once",
            UdpPeerMode::EstablishPeer => "follow last peer",
        };
        f.write_str(name)
    }
}

/// Security reported for a scanned access point.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Encryption {
    Open,
    Wep,
    WpaPsk,
    Wpa2Psk,
    WpaWpa2Psk,
}

impl Encryption {
    pub fn code(self) -> char {
        match self {
            Encryption::Open => '0',
            Encryption::Wep => '1',
            Encryption::WpaPsk => '2',
            Encryption::Wpa2Psk => '3',
            Encryption::WpaWpa2Psk => '4',
        }
    }

    pub fn from_code(code: char) -> Option<Encryption> {
        match code {
            '0' => Some(Encryption::Open),
            '1' => Some(Encryption::Wep),
            '2' => Some(Encryption::WpaPsk),
            '3' => Some(Encryption::Wpa2Psk),
            '4' => Some(Encryption::WpaWpa2Psk),
            _ => None,
        }
    }
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Encryption::Open => "open",
            Encryption::Wep => "WEP",
            Encryption::WpaPsk => "WPA-PSK",
            Encryption::Wpa2Psk => "WPA2-PSK",
            Encryption::WpaWpa2Psk => "WPA/WPA2-PSK",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wifi_mode_codes_round_trip() {
        for mode in [WifiMode::Station, WifiMode::AccessPoint, WifiMode::Both] {
            assert_eq!(WifiMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(WifiMode::from_code('0'), None);
        assert_eq!(WifiMode::from_code('4'), None);
    }

    #[test]
    fn udp_peer_mode_codes_round_trip() {
        for mode in [
            UdpPeerMode::UseDefinedRemote,
            UdpPeerMode::ChangeRemoteOnce,
            UdpPeerMode::EstablishPeer,
        ] {
            assert_eq!(UdpPeerMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(UdpPeerMode::from_code('3'), None);
    }

    #[test]
    fn encryption_codes_round_trip() {
        for enc in [
            Encryption::Open,
            Encryption::Wep,
            Encryption::WpaPsk,
            Encryption::Wpa2Psk,
            Encryption::WpaWpa2Psk,
        ] {
            assert_eq!(Encryption::from_code(enc.code()), Some(enc));
        }
        assert_eq!(Encryption::from_code('5'), None);
        assert_eq!(Encryption::from_code('x'), None);
    }
}
