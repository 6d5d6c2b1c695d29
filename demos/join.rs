//! Join an access point and report the assigned address.
//!
//! Usage: join <port> <ssid> <password>

use std::env;
use std::time::Duration;

use esp8266_at::{Driver, WifiMode, DEFAULT_LONG_TIMEOUT, DEFAULT_SHORT_TIMEOUT};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        println!("Usage: join <port> <ssid> <password>");
        return;
    }

    let source = serialport::new(&args[1], 9600)
        .timeout(Duration::from_millis(50))
        .open()
        .expect("could not open the serial port");
    let sink = source
        .try_clone()
        .expect("could not clone the serial port");

    let mut module = Driver::new(source, sink);
    if !module.is_ready(DEFAULT_SHORT_TIMEOUT) {
        println!("No module answering on {}", args[1]);
        return;
    }
    if let Err(err) = module.set_wifi_mode(WifiMode::Station, DEFAULT_SHORT_TIMEOUT) {
        println!("Could not enter station mode: {}", err);
        return;
    }
    match module.join_ap(&args[2], &args[3], DEFAULT_LONG_TIMEOUT) {
        Ok(()) => match module.get_ip(DEFAULT_SHORT_TIMEOUT) {
            Ok(ip) => println!("Joined {} with address {}", args[2], ip),
            Err(err) => println!("Joined, but could not read the address: {}", err),
        },
        Err(err) => println!("Join failed: {}", err),
    }
}
