//! List the access points a module can see.
//!
//! Usage: scan <port> [baud]

use std::env;
use std::time::Duration;

use esp8266_at::{Driver, DEFAULT_LONG_TIMEOUT, DEFAULT_SHORT_TIMEOUT};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        println!("Usage: scan <port> [baud]");
        return;
    }
    let baud: u32 = match args.get(2) {
        Some(arg) => match arg.parse() {
            Ok(n) => n,
            _ => {
                println!("<baud> must be an integer!");
                return;
            }
        },
        None => 9600,
    };

    let source = serialport::new(&args[1], baud)
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
    match module.get_access_points(DEFAULT_LONG_TIMEOUT) {
        Ok(found) => {
            for ap in &found {
                println!("{}", ap);
            }
            println!("{} access point(s)", found.len());
        }
        Err(err) => println!("Scan failed: {}", err),
    }
}
