//! Example: Receiving observations over TCP
//!
//! This example demonstrates how to use StreamSource to receive
//! newline-delimited observations over a TCP connection.
//!
//! # Usage
//!
//! First, start a server that sends JSON observations (one per line):
//!
//! ```bash
//! # Example using netcat to send a test observation:
//! echo '{"version":{"major":1,"minor":0},"timestamp":0.5,"measures":{"tsne.kl":2.5}}' | nc -l 9090
//! ```
//!
//! Then run this example:
//!
//! ```bash
//! cargo run --example stream_source -- localhost:9090
//! ```

use std::env;
use std::time::Duration;

use tokio::net::TcpStream;

use qualitywatch::{DataSource, StreamSource};

#[tokio::main]
async fn main() {
    let addr = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example stream_source -- <host:port>");
        eprintln!();
        eprintln!("Example: cargo run --example stream_source -- localhost:9090");
        std::process::exit(1);
    });

    println!("Connecting to {}...", addr);

    let stream = match TcpStream::connect(&addr).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to connect to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    println!("Connected! Waiting for observations...\n");

    // The source spawns a background task to read from the stream
    let mut source = StreamSource::spawn(stream, &addr);

    loop {
        for obs in source.poll() {
            println!("t={:.2}s with {} measures:", obs.timestamp, obs.len());
            for (name, value) in obs.iter() {
                println!("  - {}: {}", name, value);
            }
        }
        if let Some(err) = source.error() {
            eprintln!("Error: {}", err);
            break;
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
