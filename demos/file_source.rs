//! Example: Tailing a JSON-lines observation file
//!
//! This example demonstrates how to follow a file written by a reporter's
//! file output, one observation per line.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example file_source -- path/to/quality.jsonl
//! ```

use std::env;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use qualitywatch::{DataSource, FileSource};

fn main() -> io::Result<()> {
    let Some(path) = env::args().nth(1) else {
        eprintln!("Usage: cargo run --example file_source -- <path-to-quality.jsonl>");
        eprintln!();
        eprintln!("Each line should contain one observation:");
        eprintln!(r#"  {{"timestamp": 1.5, "measures": {{"tsne.kl": 0.42}}}}"#);
        std::process::exit(1);
    };

    println!("Tailing file: {}", path);
    println!("Press Ctrl+C to stop\n");

    let mut source = FileSource::new(&path);

    loop {
        let batch = source.poll();
        if batch.is_empty() {
            if let Some(err) = source.error() {
                eprint!("\rError: {}  ", err);
            } else {
                print!("\rWaiting for new lines...  ");
            }
            io::stdout().flush()?;
        }
        for obs in batch {
            let measures: Vec<String> = obs.iter().map(|(k, v)| format!("{}={:.4}", k, v)).collect();
            println!("\rt={:.2}s  {}", obs.timestamp, measures.join("  "));
        }

        thread::sleep(Duration::from_millis(500));
    }
}
