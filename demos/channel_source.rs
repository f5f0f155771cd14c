//! Example: Watching a computation in-process
//!
//! This example runs a synthetic iterative computation that reports its
//! quality measures with the SDK reporter, and reads them back through a
//! channel source as the viewer would.
//!
//! This is useful when you want to:
//! - Embed the chart in the process doing the computation
//! - Generate synthetic data for testing
//! - Bridge from any async data source
//!
//! # Usage
//!
//! ```bash
//! cargo run --example channel_source
//! ```

use std::time::Duration;

use qualitywatch::{ChannelSource, DataSource};
use qualitywatch_chart::StripChart;
use qualitywatch_sdk::{Output, Reporter};

#[tokio::main]
async fn main() {
    println!("Channel source example");
    println!("Running a synthetic computation...\n");

    // The reporter pushes observations into the channel; the viewer drains it
    let (output, rx) = Output::channel(64);
    let reporter = Reporter::builder()
        .output(output)
        .period(Duration::from_millis(200))
        .build();
    let mut source = ChannelSource::new(rx, "synthetic-computation");

    let handle = reporter.register("kmeans");
    tokio::spawn(async move {
        for step in 0..200u32 {
            let t = step as f64;
            handle.record("inertia", 1000.0 / (t + 1.0) + 5.0);
            handle.record("moved", (50.0 - t).max(0.0));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    });
    let emission = reporter.start();

    let mut chart = StripChart::new(400.0, 100.0);
    println!("Receiving observations (press Ctrl+C to stop):\n");

    loop {
        for obs in source.poll() {
            let outcome = chart.add(obs.timestamp, obs.iter());
            println!(
                "t={:>6.2}s  {} measures  retained {:>3} points  dropped {}",
                obs.timestamp,
                obs.len(),
                chart.sample_count(),
                outcome.dropped
            );
        }
        if let Some(err) = source.error() {
            eprintln!("Error: {}", err);
            break;
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    emission.stop();
}
