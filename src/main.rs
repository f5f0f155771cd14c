use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use qualitywatch::{
    data::duration::format_duration, events, logging, ui, App, ChartExport, DataSource,
    FileSource, Settings, StreamSource, StripChart, Validator,
};

/// Poll interval for push sources, which drain whatever has arrived.
const STREAM_REFRESH: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "qualitywatch")]
#[command(about = "Terminal strip chart for the quality measures of progressive computations")]
struct Args {
    /// Path to a JSON-lines file of observations
    #[arg(short, long, default_value = "quality.jsonl", conflicts_with_all = ["connect"])]
    file: PathBuf,

    /// Connect to a TCP endpoint streaming observations (host:port)
    #[arg(short, long, conflicts_with_all = ["file"])]
    connect: Option<String>,

    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// File poll interval (e.g., "250ms", "1s")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Decimation threshold in pixels (dots in the terminal view)
    #[arg(short, long)]
    decimate: Option<f64>,

    /// Log file for the interactive view
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Read the whole file, write the chart as JSON to this path and exit
    #[arg(short, long, conflicts_with_all = ["connect"])]
    export: Option<PathBuf>,
}

impl Args {
    /// Layer command line flags over the loaded settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(ref refresh) = self.refresh {
            settings.refresh = refresh.clone();
        }
        if let Some(decimate) = self.decimate {
            settings.chart.decimate_threshold = decimate;
        }
        if let Some(ref log_file) = self.log_file {
            settings.log_file = log_file.clone();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);
    settings.validate()?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        logging::init_stderr(&settings.log_filter)?;
        return export_to_file(&args.file, export_path, &settings);
    }

    logging::init_file(&settings.log_file, &settings.log_filter)?;

    // Handle TCP connection mode
    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, &settings);
    }

    // Default: file-based mode
    run_with_file(&args.file, &settings)
}

/// Chart configured from settings, before the terminal sizes it.
fn chart_from(settings: &Settings) -> StripChart {
    let chart_settings = &settings.chart;
    let mut chart = StripChart::new(chart_settings.width, chart_settings.height);
    chart.set_margins(chart_settings.margins);
    chart.set_decimate_threshold(chart_settings.decimate_threshold);
    chart
}

/// Run with a file-based data source
fn run_with_file(path: &Path, settings: &Settings) -> Result<()> {
    let refresh = settings.refresh_interval()?;
    info!(path = %path.display(), refresh = %format_duration(refresh), "tailing file");
    let source = Box::new(FileSource::new(path));
    run_tui(source, settings, refresh)
}

/// Run with a TCP stream data source
fn run_with_tcp(addr: &str, settings: &Settings) -> Result<()> {
    // The runtime must outlive the reader task spawned by StreamSource
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("Failed to connect to {}", addr))?;
        println!("Connected!");
        info!(addr, "connected");
        Ok::<_, anyhow::Error>(Box::new(StreamSource::spawn(stream, addr)) as Box<dyn DataSource>)
    })?;

    run_tui(source, settings, STREAM_REFRESH)
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, settings: &Settings, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, chart_from(settings));
    let _ = app.reload_data();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(
        observations = app.history.total,
        rejected = app.validator.rejected(),
        "viewer closed"
    );
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    while app.running {
        // Size the canvas before drawing so projections match the screen
        let size = terminal.size()?;
        ui::fit_chart(app, ratatui::layout::Rect::new(0, 0, size.width, size.height));

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Tabs sit on the row after the header
                    events::handle_mouse_event(app, mouse, 1);
                }
                Event::Resize(_, _) => {
                    // Canvas is refitted on the next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Feed a whole observation file through a virtual chart and write it out.
fn export_to_file(input: &Path, export_path: &Path, settings: &Settings) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let mut source = FileSource::new(input);
    let mut chart = chart_from(settings);
    let mut validator = Validator::new();

    let batch = source.poll();
    if let Some(err) = source.error() {
        warn!(path = %input.display(), error = err, "some lines could not be read");
    }
    let total = batch.len();
    for obs in batch {
        if validator.check(&obs).is_ok() {
            chart.add(obs.timestamp, obs.iter());
        }
    }

    info!(
        observations = total,
        rejected = validator.rejected(),
        series = chart.series().len(),
        retained = chart.sample_count(),
        "chart built"
    );

    ChartExport::from_chart(&chart).write_to(export_path)?;
    println!("Exported chart to: {}", export_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flags_override_settings() {
        let args = Args::parse_from([
            "qualitywatch",
            "--refresh",
            "1s",
            "--decimate",
            "4",
            "--log-file",
            "/tmp/qw.log",
        ]);
        let mut settings = Settings::default();
        args.apply(&mut settings);
        assert_eq!(settings.refresh, "1s");
        assert_eq!(settings.chart.decimate_threshold, 4.0);
        assert_eq!(settings.log_file, PathBuf::from("/tmp/qw.log"));
    }

    #[test]
    fn file_and_connect_conflict() {
        let res = Args::try_parse_from(["qualitywatch", "--file", "a", "--connect", "h:1"]);
        assert!(res.is_err());
    }

    #[test]
    fn export_builds_chart_from_file() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        for t in 0..50 {
            writeln!(
                input,
                r#"{{"timestamp":{},"measures":{{"q.loss":{}}}}}"#,
                t,
                1.0 / (t as f64 + 1.0)
            )
            .unwrap();
        }
        // out of order, rejected
        writeln!(input, r#"{{"timestamp":3,"measures":{{"q.loss":1}}}}"#).unwrap();
        input.flush().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("chart.json");
        export_to_file(input.path(), &out, &Settings::default()).unwrap();

        let export: ChartExport =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(export.series.len(), 1);
        assert_eq!(export.time_range, Some((0.0, 49.0)));
        assert!(export.series[0].samples.len() <= 50);
    }

    #[test]
    fn export_requires_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_to_file(
            &dir.path().join("missing.jsonl"),
            &dir.path().join("out.json"),
            &Settings::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
