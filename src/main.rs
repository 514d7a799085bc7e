use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trailwatch::data::duration::parse_duration;
use trailwatch::data::samples::demo_log;
use trailwatch::events;
use trailwatch::ui;
use trailwatch::{
    parse_samples, App, ChannelSource, ConfigSet, Dashboard, DataSource, FileSource, SampleFilter,
    SampleType, SensorType, Settings, StreamSource, Theme, ThemeMode, View,
};

#[derive(Parser, Debug)]
#[command(name = "trailwatch")]
#[command(about = "Terminal dashboard for wearable sensor logs and their threshold configuration")]
struct Args {
    /// Threshold configuration file (watched for changes)
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Sample log file (watched for changes)
    #[arg(short, long, conflicts_with = "connect")]
    data: Option<PathBuf>,

    /// Read a sample log from a TCP endpoint until it closes (host:port)
    #[arg(long, conflicts_with_all = ["data", "export"])]
    connect: Option<String>,

    /// Settings file (defaults to ./trailwatch.toml if present)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Poll interval for watched files (e.g., "1s", "500ms")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Initial sensor filter, by name or ordinal
    #[arg(long)]
    sensor: Option<SensorType>,

    /// Initial sample filter, by name or ordinal
    #[arg(long)]
    sample: Option<SampleType>,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Write log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Export the filtered dashboard to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write the threshold configuration in config file format and exit
    #[arg(long, conflicts_with = "export")]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    let mut settings = Settings::load(args.settings.as_deref())?;
    if let Some(ref refresh) = args.refresh {
        parse_duration(refresh)?;
        settings.refresh = refresh.clone();
    }
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }

    let filter = SampleFilter::new(args.sensor, args.sample);
    let demo = args.data.is_none() && args.connect.is_none();

    // Handle non-interactive modes
    if let Some(ref path) = args.write_config {
        let configs = load_configs(args.config_file.as_deref(), demo)?;
        std::fs::write(path, configs.render())?;
        println!("Wrote {} threshold rows to: {}", configs.len(), path.display());
        return Ok(());
    }
    if let Some(ref path) = args.export {
        return export_to_file(&args, path, filter, demo);
    }

    let theme = Theme::from_mode(settings.theme);

    // Handle TCP connection mode
    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, &args, &settings, theme, filter);
    }

    let source: Box<dyn DataSource> = match args.data {
        Some(ref path) => Box::new(FileSource::new(path)),
        None => Box::new(ChannelSource::from_text(demo_log(), "demo data")),
    };
    let app = build_app(source, &args, &settings, theme, filter, demo)?;
    run_tui(app, settings.refresh_interval())
}

/// Send tracing output to `path`; the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "trailwatch=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();

    Ok(())
}

/// The thresholds to start from: the given file, the demo set, or nothing.
fn load_configs(path: Option<&Path>, demo: bool) -> Result<ConfigSet> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(ConfigSet::parse(&text))
        }
        None if demo => Ok(ConfigSet::demo()),
        None => Ok(ConfigSet::default()),
    }
}

fn build_app(
    source: Box<dyn DataSource>,
    args: &Args,
    settings: &Settings,
    theme: Theme,
    filter: SampleFilter,
    demo: bool,
) -> Result<App> {
    let mut app = App::new(source, theme)
        .with_filter(filter)
        .with_output_paths(settings.config_output.clone(), settings.export_path.clone());

    app = match args.config_file {
        Some(ref path) => app.with_config_source(Box::new(FileSource::new(path))),
        None => app.with_configs(load_configs(None, demo)?),
    };

    let _ = app.reload_data();
    Ok(app)
}

/// Run with a TCP stream data source
fn run_with_tcp(
    addr: &str,
    args: &Args,
    settings: &Settings,
    theme: Theme,
    filter: SampleFilter,
) -> Result<()> {
    // Build a tokio runtime for the TCP connection
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                println!("Connected!");
                info!(addr, "Connected to sample stream");
                Ok(Box::new(StreamSource::spawn(stream, addr)) as Box<dyn DataSource>)
            }
            Err(e) => Err(anyhow::anyhow!("Failed to connect to {}: {}", addr, e)),
        }
    })?;

    let app = build_app(source, args, settings, theme, filter, false)?;

    // The stream delivers once, so poll it often
    run_tui(app, Duration::from_millis(100))
}

/// Run the TUI for a prepared app
fn run_tui(mut app: App, refresh_interval: Duration) -> Result<()> {
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

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 70;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Chart => ui::chart::render(frame, app, chunks[2]),
                View::Health => ui::health::render(frame, app, chunks[2]),
                View::Config => ui::editor::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + border (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
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

/// Export the filtered dashboard to a JSON file without starting the UI
fn export_to_file(args: &Args, export_path: &Path, filter: SampleFilter, demo: bool) -> Result<()> {
    let text = match args.data {
        Some(ref path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => demo_log(),
    };
    let samples = parse_samples(&text);
    let configs = load_configs(args.config_file.as_deref(), demo)?;

    let dashboard = Dashboard::build(&samples, &configs, filter);
    dashboard.write_export(export_path)?;

    info!(path = %export_path.display(), samples = dashboard.stats.count, "Exported dashboard");
    println!(
        "Exported {} of {} samples to: {}",
        dashboard.stats.count,
        samples.len(),
        export_path.display()
    );
    Ok(())
}
