// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
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

mod app;
mod data;
mod events;
mod settings;
mod source;
mod ui;

use app::{App, View};
use settings::Settings;
use source::{DataSource, FileSource, SimSource, StreamSource};

#[derive(Parser, Debug)]
#[command(name = "unitwatch")]
#[command(about = "Diagnostic TUI for monitoring field unit health and alarm activity")]
struct Args {
    /// Path to a health snapshot JSON file
    #[arg(short, long, conflicts_with_all = ["connect", "sim"])]
    file: Option<PathBuf>,

    /// Connect to a TCP endpoint for live snapshots (host:port)
    #[arg(short, long, conflicts_with_all = ["file", "sim"])]
    connect: Option<String>,

    /// Run against the built-in fleet simulator (default when no source is given)
    #[arg(long, conflicts_with_all = ["file", "connect"])]
    sim: bool,

    /// Number of simulated units (overrides settings)
    #[arg(long)]
    sim_units: Option<usize>,

    /// Refresh interval in seconds (file polling and simulator cadence)
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Path to a TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed the ledger with fabricated demo alarm history
    #[arg(long)]
    demo_alarms: bool,

    /// Export the alarm view as CSV into this directory and exit
    #[arg(short, long, conflicts_with_all = ["connect"])]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?;
    let refresh = Duration::from_secs(args.refresh.max(1));

    // Handle export mode (non-interactive)
    if let Some(ref export_dir) = args.export {
        return export_to_dir(&args, &settings, export_dir);
    }

    // Handle TCP connection mode
    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, &args, &settings);
    }

    // File mode
    if let Some(ref path) = args.file {
        let source = Box::new(FileSource::new(path));
        return run_tui(source, &args, &settings, refresh);
    }

    // Default: simulator mode
    let source = Box::new(sim_source(&args, &settings, refresh));
    run_tui(source, &args, &settings, refresh)
}

/// Build the simulator from settings plus CLI overrides
fn sim_source(args: &Args, settings: &Settings, refresh: Duration) -> SimSource {
    let units = args.sim_units.unwrap_or(settings.sim.units);
    SimSource::new(units, settings.sim.seed, refresh)
}

/// Run with a TCP stream data source
fn run_with_tcp(addr: &str, args: &Args, settings: &Settings) -> Result<()> {
    // Build a tokio runtime for the TCP connection
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                println!("Connected!");
                Ok(Box::new(StreamSource::spawn(stream, addr)) as Box<dyn DataSource>)
            }
            Err(e) => Err(anyhow::anyhow!("Failed to connect to {}: {}", addr, e)),
        }
    })?;

    // For TCP, we poll continuously (no refresh interval needed)
    run_tui(source, args, settings, Duration::from_millis(100))
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    args: &Args,
    settings: &Settings,
    refresh_interval: Duration,
) -> Result<()> {
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
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, settings.system_name.clone());
    let _ = app.reload_data();

    // Demo seeding is an explicit, separate step
    if args.demo_alarms {
        app.seed_demo(&settings.seed_config(), settings.demo.seed);
    }

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
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

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
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with fleet health
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Units => ui::units::render(frame, app, chunks[2]),
                View::Alarms => ui::alarms::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render detail overlay if active
            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table header (1)
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

/// Export the current alarm view as CSV without entering the TUI
fn export_to_dir(args: &Args, settings: &Settings, export_dir: &std::path::Path) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    // Headless mode logs integrity warnings to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let source: Box<dyn DataSource> = match args.file {
        Some(ref path) => Box::new(FileSource::new(path)),
        None => Box::new(sim_source(args, settings, Duration::from_secs(args.refresh.max(1)))),
    };

    let mut app = App::new(source, settings.system_name.clone());
    if !app.reload_data()? {
        anyhow::bail!("No health snapshot available to export");
    }

    if args.demo_alarms {
        app.seed_demo(&settings.seed_config(), settings.demo.seed);
    }

    let path = app.export_alarms(export_dir)?;
    println!("Exported alarms to: {}", path.display());
    Ok(())
}
