use std::{
    fs::{self, File},
    io::stdout,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{LevelFilter, error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, WriteLogger};

use pagestrip::event_source::TerminalEventSource;
use pagestrip::panic_handler;
use pagestrip::pdf::DocumentBackend;
use pagestrip::settings::Settings;
use pagestrip::strip::StartPosition;
use pagestrip::{App, run_app_with_event_source};

/// Continuous-scroll PDF viewer for the terminal
#[derive(Parser, Debug)]
#[command(name = "pagestrip")]
#[command(version)]
pub struct Args {
    /// Document to open
    pub file: PathBuf,

    /// Page to start on (1-based)
    pub page: Option<usize>,

    /// Vertical position within the start page, 0.0 (top) to 1.0
    pub line: Option<f32>,

    /// Horizontal offset in pixels
    #[arg(allow_negative_numbers = true)]
    pub bias: Option<f32>,

    /// Zoom factor, 1.0 is 100%
    pub scale: Option<f32>,

    /// Rotation in degrees
    #[arg(allow_negative_numbers = true)]
    pub rotation: Option<f32>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log file (defaults to the platform cache directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value = "info", value_parser = ["off", "error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Start with the bookmark outline open
    #[arg(long)]
    pub outline: bool,
}

impl Args {
    fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    fn start_position(&self) -> StartPosition {
        let default = StartPosition::default();
        StartPosition {
            page: self.page.map_or(default.page, |p| p.saturating_sub(1)),
            line: self.line.unwrap_or(default.line),
            bias: self.bias.unwrap_or(default.bias),
            scale: self.scale.unwrap_or(default.scale),
            rotation: self.rotation.unwrap_or(default.rotation),
        }
    }
}

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("pagestrip"))
        .unwrap_or_default()
        .join("pagestrip.log")
}

fn init_logging(path: &Path, level: LevelFilter) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {parent:?}"))?;
        }
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create log file {path:?}"))?;
    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}

#[cfg(feature = "pdf")]
fn open_and_run(args: &Args, settings: Settings) -> Result<()> {
    // open before touching the terminal so errors print normally
    let doc = pagestrip::pdf::MupdfDocument::open(&args.file)
        .with_context(|| format!("Cannot open {:?}", args.file))?;
    run_viewer(doc, args.start_position(), settings)
}

#[cfg(not(feature = "pdf"))]
fn open_and_run(args: &Args, _settings: Settings) -> Result<()> {
    let err = pagestrip::pdf::OpenError::Unsupported {
        path: args.file.clone(),
    };
    Err(anyhow::Error::new(err).context(format!("Cannot open {:?}", args.file)))
}

#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
fn run_viewer<D: DocumentBackend>(doc: D, start: StartPosition, settings: Settings) -> Result<()> {
    let mut app = App::new(doc, start, settings);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut event_source = TerminalEventSource;
    let res = run_app_with_event_source(&mut terminal, &mut app, &mut event_source);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.close();
    res
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(default_log_path);
    init_logging(&log_path, args.level_filter())?;
    info!("Starting pagestrip on {:?}", args.file);

    panic_handler::initialize_panic_handler();

    let mut settings = Settings::load_or_create(args.config.as_deref());
    if args.outline {
        settings.show_outline = true;
    }

    let res = open_and_run(&args, settings);
    if let Err(err) = &res {
        error!("Application error: {err:?}");
    }
    info!("Shutting down");
    res
}
