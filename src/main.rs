// heapview: replay a recorded debugger trace as stack and heap diagrams

use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use heapview::config::Config;
use heapview::snapshot::Trace;
use heapview::ui::App;
use heapview::{logging, Result};

/// Step through a recorded trace with live stack and heap diagrams
#[derive(Parser, Debug)]
#[command(name = "heapview", version, about, long_about = None)]
struct Args {
    /// Trace file (JSON) to replay
    trace: PathBuf,

    /// Config file path (defaults apply if not specified)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file; nothing is logged without it
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Dropping the guard flushes pending log records; hold it until exit
    let _log_guard = match &args.log_file {
        Some(path) => Some(logging::init_file_logging(path)?),
        None => None,
    };

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    eprintln!("Loading {}...", args.trace.display());
    let trace = Trace::load(&args.trace, config.player.history_limit_bytes)?;
    eprintln!("Loaded {} steps.", trace.len());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(trace, config);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(%err, "terminal error");
        eprintln!("Error: {}", err);
    }

    Ok(())
}
