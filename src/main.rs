// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # MP3 Tag Editor TUI.
//!
//! A terminal editor for the title, artist, album and cover art of MP3 files.
//!
//! Run without arguments to browse from the working directory, or pass a file
//! path to edit just that file.
//!
//! ## Architecture
//!
//! * [`session`] owns the editing state and the save/open/navigate logic.
//! * [`metadata`] reads, writes and compares tags.
//! * [`focus`] is the Tab/Shift+Tab focus ring.
//! * [`render`] adapts all of that onto a `ratatui` terminal.
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is restored even when the run loop fails. Everything runs on
//! the main thread, one key press at a time.

mod browser;
mod config;
mod events;
mod files;
mod focus;
mod form;
mod metadata;
mod render;
mod session;
mod theme;
mod util;

use std::{env, io, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    events::process_events,
    metadata::MetadataStore,
    render::TerminalView,
    session::{Session, resolve_target},
    theme::Theme,
};

const LOG_FILE_NAME: &str = "id3tui.log";

#[derive(Parser)]
#[command(name = "id3tui", version, about = "Edit MP3 track, artist, album and cover art tags")]
struct Args {
    /// MP3 file to edit directly; browse the working directory if omitted
    file: Option<PathBuf>,

    /// Print the configuration file location and exit
    #[arg(long)]
    config_path: bool,
}

/// Application state.
struct App {
    pub session: Session,
    pub view: TerminalView,
}

impl App {
    /// Builds the session for the requested mode and prepares the first frame.
    ///
    /// # Errors
    ///
    /// Returns an error if a file was given that is not an existing regular
    /// file, or if the working directory cannot be determined.
    fn new(config: &AppConfig, file: Option<PathBuf>) -> Result<Self> {
        let store = MetadataStore::new(config.cover_strategy, &config.ffmpeg);

        let (mut session, mut view) = match file {
            Some(file) => {
                let file = resolve_target(&file)?;
                info!(file = %file.display(), "editing single file");
                let view = TerminalView::new(Theme::default(), Some(&file));
                (Session::direct(file, store), view)
            }
            None => {
                let dir = env::current_dir().context("Failed to determine working directory")?;
                info!(dir = %dir.display(), "browsing");
                let view = TerminalView::new(Theme::default(), None);
                (Session::browser(dir, store, config.show_hidden), view)
            }
        };

        session.start(&mut view);
        Ok(Self { session, view })
    }
}

/// The entry point of the application.
///
/// Validates arguments before the terminal is touched so that argument errors
/// are printed plainly, then runs the UI until the user quits.
fn main() -> ExitCode {
    let args = Args::parse();
    let config = config::load_config();

    if args.config_path {
        return match config::config_path() {
            Ok(path) => {
                println!("{}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    let _guard = init_logging(&config);

    match run_app(&config, args.file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Sends tracing output to a daily log file next to the configuration file.
///
/// Returns `None` (and logs nowhere) if that directory cannot be determined.
fn init_logging(config: &AppConfig) -> Option<WorkerGuard> {
    let log_dir = config::config_path().ok()?.parent()?.to_path_buf();
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .ok()?;

    Some(guard)
}

fn run_app(config: &AppConfig, file: Option<PathBuf>) -> Result<()> {
    let mut app = App::new(config, file)?;

    let mut terminal = setup_terminal(&app)?;
    let res = process_events(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin outline in the terminal's own colour
    if let Some(hex) = Theme::to_hex(app.view.theme.background_colour) {
        util::term::set_terminal_bg(&hex);
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including disabling
/// raw mode, leaving the alternate screen, and resetting the background color.
/// It also ensures the cursor is made visible again.
///
/// This function is "best-effort" and does not return a result, as it is
/// called during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg();
    terminal.show_cursor().ok();
}
