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

//! The application event loop.
//!
//! Input is handled synchronously on the main thread: draw a frame, block for
//! the next terminal event, apply it, repeat. Saving (including any external
//! transcode) happens inside the key handler, so the interface waits for it.
//!
//! # Organization
//!
//! * [`key_handlers`]: Maps key presses onto focus changes and session
//!   actions.

pub(crate) mod key_handlers;

use std::io::Stdout;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::info;

use crate::{
    App,
    events::key_handlers::{KeyOutcome, process_key_event},
    render::draw,
};

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until the user quits.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| draw(f, &mut app.view))
            .context("Failed to draw frame")?;

        match event::read().context("Failed to read terminal event")? {
            Event::Key(key) => {
                if process_key_event(&mut app.session, &mut app.view, key) == KeyOutcome::Quit {
                    info!("quit requested");
                    break;
                }
            }
            // Anything else (resize, focus, mouse) just triggers a redraw
            _ => {}
        }
    }
    Ok(())
}
