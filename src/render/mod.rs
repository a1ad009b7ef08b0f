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

//! User interface rendering logic.
//!
//! This module is the ratatui adapter for the editing session. [`TerminalView`]
//! holds the widget state and implements [`EditorView`], and [`draw`] turns it
//! into a frame.
//!
//! # Rendering Pipeline
//!
//! [`draw`] is called before every blocking read of the next terminal event,
//! so the screen always reflects the state left by the previous key press.

mod browser;
mod form;
mod modal;

use std::path::{Path, PathBuf};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Paragraph},
};

use crate::{
    browser::FileList,
    focus::FocusTarget,
    form::MetadataForm,
    session::EditorView,
    theme::Theme,
};

const BROWSER_HELP: &str = "↑↓ Navigate | Enter: Open | Tab/Shift+Tab: Cycle | Esc: Clear | q: Quit";
const DIRECT_HELP: &str = "Tab: Cycle fields | Enter: Save | Esc: Clear | q: Quit";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum ModalKind {
    Error,
    Message,
}

pub(crate) struct Modal {
    pub(crate) kind: ModalKind,
    pub(crate) text: String,
}

/// Widget state for the terminal UI.
pub(crate) struct TerminalView {
    pub(crate) theme: Theme,
    pub(crate) form: MetadataForm,
    pub(crate) file_list: FileList,
    pub(crate) focus: FocusTarget,
    pub(crate) current_dir: PathBuf,
    /// Name of the pinned file when editing a single file.
    pub(crate) editing: Option<String>,
    pub(crate) modal: Option<Modal>,
}

impl TerminalView {
    pub(crate) fn new(theme: Theme, editing: Option<&Path>) -> Self {
        Self {
            theme,
            form: MetadataForm::new(),
            file_list: FileList::new(),
            focus: FocusTarget::FileList,
            current_dir: PathBuf::new(),
            editing: editing
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().to_string()),
            modal: None,
        }
    }
}

impl EditorView for TerminalView {
    fn form(&mut self) -> &mut MetadataForm {
        &mut self.form
    }

    fn file_list(&mut self) -> &mut FileList {
        &mut self.file_list
    }

    fn set_focus(&mut self, target: FocusTarget) {
        self.focus = target;
    }

    fn set_current_dir(&mut self, dir: &Path) {
        self.current_dir = dir.to_path_buf();
    }

    fn show_error(&mut self, message: &str) {
        self.modal = Some(Modal { kind: ModalKind::Error, text: message.to_string() });
    }

    fn show_message(&mut self, message: &str) {
        self.modal = Some(Modal { kind: ModalKind::Message, text: message.to_string() });
    }

    fn has_modal(&self) -> bool {
        self.modal.is_some()
    }

    fn dismiss_modal(&mut self) {
        self.modal = None;
    }
}

/// Renders the user interface to the terminal frame.
///
/// In browser mode the screen is split between the file list and the form;
/// in single-file mode the form takes the whole width. A status line with the
/// key bindings sits underneath, and any open dialog is drawn on top.
pub(crate) fn draw(f: &mut Frame, view: &mut TerminalView) {
    let area = f.area();
    let theme = view.theme;

    f.render_widget(Block::default().style(Style::default().bg(theme.background_colour)), area);

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let help = match view.editing.clone() {
        Some(name) => {
            form::draw_form(f, outer[0], view, &format!(" Editing: {name} "));
            DIRECT_HELP
        }
        None => {
            let main = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
                .split(outer[0]);

            browser::draw_file_list(f, main[0], view);
            form::draw_form(f, main[1], view, " Metadata Editor ");
            BROWSER_HELP
        }
    };

    f.render_widget(
        Paragraph::new(help)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.text_dim_colour)),
        outer[1],
    );

    if let Some(modal) = &view.modal {
        modal::draw_modal(f, area, modal, &theme);
    }
}
