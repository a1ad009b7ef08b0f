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

//! File browser state management.
//!
//! This module provides state for the file list widget: the entries of the
//! current directory and the selected row.

use std::path::{Path, PathBuf};

use ratatui::widgets::ListState;

use crate::files;

#[derive(Default)]
pub(crate) struct FileList {
    pub(crate) entries: Vec<String>,
    pub(crate) state: ListState,
}

impl FileList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_entries(&mut self, entries: Vec<String>) {
        self.entries = entries;
        self.state.select((!self.entries.is_empty()).then_some(0));
    }

    pub(crate) fn selected_entry(&self) -> Option<&str> {
        let index = self.state.selected()?;
        self.entries.get(index).map(String::as_str)
    }

    /// The audio file under the cursor, resolved against `current_dir`.
    pub(crate) fn selected_path(&self, current_dir: &Path) -> Option<PathBuf> {
        files::selected_path(&self.entries, self.state.selected(), current_dir)
    }

    pub(crate) fn next(&mut self) {
        let len = self.entries.len();
        if len == 0 { return; }
        let i = match self.state.selected() {
            Some(i) => if i >= len - 1 { 0 } else { i + 1 },
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub(crate) fn previous(&mut self) {
        let len = self.entries.len();
        if len == 0 { return; }
        let i = match self.state.selected() {
            Some(i) => if i == 0 { len - 1 } else { i - 1 },
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub(crate) fn first(&mut self) {
        self.state.select((!self.entries.is_empty()).then_some(0));
    }

    pub(crate) fn last(&mut self) {
        self.state.select(self.entries.len().checked_sub(1));
    }
}
