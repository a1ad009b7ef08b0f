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

//! Editing session orchestration.
//!
//! A [`Session`] owns everything that outlives a single key press: the mode,
//! the current directory, the last metadata snapshot and the focus position.
//! It drives the presentation layer only through the [`EditorView`]
//! capability trait, so the same logic runs against the terminal UI and
//! against the recording view used in tests.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    browser::FileList,
    files,
    focus::{FocusController, FocusRing, FocusTarget},
    form::MetadataForm,
    metadata::{self, Metadata, MetadataStore},
};

const SAVED_MESSAGE: &str = "Metadata saved successfully!";
const NO_CHANGES_MESSAGE: &str = "No changes detected";

/// What the session needs from whatever is drawing it.
pub(crate) trait EditorView {
    fn form(&mut self) -> &mut MetadataForm;
    fn file_list(&mut self) -> &mut FileList;

    /// Moves keyboard focus to `target`.
    fn set_focus(&mut self, target: FocusTarget);

    /// Notes the directory now being shown, for titles and the like.
    fn set_current_dir(&mut self, dir: &Path);

    fn show_error(&mut self, message: &str);
    fn show_message(&mut self, message: &str);

    /// Whether a modal dialog currently covers the main view.
    fn has_modal(&self) -> bool;

    /// Closes the modal dialog and returns to the main view.
    fn dismiss_modal(&mut self);
}

/// Failures validating the file named on the command line.
#[derive(Debug, Error)]
pub(crate) enum TargetError {
    #[error("invalid file path: {0}")]
    InvalidPath(io::Error),

    #[error("cannot access file: {0}")]
    CannotAccess(io::Error),

    #[error("path is a directory, not a file")]
    IsDirectory,
}

/// Checks that `path` names an existing regular file and makes it absolute.
pub(crate) fn resolve_target(path: &Path) -> Result<PathBuf, TargetError> {
    let absolute = std::path::absolute(path).map_err(TargetError::InvalidPath)?;
    let info = fs::metadata(&absolute).map_err(TargetError::CannotAccess)?;
    if info.is_dir() {
        return Err(TargetError::IsDirectory);
    }
    Ok(absolute)
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum EditMode {
    /// Browse directories and pick files to edit.
    Browser,
    /// Edit a single file given on the command line.
    Direct(PathBuf),
}

pub(crate) struct Session {
    mode: EditMode,
    current_dir: PathBuf,
    metadata: Metadata,
    /// The file `metadata` was read from, if any.
    loaded: Option<PathBuf>,
    focus: FocusController,
    store: MetadataStore,
    show_hidden: bool,
}

impl Session {
    pub(crate) fn browser(dir: PathBuf, store: MetadataStore, show_hidden: bool) -> Self {
        Self {
            mode: EditMode::Browser,
            current_dir: dir,
            metadata: Metadata::default(),
            loaded: None,
            focus: FocusController::new(),
            store,
            show_hidden,
        }
    }

    /// A session pinned to `file`, which must already have been validated
    /// with [`resolve_target`].
    pub(crate) fn direct(file: PathBuf, store: MetadataStore) -> Self {
        let current_dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            metadata: metadata::read(&file),
            loaded: Some(file.clone()),
            mode: EditMode::Direct(file),
            current_dir,
            focus: FocusController::new(),
            store,
            show_hidden: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    #[cfg(test)]
    pub(crate) fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[cfg(test)]
    pub(crate) fn focus_position(&self) -> usize {
        self.focus.position()
    }

    pub(crate) fn is_direct(&self) -> bool {
        matches!(self.mode, EditMode::Direct(_))
    }

    /// Fills the view for the first frame and sets the initial focus.
    pub(crate) fn start(&mut self, view: &mut impl EditorView) {
        if self.is_direct() {
            view.set_current_dir(&self.current_dir);
            view.form().populate(&self.metadata);
        } else {
            let dir = self.current_dir.clone();
            self.load_directory(dir, view);
        }
        let ring = self.ring(view);
        view.set_focus(self.focus.target(&ring));
    }

    /// The focus ring as the view currently stands.
    pub(crate) fn ring(&self, view: &mut impl EditorView) -> FocusRing {
        let form = view.form();
        FocusRing {
            has_file_list: !self.is_direct(),
            fields: form.field_count(),
            buttons: form.button_count(),
        }
    }

    pub(crate) fn focus_target(&self, view: &mut impl EditorView) -> FocusTarget {
        let ring = self.ring(view);
        self.focus.target(&ring)
    }

    pub(crate) fn focus_next(&mut self, view: &mut impl EditorView) {
        let ring = self.ring(view);
        let target = self.focus.next(&ring);
        view.set_focus(target);
    }

    pub(crate) fn focus_previous(&mut self, view: &mut impl EditorView) {
        let ring = self.ring(view);
        let target = self.focus.previous(&ring);
        view.set_focus(target);
    }

    /// Empties the form. Focus stays where it is.
    pub(crate) fn clear_form(&mut self, view: &mut impl EditorView) {
        view.form().clear();
    }

    /// Acts on the file list entry under the cursor: directories and the
    /// parent marker are entered, audio files are opened for editing.
    pub(crate) fn activate_selection(&mut self, view: &mut impl EditorView) {
        if self.is_direct() {
            return;
        }

        let Some(entry) = view.file_list().selected_entry().map(str::to_string) else {
            return;
        };

        if files::classify(&entry).is_navigable() {
            let dir = files::resolve(&self.current_dir, &entry);
            if dir.is_dir() {
                self.load_directory(dir, view);
            } else {
                debug!(dir = %dir.display(), "directory no longer exists");
            }
        } else {
            let path = files::resolve(&self.current_dir, &entry);
            self.open_file(&path, view);
        }
    }

    fn load_directory(&mut self, dir: PathBuf, view: &mut impl EditorView) {
        info!(dir = %dir.display(), "entering directory");
        view.file_list()
            .set_entries(files::list_directory(&dir, self.show_hidden));
        view.set_current_dir(&dir);
        self.current_dir = dir;
    }

    /// Loads `path` into the snapshot and the form, then focuses the first
    /// field.
    pub(crate) fn open_file(&mut self, path: &Path, view: &mut impl EditorView) {
        info!(path = %path.display(), "opening file");
        self.metadata = metadata::read(path);
        self.loaded = Some(path.to_path_buf());
        view.form().populate(&self.metadata);

        let ring = self.ring(view);
        let target = self.focus.focus_first_field(&ring);
        view.set_focus(target);
    }

    /// The file a save would write to, if any.
    pub(crate) fn save_target(&self, view: &mut impl EditorView) -> Option<PathBuf> {
        match &self.mode {
            EditMode::Direct(file) => Some(file.clone()),
            EditMode::Browser => view.file_list().selected_path(&self.current_dir),
        }
    }

    /// Writes the form to the target file and reports the outcome through
    /// the view. Does nothing if there is no file to write to.
    pub(crate) fn save(&mut self, view: &mut impl EditorView) {
        let Some(path) = self.save_target(view) else {
            debug!("save requested with no file selected");
            return;
        };

        // The cursor may have moved off the file the form was loaded from
        let before = if self.loaded.as_deref() == Some(path.as_path()) {
            self.metadata.clone()
        } else {
            metadata::read(&path)
        };

        let edited = view.form().values();
        match self.store.save(&path, &before, &edited) {
            Ok(outcome) => {
                info!(path = %path.display(), changed = !outcome.changes.is_empty(), "save complete");
                if outcome.changes.is_empty() {
                    view.show_message(NO_CHANGES_MESSAGE);
                } else {
                    view.show_message(&format!("{SAVED_MESSAGE}\n\n{}", outcome.changes));
                }
                self.metadata = outcome.saved;
                self.loaded = Some(path);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "save failed");
                view.show_error(&e.to_string());
            }
        }
    }
}
