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

//! Directory listing and selection path resolution.
//!
//! The file browser shows three kinds of entry: the synthetic parent marker
//! `..`, sub-directories (rendered with a trailing `/`) and MP3 files. The
//! functions in this module classify those entry strings and turn a selection
//! back into a filesystem path. Everything except [`list_directory`] is pure.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Entry text used for the synthetic "go to parent directory" row.
pub(crate) const PARENT_ENTRY: &str = "..";

/// Suffix appended to directory names in a listing.
pub(crate) const DIR_SUFFIX: char = '/';

const AUDIO_EXTENSION: &str = ".mp3";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum EntryKind {
    Parent,
    Directory,
    AudioFile,
}

impl EntryKind {
    /// Parent and directory entries navigate rather than open.
    pub(crate) fn is_navigable(self) -> bool {
        matches!(self, EntryKind::Parent | EntryKind::Directory)
    }
}

/// Classifies a listing entry by its text alone.
///
/// Only directories and MP3 files are ever listed, so anything that is neither
/// the parent marker nor separator-terminated is an audio file.
pub(crate) fn classify(entry: &str) -> EntryKind {
    if entry == PARENT_ENTRY {
        EntryKind::Parent
    } else if entry.ends_with(DIR_SUFFIX) || entry.ends_with(std::path::MAIN_SEPARATOR) {
        EntryKind::Directory
    } else {
        EntryKind::AudioFile
    }
}

/// Resolves a listing entry relative to `current_dir`.
///
/// The parent of the filesystem root is the root itself.
pub(crate) fn resolve(current_dir: &Path, entry: &str) -> PathBuf {
    match classify(entry) {
        EntryKind::Parent => current_dir.parent().unwrap_or(current_dir).to_path_buf(),
        EntryKind::Directory => current_dir.join(
            entry
                .trim_end_matches(DIR_SUFFIX)
                .trim_end_matches(std::path::MAIN_SEPARATOR),
        ),
        EntryKind::AudioFile => current_dir.join(entry),
    }
}

/// Returns the audio file path for the selected entry, if there is one.
///
/// `None` for an empty listing, no selection, or a selection that is the
/// parent marker or a directory. This is what keeps Save from ever being
/// pointed at a directory.
pub(crate) fn selected_path(
    entries: &[String],
    selected: Option<usize>,
    current_dir: &Path,
) -> Option<PathBuf> {
    let entry = entries.get(selected?)?;
    if entry.is_empty() || classify(entry).is_navigable() {
        return None;
    }
    Some(resolve(current_dir, entry))
}

/// Case-insensitive `.mp3` suffix test.
pub(crate) fn is_mp3_file(name: &str) -> bool {
    name.to_lowercase().ends_with(AUDIO_EXTENSION)
}

/// Lists `dir` the way the file browser shows it.
///
/// The parent marker comes first unless `dir` is the filesystem root, then
/// sub-directories, then MP3 files, each group sorted case-insensitively. An
/// unreadable directory produces just the parent marker.
pub(crate) fn list_directory(dir: &Path, show_hidden: bool) -> Vec<String> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let name = entry.file_name().to_string_lossy().to_string();
        if !show_hidden && name.starts_with('.') {
            continue;
        }

        if entry.file_type().is_dir() {
            dirs.push(format!("{name}{DIR_SUFFIX}"));
        } else if is_mp3_file(&name) {
            files.push(name);
        }
    }

    dirs.sort_by_key(|name| name.to_lowercase());
    files.sort_by_key(|name| name.to_lowercase());

    let mut listing = Vec::with_capacity(dirs.len() + files.len() + 1);
    if dir.parent().is_some() {
        listing.push(PARENT_ENTRY.to_string());
    }
    listing.extend(dirs);
    listing.extend(files);
    listing
}
