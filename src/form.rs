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

//! Metadata form state.
//!
//! Four text inputs, one per editable field, followed by the Save and Clear
//! buttons. Text editing is delegated to `tui-input`.

use crossterm::event::Event;
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::metadata::Metadata;

pub(crate) const FIELD_LABELS: [&str; 4] = ["Track Name", "Artist", "Album", "Cover Image Path"];
pub(crate) const BUTTON_LABELS: [&str; 2] = ["Save", "Clear"];

pub(crate) const SAVE_BUTTON: usize = 0;
pub(crate) const CLEAR_BUTTON: usize = 1;

#[derive(Default)]
pub(crate) struct MetadataForm {
    pub(crate) fields: [Input; 4],
}

impl MetadataForm {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub(crate) fn button_count(&self) -> usize {
        BUTTON_LABELS.len()
    }

    /// Replaces every field with the values of `metadata`.
    pub(crate) fn populate(&mut self, metadata: &Metadata) {
        let values = [
            &metadata.track_name,
            &metadata.artist,
            &metadata.album,
            &metadata.cover_path,
        ];
        for (field, value) in self.fields.iter_mut().zip(values) {
            *field = Input::new(value.clone());
        }
    }

    /// Empties all four fields.
    pub(crate) fn clear(&mut self) {
        self.fields.iter_mut().for_each(Input::reset);
    }

    pub(crate) fn values(&self) -> Metadata {
        let [track_name, artist, album, cover_path] = &self.fields;
        Metadata {
            track_name: track_name.value().to_string(),
            artist: artist.value().to_string(),
            album: album.value().to_string(),
            cover_path: cover_path.value().trim().to_string(),
        }
    }

    /// Passes a key event to the text input at `index`.
    pub(crate) fn edit(&mut self, index: usize, event: &Event) {
        if let Some(field) = self.fields.get_mut(index) {
            field.handle_event(event);
        }
    }
}
