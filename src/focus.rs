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

//! Keyboard focus cycling.
//!
//! Focus moves around a ring made up of the file list (browser mode only), the
//! form fields and then the form buttons. The ring is described afresh on
//! every key press by a [`FocusRing`], so the controller itself only stores a
//! position and never caches the ring's size.

/// A concrete widget that can hold focus.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum FocusTarget {
    FileList,
    Field(usize),
    Button(usize),
}

/// The current shape of the focus ring.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct FocusRing {
    pub(crate) has_file_list: bool,
    pub(crate) fields: usize,
    pub(crate) buttons: usize,
}

impl FocusRing {
    pub(crate) fn len(&self) -> usize {
        usize::from(self.has_file_list) + self.fields + self.buttons
    }

    /// Position of the first form field.
    pub(crate) fn first_field(&self) -> usize {
        usize::from(self.has_file_list)
    }

    /// Maps a ring position onto the widget it stands for.
    pub(crate) fn target(&self, position: usize) -> FocusTarget {
        if self.has_file_list && position == 0 {
            return FocusTarget::FileList;
        }

        let idx = position - self.first_field();
        if idx < self.fields {
            FocusTarget::Field(idx)
        } else {
            FocusTarget::Button(idx - self.fields)
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub(crate) struct FocusController {
    position: usize,
}

impl FocusController {
    /// Starts on position 0: the file list in browser mode, otherwise the
    /// first form field.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn target(&self, ring: &FocusRing) -> FocusTarget {
        ring.target(self.position % ring.len().max(1))
    }

    /// Tab.
    pub(crate) fn next(&mut self, ring: &FocusRing) -> FocusTarget {
        let len = ring.len();
        if len > 0 {
            self.position = (self.position % len + 1) % len;
        }
        self.target(ring)
    }

    /// Shift+Tab.
    pub(crate) fn previous(&mut self, ring: &FocusRing) -> FocusTarget {
        let len = ring.len();
        if len > 0 {
            self.position = (self.position % len + len - 1) % len;
        }
        self.target(ring)
    }

    /// Jumps to the first form field, as happens after a file is opened.
    pub(crate) fn focus_first_field(&mut self, ring: &FocusRing) -> FocusTarget {
        self.position = ring.first_field();
        self.target(ring)
    }
}
