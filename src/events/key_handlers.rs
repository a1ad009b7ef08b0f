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

//! Keyboard routing.
//!
//! Every key press goes through [`process_key_event`]. A few keys are global
//! (quit, focus cycling, clearing the form); everything else is handed to the
//! widget that currently holds focus.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

use crate::{
    focus::FocusTarget,
    form::{CLEAR_BUTTON, SAVE_BUTTON},
    session::{EditorView, Session},
};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum KeyOutcome {
    Continue,
    Quit,
}

/// Applies one key press to the session and view.
///
/// `q` quits from anywhere, even with a dialog open or a text field focused.
/// While a dialog is open, Enter, Esc or Space dismiss it and every other key
/// is ignored.
pub(crate) fn process_key_event(
    session: &mut Session,
    view: &mut impl EditorView,
    key: KeyEvent,
) -> KeyOutcome {
    if key.kind == KeyEventKind::Release {
        return KeyOutcome::Continue;
    }

    if key.code == KeyCode::Char('q') {
        return KeyOutcome::Quit;
    }

    if view.has_modal() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            view.dismiss_modal();
        }
        return KeyOutcome::Continue;
    }

    match key.code {
        KeyCode::Tab => session.focus_next(view),
        KeyCode::BackTab => session.focus_previous(view),
        KeyCode::Esc => session.clear_form(view),
        _ => process_focused_key_event(session, view, key),
    }

    KeyOutcome::Continue
}

fn process_focused_key_event(session: &mut Session, view: &mut impl EditorView, key: KeyEvent) {
    match session.focus_target(view) {
        FocusTarget::FileList => match key.code {
            KeyCode::Char('j') | KeyCode::Down => view.file_list().next(),
            KeyCode::Char('k') | KeyCode::Up => view.file_list().previous(),
            KeyCode::Char('g') | KeyCode::Home => view.file_list().first(),
            KeyCode::Char('G') | KeyCode::End => view.file_list().last(),
            KeyCode::Enter => session.activate_selection(view),
            _ => {}
        },

        // Enter submits the form from any of its fields
        FocusTarget::Field(_) if key.code == KeyCode::Enter => session.save(view),
        FocusTarget::Field(index) => view.form().edit(index, &Event::Key(key)),

        FocusTarget::Button(button) => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                match button {
                    SAVE_BUTTON => session.save(view),
                    CLEAR_BUTTON => session.clear_form(view),
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::{
        metadata::{self, Metadata, tests::silent_mp3},
        session::tests::{RecordingView, store},
    };

    fn press(session: &mut Session, view: &mut RecordingView, code: KeyCode) -> KeyOutcome {
        let modifiers = if code == KeyCode::BackTab { KeyModifiers::SHIFT } else { KeyModifiers::NONE };
        process_key_event(session, view, KeyEvent::new(code, modifiers))
    }

    fn type_text(session: &mut Session, view: &mut RecordingView, text: &str) {
        for c in text.chars() {
            press(session, view, KeyCode::Char(c));
        }
    }

    fn browser(dir: &std::path::Path) -> (Session, RecordingView) {
        let mut session = Session::browser(dir.to_path_buf(), store(), false);
        let mut view = RecordingView::default();
        session.start(&mut view);
        (session, view)
    }

    #[test]
    fn q_quits_from_anywhere() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut view) = browser(dir.path());
        assert_eq!(press(&mut session, &mut view, KeyCode::Char('q')), KeyOutcome::Quit);

        press(&mut session, &mut view, KeyCode::Tab);
        view.modal_open = true;
        assert_eq!(press(&mut session, &mut view, KeyCode::Char('q')), KeyOutcome::Quit);
    }

    #[test]
    fn tab_and_shift_tab_cycle_focus() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut view) = browser(dir.path());

        press(&mut session, &mut view, KeyCode::BackTab);
        assert_eq!(view.focus, Some(FocusTarget::Button(1)));

        press(&mut session, &mut view, KeyCode::Tab);
        assert_eq!(view.focus, Some(FocusTarget::FileList));

        for _ in 0..7 {
            press(&mut session, &mut view, KeyCode::Tab);
        }
        assert_eq!(view.focus, Some(FocusTarget::FileList));
    }

    #[test]
    fn esc_clears_form_without_moving_focus() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut view) = browser(dir.path());
        view.form.populate(&Metadata::new("Song", "Artist", "Album"));
        press(&mut session, &mut view, KeyCode::Tab);

        press(&mut session, &mut view, KeyCode::Esc);

        assert_eq!(view.form.values(), Metadata::default());
        assert_eq!(session.focus_position(), 1);
    }

    #[test]
    fn enter_on_file_opens_it_and_typing_edits_field() {
        let dir = tempfile::tempdir().unwrap();
        silent_mp3(dir.path(), "a.mp3");
        let (mut session, mut view) = browser(dir.path());

        press(&mut session, &mut view, KeyCode::Down);
        press(&mut session, &mut view, KeyCode::Enter);
        assert_eq!(view.focus, Some(FocusTarget::Field(0)));

        type_text(&mut session, &mut view, "Hello");
        press(&mut session, &mut view, KeyCode::Tab);
        type_text(&mut session, &mut view, "Band");

        assert_eq!(view.form.values(), Metadata::new("Hello", "Band", ""));
    }

    #[test]
    fn enter_in_field_saves_and_dialog_blocks_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(dir.path(), "a.mp3");
        let (mut session, mut view) = browser(dir.path());

        press(&mut session, &mut view, KeyCode::Down);
        press(&mut session, &mut view, KeyCode::Enter);
        type_text(&mut session, &mut view, "Hello");
        press(&mut session, &mut view, KeyCode::Enter);

        assert!(view.modal_open);
        assert_eq!(metadata::read(&path).track_name, "Hello");

        press(&mut session, &mut view, KeyCode::Tab);
        assert_eq!(session.focus_position(), 1);

        press(&mut session, &mut view, KeyCode::Enter);
        assert!(!view.modal_open);
    }

    #[test]
    fn buttons_save_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(dir.path(), "a.mp3");
        let mut session = Session::direct(path.clone(), store());
        let mut view = RecordingView::default();
        session.start(&mut view);

        type_text(&mut session, &mut view, "Song");
        for _ in 0..4 {
            press(&mut session, &mut view, KeyCode::Tab);
        }
        assert_eq!(view.focus, Some(FocusTarget::Button(SAVE_BUTTON)));
        press(&mut session, &mut view, KeyCode::Char(' '));
        assert_eq!(metadata::read(&path).track_name, "Song");
        press(&mut session, &mut view, KeyCode::Esc);

        press(&mut session, &mut view, KeyCode::Tab);
        assert_eq!(view.focus, Some(FocusTarget::Button(CLEAR_BUTTON)));
        press(&mut session, &mut view, KeyCode::Enter);
        assert_eq!(view.form.values(), Metadata::default());
    }

    #[test]
    fn enter_on_directory_navigates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let (mut session, mut view) = browser(dir.path());

        press(&mut session, &mut view, KeyCode::Char('j'));
        press(&mut session, &mut view, KeyCode::Enter);

        assert_eq!(session.current_dir(), dir.path().join("sub"));
        assert_eq!(view.focus, Some(FocusTarget::FileList));
    }
}
