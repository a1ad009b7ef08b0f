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

//! Render the file browser.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
};

use crate::{files, focus::FocusTarget, render::TerminalView};

/// Renders the directory listing with the selected row highlighted.
pub(crate) fn draw_file_list(f: &mut Frame, area: Rect, view: &mut TerminalView) {
    let theme = view.theme;
    let is_active = view.focus == FocusTarget::FileList && view.modal.is_none();

    let title = match view.current_dir.file_name() {
        Some(name) => format!(" Files - {} ", name.to_string_lossy()),
        None => format!(" Files - {} ", view.current_dir.display()),
    };

    let items: Vec<ListItem> = view
        .file_list
        .entries
        .iter()
        .map(|entry| {
            let style = if files::classify(entry).is_navigable() {
                Style::default().fg(theme.text_dim_colour)
            } else {
                Style::default().fg(theme.text_colour)
            };
            ListItem::new(entry.as_str()).style(style)
        })
        .collect();

    let border_style = if is_active {
        Style::default().fg(theme.text_colour).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.primary_colour)
    };

    let list = List::new(items)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style))
        .highlight_style(Style::default().bg(theme.primary_colour).fg(theme.text_colour))
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, &mut view.file_list.state);
}
