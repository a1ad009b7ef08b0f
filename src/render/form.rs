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

//! Render the metadata form: one bordered input per field, then the buttons.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    focus::FocusTarget,
    form::{BUTTON_LABELS, FIELD_LABELS},
    render::TerminalView,
};

const FIELD_HEIGHT: u16 = 3;
const BUTTON_WIDTH: u16 = 10;

pub(crate) fn draw_form(f: &mut Frame, area: Rect, view: &TerminalView, title: &str) {
    let theme = view.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().fg(theme.text_colour))
        .border_style(Style::default().fg(theme.primary_colour));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(FIELD_HEIGHT); FIELD_LABELS.len()];
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(inner);

    for (index, (label, input)) in FIELD_LABELS.iter().zip(&view.form.fields).enumerate() {
        let focused = view.focus == FocusTarget::Field(index) && view.modal.is_none();
        let row = rows[index];

        let border_style = if focused {
            Style::default().fg(theme.text_colour).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_dim_colour)
        };

        let width = row.width.saturating_sub(2) as usize;
        let scroll = input.visual_scroll(width);

        f.render_widget(
            Paragraph::new(input.value())
                .scroll((0, scroll as u16))
                .style(Style::default().fg(theme.text_colour).bg(theme.secondary_colour))
                .block(Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {label} "))
                    .border_style(border_style)),
            row,
        );

        if focused {
            let cursor_x = row.x + 1 + (input.visual_cursor().saturating_sub(scroll)) as u16;
            f.set_cursor_position((cursor_x, row.y + 1));
        }
    }

    draw_buttons(f, rows[FIELD_LABELS.len() + 1], view);
}

fn draw_buttons(f: &mut Frame, area: Rect, view: &TerminalView) {
    let theme = view.theme;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(BUTTON_WIDTH); BUTTON_LABELS.len()])
        .spacing(2)
        .flex(Flex::Center)
        .split(area);

    for (index, label) in BUTTON_LABELS.iter().enumerate() {
        let focused = view.focus == FocusTarget::Button(index) && view.modal.is_none();
        let style = if focused {
            Style::default()
                .fg(theme.secondary_colour)
                .bg(theme.text_colour)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_colour).bg(theme.secondary_colour)
        };

        f.render_widget(
            Paragraph::new(*label)
                .style(style)
                .alignment(ratatui::layout::Alignment::Center),
            columns[index],
        );
    }
}
