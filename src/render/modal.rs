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

//! Render error and message dialogs over the main view.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    render::{Modal, ModalKind},
    theme::Theme,
};

const MODAL_WIDTH: u16 = 60;

pub(crate) fn draw_modal(f: &mut Frame, area: Rect, modal: &Modal, theme: &Theme) {
    let colour = match modal.kind {
        ModalKind::Error => theme.error_colour,
        ModalKind::Message => theme.message_colour,
    };

    let mut text = Text::from(modal.text.as_str());
    text.push_line(Line::default());
    text.push_line(Line::styled("[ OK ]", Style::default().add_modifier(Modifier::REVERSED)));

    // Borders plus a rough allowance for wrapped lines
    let width = MODAL_WIDTH.min(area.width);
    let inner_width = width.saturating_sub(4).max(1) as usize;
    let wrapped: usize = text
        .lines
        .iter()
        .map(|line| line.width().div_ceil(inner_width).max(1))
        .sum();
    let height = (wrapped as u16 + 2).min(area.height);

    let popup = centered(area, width, height);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(colour).bg(theme.secondary_colour))
            .block(Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colour))),
        popup,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
