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
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every processed event to provide a reactive user interface.

mod icons;
mod player;
mod playlist;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::Line,
    widgets::Paragraph,
};

use crate::{App, render::player::draw_player, render::playlist::draw_playlist};

/// Renders the user interface to the terminal frame.
///
/// The screen is split into the aarti checkbox list, the player panel, and a
/// single footer line showing either a transient notice or the key help.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Outer layout: list, player, footer
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(area);

    draw_playlist(f, outer[0], app);
    draw_player(f, outer[1], app);
    draw_footer(f, outer[2], app);
}

fn draw_footer(f: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let footer = match &app.notice {
        Some(notice) => Paragraph::new(Line::from(notice.as_str()))
            .style(Style::default().fg(app.theme.notice_fg)),
        None => Paragraph::new(Line::from(
            " x check  J/K move  space play/pause  n/b next/prev  ,/. seek  t theme  q quit",
        ))
        .style(Style::default().fg(app.theme.list_time_fg)),
    };

    f.render_widget(footer, area);
}
