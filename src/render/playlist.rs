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

//! Render the aarti checkbox list.
//!
//! Each row shows the checked flag, the aarti title, its duration, and a
//! marker against the track currently loaded in the engine. The cursor row
//! is highlighted for keyboard interaction.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::{App, render::icons::ICON_PLAY, util};

/// Renders the selection list widget.
pub(crate) fn draw_playlist(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::NONE)
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let current_id = app.status.current_track.as_ref().map(|t| t.id);

    let mut lines: Vec<Line> = Vec::with_capacity(app.selection.len() + 1);
    lines.push(Line::from(Span::styled(
        " Aarties",
        Style::default().add_modifier(Modifier::BOLD).fg(app.theme.accent_colour),
    )));

    for (index, entry) in app.selection.entries().iter().enumerate() {
        let checkbox = if entry.is_checked { "[x]" } else { "[ ]" };
        let marker = if current_id == Some(entry.track.id) {
            ICON_PLAY
        } else {
            " "
        };

        let title_fg = if entry.is_checked {
            app.theme.list_title_fg
        } else {
            app.theme.list_unchecked_fg
        };

        let mut line = Line::from(vec![
            Span::raw(format!(" {} ", checkbox)),
            Span::styled(format!("{} ", marker), Style::default().fg(app.theme.accent_colour)),
            Span::styled(entry.track.title, Style::default().fg(title_fg)),
            Span::styled(
                format!("  {}", util::format::format_time(entry.track.duration_ms)),
                Style::default().fg(app.theme.list_time_fg),
            ),
        ]);

        if index == app.cursor {
            line = line.style(Style::default().add_modifier(Modifier::REVERSED));
        }

        lines.push(line);
    }

    f.render_widget(Paragraph::new(lines).bg(app.theme.background_colour), inner_area);
}
