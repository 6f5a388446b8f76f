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

//! Render the music player interface.
//!
//! This module renders the visual representation of the current track,
//! playback state, elapsed and total time, and the position gauge.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    player::PlayerState,
    render::icons::{ICON_PAUSE, ICON_PLAY, ICON_STOP},
    util,
};

/// Renders the main player widget including track info and progress.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(chunks[0]);

    let state = PlayerState::from_status(&app.status);
    let icon = match state {
        PlayerState::Playing => ICON_PLAY,
        PlayerState::Paused => ICON_PAUSE,
        PlayerState::Stopped => ICON_STOP,
    };

    let title = app
        .status
        .current_track
        .as_ref()
        .map(|t| t.title)
        .unwrap_or("no aarti selected");

    let track_line = Line::from(vec![
        Span::styled(
            format!(" {} ", icon),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(Color::White),
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD))
            .fg(app.theme.accent_colour),
    ]);
    f.render_widget(Paragraph::new(track_line), info_chunks[0]);

    let duration = app.status.duration_ms;
    let time = app.status.position_ms;
    let remaining = duration.saturating_sub(time);

    let time_line = Line::from(vec![
        Span::styled(
            util::format::format_time(time),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(app.theme.accent_colour),
        Span::styled(" / ", Style::default().add_modifier(Modifier::BOLD)).fg(Color::White),
        Span::styled(
            util::format::format_time(duration),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(app.theme.accent_colour),
        Span::styled(" (-", Style::default().add_modifier(Modifier::BOLD)).fg(Color::White),
        Span::styled(
            util::format::format_time(remaining),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(app.theme.accent_colour),
        Span::styled(")", Style::default().add_modifier(Modifier::BOLD)).fg(Color::White),
    ]);

    let time_p = Paragraph::new(time_line).alignment(Alignment::Right);
    f.render_widget(time_p, info_chunks[1]);

    let playlist_len = app.selection.active_playlist().len();
    let state_label = match state {
        PlayerState::Playing => "playing",
        PlayerState::Paused => "paused",
        PlayerState::Stopped => "stopped",
    };
    let state_line = Line::from(vec![
        Span::styled(format!(" {}", state_label), Style::default().fg(Color::White)),
        Span::styled(
            format!("  {} in playlist", playlist_len),
            Style::default().fg(app.theme.list_time_fg),
        ),
    ]);
    f.render_widget(Paragraph::new(state_line), chunks[2]);

    let position = if duration > 0 {
        (time as f64 / duration as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let position_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(position)
        .label("")
        .use_unicode(true);

    f.render_widget(position_gauge, chunks[4]);
}
