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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic for the application,
//! bridging the gap between user input (keyboard), the playback engine
//! worker, and the UI rendering pipeline.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through an
//!    asynchronous channel.
//! 2. **Process**: The [`process_events`] function updates the [`App`]
//!    state, issues commands to the engine, and manages the position poller.
//! 3. **Render**: After each event is processed, the UI is re-drawn using
//!    the `ratatui` terminal.
//!
//! Engine events are the only writer of the engine-derived fields of the
//! player status; key handlers only issue commands whose effects arrive
//! back here as events.

mod handlers;

use std::io::Stdout;

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App,
    player::{EngineState, PlaybackSession, PlayerEvent},
    render::draw,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    Player(PlayerEvent),
    PollPosition,

    Tick,

    ExitApplication,
}

/// Runs the main application loop, handling events and rendering the UI in
/// the terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::Key(key) => handlers::process_key_event(app, key)?,
            AppEvent::Player(event) => process_player_event(app, event),
            AppEvent::PollPosition => app.refresh_position(),
            AppEvent::Tick => {}
            AppEvent::ExitApplication => break,
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

/// Maps one engine event onto the mirrored player status.
///
/// The poller is re-armed or cancelled here so that its lifetime exactly
/// tracks the engine's playing flag.
fn process_player_event(app: &mut App, event: PlayerEvent) {
    match event {
        PlayerEvent::IsPlayingChanged(is_playing) => {
            app.resync_from_engine();
            if is_playing {
                let tx = app.event_tx.clone();
                app.poller.start(tx);
            } else {
                app.poller.stop();
            }
        }

        PlayerEvent::ItemTransition(id) => {
            app.status.current_track = id.and_then(|id| app.selection.find_track(id));
            // Transitions always reset the displayed position.
            app.status.position_ms = 0;
            app.status.duration_ms = app.player.duration_ms();
            if app.player.is_playing() {
                let tx = app.event_tx.clone();
                app.poller.start(tx);
            }
        }

        PlayerEvent::StateChanged(EngineState::Ended) => handle_playlist_ended(app),

        PlayerEvent::StateChanged(_) => {
            app.resync_from_engine();
            if app.status.is_playing {
                let tx = app.event_tx.clone();
                app.poller.start(tx);
            } else {
                app.poller.stop();
            }
        }

        PlayerEvent::PositionDiscontinuity(position_ms) => {
            app.status.position_ms = position_ms;
        }
    }
}

/// The engine played its whole queue through.
///
/// Finishing a pass deliberately clears the user's selections; another
/// play-through requires re-selecting. The now-empty active playlist is
/// reconciled so the engine's queue is cleared too.
fn handle_playlist_ended(app: &mut App) {
    log::debug!("playlist finished, clearing all selections");
    app.poller.stop();
    app.selection = app.selection.reset_all_unchecked();
    app.status = crate::model::PlayerStatus::cleared();
    app.sync_playlist();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, model::PlayerStatus};

    fn test_app() -> App {
        App::new(AppConfig::default()).unwrap()
    }

    #[test]
    fn ended_event_clears_selection_and_status() {
        let mut app = test_app();
        app.selection = app.selection.toggle(1, true).toggle(3, true);
        app.status.is_playing = true;
        app.status.position_ms = 12_345;

        process_player_event(&mut app, PlayerEvent::StateChanged(EngineState::Ended));

        assert!(app.selection.entries().iter().all(|e| !e.is_checked));
        assert_eq!(app.status, PlayerStatus::cleared());
        assert!(!app.poller.is_armed());
    }

    #[test]
    fn item_transition_resets_the_displayed_position() {
        let mut app = test_app();
        app.status.position_ms = 99_000;

        process_player_event(&mut app, PlayerEvent::ItemTransition(Some(2)));

        assert_eq!(app.status.position_ms, 0);
        assert_eq!(app.status.current_track.as_ref().map(|t| t.id), Some(2));
    }

    #[test]
    fn position_discontinuity_updates_only_the_position() {
        let mut app = test_app();
        app.status.current_track = app.selection.find_track(1);
        app.status.duration_ms = 272_000;

        process_player_event(&mut app, PlayerEvent::PositionDiscontinuity(31_000));

        assert_eq!(app.status.position_ms, 31_000);
        assert_eq!(app.status.duration_ms, 272_000);
        assert_eq!(app.status.current_track.as_ref().map(|t| t.id), Some(1));
    }
}
