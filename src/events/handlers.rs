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

//! Keyboard input handling.
//!
//! Maps keyboard input to selection changes and playback commands. Selection
//! changes are applied as new snapshots and immediately reconciled against
//! the engine; transport keys only issue engine commands, whose effects come
//! back through the engine's event stream.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;

use crate::{
    App,
    events::AppEvent,
    player::{PlaybackSession, PlayerError},
};

const SEEK_DELTA_MS: i64 = 5_000;

/// Maps keyboard input to application actions and playback commands.
///
/// This function acts as the primary input router for the TUI, translating
/// low-level [`KeyEvent`]s into high-level domain logic. It handles:
///
/// * **Application Control**: Life-cycle events like exiting the program.
/// * **Navigation**: Moving the cursor through the aarti list.
/// * **Selection**: Checking, unchecking, and reordering aarties.
/// * **Playback**: Controlling the engine (play, pause, next, previous,
///   seek).
///
/// # Errors
///
/// Returns an error if an event fails to send to the main event loop.
pub(crate) fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    app.notice = None;

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => {
            app.event_tx.send(AppEvent::ExitApplication)?;
        }

        // Reorder: Shift+Down / J, Shift+Up / K
        (KeyCode::Down, modifiers) if modifiers == KeyModifiers::SHIFT => move_selected(app, 1),
        (KeyCode::Up, modifiers) if modifiers == KeyModifiers::SHIFT => move_selected(app, -1),
        (KeyCode::Char('J'), _) => move_selected(app, 1),
        (KeyCode::Char('K'), _) => move_selected(app, -1),

        // Navigation: Down / j, Up / k
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => app.select_next_row(),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => app.select_previous_row(),

        // Selection
        (KeyCode::Char('x'), _) | (KeyCode::Enter, _) => toggle_selected(app),

        // Playback controls
        (KeyCode::Char(' '), _) => toggle_playback(app),
        (KeyCode::Char('n'), _) => log_dropped(app.player.next_item()),
        (KeyCode::Char('b'), _) => log_dropped(app.player.previous_item()),
        (KeyCode::Char(','), _) => seek_relative(app, -SEEK_DELTA_MS),
        (KeyCode::Char('.'), _) => seek_relative(app, SEEK_DELTA_MS),

        (KeyCode::Char('t'), _) => app.apply_theme(app.config.theme.toggled()),

        _ => {}
    }

    Ok(())
}

/// Flips the checked flag on the row under the cursor and reconciles the
/// resulting active playlist with the engine.
fn toggle_selected(app: &mut App) {
    let (id, checked) = match app.selection.entries().get(app.cursor) {
        Some(entry) => (entry.track.id, !entry.is_checked),
        None => return,
    };

    app.selection = app.selection.toggle(id, checked);
    app.sync_playlist();
}

/// Moves the row under the cursor one step up or down.
///
/// Reordering is locked while playback is active, matching the checkbox
/// list's drag gating.
fn move_selected(app: &mut App, delta: i64) {
    if app.status.is_playing {
        app.notice = Some("pause playback to reorder".to_string());
        return;
    }

    let from = app.cursor;
    let to = from as i64 + delta;
    if to < 0 || to >= app.selection.len() as i64 {
        return;
    }
    let to = to as usize;

    app.selection = app.selection.move_entry(from, to);
    app.cursor = to;
    app.sync_playlist();
}

/// Pause when playing; otherwise play if the engine holds a queue.
fn toggle_playback(app: &mut App) {
    if app.player.is_playing() {
        log_dropped(app.player.pause());
    } else if !app.player.queue_ids().is_empty() {
        log_dropped(app.player.play());
    } else {
        app.notice = Some("select an aarti to play".to_string());
    }
}

/// Seeks relative to the current position, clamped to the current item.
fn seek_relative(app: &mut App, delta_ms: i64) {
    let Some(index) = app.player.current_index() else {
        return;
    };
    let position = (app.player.position_ms() as i64 + delta_ms)
        .clamp(0, app.player.duration_ms() as i64) as u64;

    log_dropped(app.player.seek_to(index, position));
}

// A dropped command is not retried; the next reconciliation pass or user
// intent re-attempts synchronization from scratch.
fn log_dropped(result: Result<(), PlayerError>) {
    if let Err(e) = result {
        warn!("engine command dropped: {e}");
    }
}
