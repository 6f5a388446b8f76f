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

//! # Aarti Player TUI.
//!
//! A terminal-based player for a fixed catalog of devotional audio tracks
//! ("aarties"). The user checks the aarties to include, reorders them, and
//! drives playback of the resulting playlist.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** manages the terminal lifecycle, the application
//!   state, and UI rendering.
//! * An **Engine Worker** owns the live playback queue and transport state,
//!   processing commands asynchronously and reporting back through events.
//! * **Event Loops** capture user input and system ticks to drive the UI
//!   state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between the UI and the engine worker is handled via `std::sync::mpsc`
//! channels; the worker additionally publishes a shared snapshot of its
//! transport state that the main thread reads when reconciling the playlist.

mod config;
mod events;
mod model;
mod player;
mod render;
mod theme;
mod util;

use anyhow::{Context, Result};
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::warn;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};

use crate::{
    config::AppConfig,
    events::{AppEvent, process_events},
    model::{PlayerStatus, catalog, selection::Selection},
    player::{PlaybackHandle, PlaybackSession, ProgressPoller, SyncOutcome, reconcile},
    theme::{Theme, ThemeVariant},
};

/// Application state.
struct App {
    pub config: AppConfig,

    pub theme: Theme,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub player: PlaybackHandle,
    pub poller: ProgressPoller,

    pub selection: Selection,
    pub status: PlayerStatus,

    pub cursor: usize,
    pub notice: Option<String>,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: AppConfig) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        let player_event_tx = event_tx.clone();

        let theme = Theme::for_variant(config.theme);
        let selection = Selection::from_catalog(catalog::load_catalog());

        Ok(Self {
            config,
            theme,
            event_tx,
            event_rx,
            player: PlaybackHandle::new(player_event_tx),
            poller: ProgressPoller::new(),
            selection,
            status: PlayerStatus::default(),
            cursor: 0,
            notice: None,
        })
    }

    /// Reconciles the engine's loaded queue with the active playlist.
    ///
    /// Called after every selection change. If the engine is unreachable the
    /// commands are dropped; the next selection change retries the sync from
    /// scratch.
    pub(crate) fn sync_playlist(&mut self) {
        match reconcile(&self.player, &self.selection.active_playlist()) {
            Ok(SyncOutcome::Cleared) => self.status = PlayerStatus::cleared(),
            Ok(_) => {}
            Err(e) => warn!("playlist sync dropped: {e}"),
        }
    }

    /// Rebuilds the player status from the engine's latest published state.
    ///
    /// Used on startup and whenever an engine event invalidates the cached
    /// status, rather than trusting prior in-memory values.
    pub(crate) fn resync_from_engine(&mut self) {
        self.status.is_playing = self.player.is_playing();
        self.status.current_track = self
            .player
            .current_id()
            .and_then(|id| self.selection.find_track(id));
        self.status.position_ms = self.player.position_ms();
        self.status.duration_ms = self.player.duration_ms();
    }

    /// Refreshes the displayed position from the engine, while playing only.
    pub(crate) fn refresh_position(&mut self) {
        if !self.player.is_playing() {
            return;
        }
        self.status.position_ms = self.player.position_ms();
        self.status.duration_ms = self.player.duration_ms();
    }

    pub(crate) fn select_next_row(&mut self) {
        if self.cursor + 1 < self.selection.len() {
            self.cursor += 1;
        }
    }

    pub(crate) fn select_previous_row(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Switches the colour theme and persists the choice.
    pub(crate) fn apply_theme(&mut self, variant: ThemeVariant) {
        self.config.theme = variant;
        self.theme = Theme::for_variant(variant);
        if let Err(e) = config::save_config(&self.config) {
            warn!("failed to persist theme choice: {e}");
        }
        util::term::set_terminal_bg(&Theme::to_hex(self.theme.background_colour));
    }
}

/// The entry point of the application.
///
/// Sets up the communication channels, initializes the application state,
/// manages the terminal lifecycle, and returns an error if any part of the
/// execution fails.
fn main() -> Result<()> {
    env_logger::init();

    let config = config::load_config();

    let mut app = App::new(config).context("Failed to initalise application")?;

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    util::term::set_terminal_bg(&Theme::to_hex(app.theme.background_colour));

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including disabling
/// raw mode, leaving the alternate screen, and resetting the background color.
/// It also ensures the cursor is made visible again.
///
/// This function is designed to be "best-effort" and does not return a result,
/// as it is typically called during cleanup or panic handling.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg();
    terminal.show_cursor().ok();
}

/// Starts the application's background threads and enters the main event loop.
///
/// This function spawns two long-running background threads:
/// * An input thread to poll for system keyboard events.
/// * A tick thread to trigger periodic UI refreshes.
///
/// The playback position poller is not started here; it is armed and
/// cancelled by the event loop as playback starts and stops.
///
/// After spawning the threads, it hands control to [`process_events`] to
/// manage the UI and state updates.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read() {
                tx_keys.send(AppEvent::Key(key)).ok();
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            let _ = tx_tick.send(AppEvent::Tick);
            thread::sleep(Duration::from_millis(250));
        }
    });

    // Initial sync from the engine's live state rather than assuming the
    // defaults are still valid.
    app.resync_from_engine();
    if app.status.is_playing {
        let tx = app.event_tx.clone();
        app.poller.start(tx);
    }

    if app.config.first_run {
        app.notice = Some("check an aarti with 'x', then press space to play".to_string());
        app.config.first_run = false;
        if let Err(e) = config::save_config(&app.config) {
            warn!("failed to persist first-run flag: {e}");
        }
    }

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}
