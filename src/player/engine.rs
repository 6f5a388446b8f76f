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

//! The playback engine worker.
//!
//! This module owns the live transport: the loaded queue, the current item,
//! the playhead position, and the playback state machine
//! (`Idle → Buffering → Ready ⇄ paused/playing → Ended`). Audio decode and
//! output are outside this program; the engine advances the playhead against
//! the catalog's fixed durations.
//!
//! # Architecture
//!
//! The engine operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`PlayerCommand`]s to control playback
//!    (set queue, seek, play, pause, and so on).
//! 2. **Event Channel**: Broadcasts [`PlayerEvent`]s wrapped as application
//!    events to notify the UI of state changes.
//!
//! In addition the worker publishes an [`EngineSnapshot`] after every pass,
//! which the main thread reads when it needs the engine's latest state
//! synchronously (playlist reconciliation, position polling).

use std::{
    sync::{
        Arc, Mutex,
        mpsc::{Receiver, RecvTimeoutError, Sender},
    },
    thread,
    time::{Duration, Instant},
};

use log::debug;

use crate::{
    events::AppEvent,
    model::TrackId,
    player::{EngineState, PlayerCommand, QueueItem},
};

const ENGINE_TICK: Duration = Duration::from_millis(50);

/// Events emitted by the engine, mirrored one-for-one from the transport.
#[derive(Debug, PartialEq)]
pub(crate) enum PlayerEvent {
    IsPlayingChanged(bool),
    ItemTransition(Option<TrackId>),
    StateChanged(EngineState),
    PositionDiscontinuity(u64),
}

/// The engine's published transport state.
#[derive(Debug, Clone, Default)]
pub(crate) struct EngineSnapshot {
    pub(crate) queue_ids: Vec<TrackId>,
    pub(crate) current_index: Option<usize>,
    pub(crate) current_id: Option<TrackId>,
    pub(crate) is_playing: bool,
    pub(crate) play_when_ready: bool,
    pub(crate) position_ms: u64,
    pub(crate) duration_ms: u64,
    pub(crate) state: EngineState,
}

/// Spawns the engine worker thread.
///
/// This function takes ownership of the command receiver and the event
/// sender, moving them into a dedicated background thread, and returns the
/// shared snapshot the worker keeps up to date.
pub(crate) fn spawn_engine_worker(
    command_rx: Receiver<PlayerCommand>,
    event_tx: Sender<AppEvent>,
) -> Arc<Mutex<EngineSnapshot>> {
    let snapshot = Arc::new(Mutex::new(EngineSnapshot::default()));
    let shared = Arc::clone(&snapshot);

    thread::spawn(move || {
        engine_worker(command_rx, event_tx, shared);
    });

    snapshot
}

/// The primary execution loop for the playback engine.
///
/// Each pass blocks briefly for the next command, drains any further pending
/// commands, advances the playhead by the elapsed wall-clock time, publishes
/// a fresh snapshot, and flushes the resulting events. The loop ends when
/// either channel peer disappears.
fn engine_worker(
    command_rx: Receiver<PlayerCommand>,
    event_tx: Sender<AppEvent>,
    shared: Arc<Mutex<EngineSnapshot>>,
) {
    let mut core = EngineCore::new();
    let mut last_tick = Instant::now();

    loop {
        match command_rx.recv_timeout(ENGINE_TICK) {
            Ok(command) => core.apply(command),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        while let Ok(command) = command_rx.try_recv() {
            core.apply(command);
        }

        let now = Instant::now();
        core.advance(now.duration_since(last_tick).as_millis() as u64);
        last_tick = now;

        // Publish the snapshot before flushing events, so an event handler
        // reading the snapshot always sees the state that produced the event.
        *shared.lock().unwrap() = core.snapshot();

        for event in core.drain_events() {
            if event_tx.send(AppEvent::Player(event)).is_err() {
                return;
            }
        }
    }

    debug!("engine worker stopped, command channel closed");
}

/// The transport state machine, single-threaded inside the worker.
struct EngineCore {
    queue: Vec<QueueItem>,
    current_index: Option<usize>,
    position_ms: u64,
    state: EngineState,
    play_when_ready: bool,
    was_playing: bool,
    pending: Vec<PlayerEvent>,
}

impl EngineCore {
    fn new() -> Self {
        Self {
            queue: Vec::new(),
            current_index: None,
            position_ms: 0,
            state: EngineState::Idle,
            play_when_ready: false,
            was_playing: false,
            pending: Vec::new(),
        }
    }

    fn is_playing(&self) -> bool {
        self.play_when_ready && self.state == EngineState::Ready
    }

    fn current_item(&self) -> Option<&QueueItem> {
        self.current_index.and_then(|i| self.queue.get(i))
    }

    fn current_id(&self) -> Option<TrackId> {
        self.current_item().map(|item| item.id)
    }

    fn duration_ms(&self) -> u64 {
        self.current_item().map(|item| item.duration_ms).unwrap_or(0)
    }

    fn apply(&mut self, command: PlayerCommand) {
        debug!("engine command: {:?}", command);
        match command {
            PlayerCommand::SetQueue(items, reset_position) => {
                self.set_queue(items, reset_position)
            }
            PlayerCommand::SeekTo(index, position_ms) => self.seek_to(index, position_ms),
            PlayerCommand::SeekToDefault(index) => self.seek_to(index, 0),
            PlayerCommand::Play => self.play_when_ready = true,
            PlayerCommand::Pause => self.play_when_ready = false,
            PlayerCommand::Stop => self.stop(),
            PlayerCommand::ClearQueue => self.clear_queue(),
            PlayerCommand::Prepare => self.prepare(),
            PlayerCommand::NextItem => self.step(1),
            PlayerCommand::PreviousItem => self.step(-1),
        }
        self.note_playing_change();
    }

    /// Replaces the loaded queue.
    ///
    /// With `reset_position` the playhead moves to the start of the first
    /// item; otherwise the current index is kept, clamped into the new
    /// queue. Callers wanting continuity across a reorder follow up with an
    /// explicit seek.
    fn set_queue(&mut self, items: Vec<QueueItem>, reset_position: bool) {
        let previous_id = self.current_id();
        self.queue = items;

        if self.queue.is_empty() {
            self.current_index = None;
            self.position_ms = 0;
            if self.state != EngineState::Idle {
                self.set_state(EngineState::Ended);
            }
        } else if reset_position || self.current_index.is_none() {
            self.current_index = Some(0);
            self.position_ms = 0;
        } else {
            let index = self.current_index.unwrap_or(0).min(self.queue.len() - 1);
            self.current_index = Some(index);
        }

        if self.current_id() != previous_id {
            self.position_ms = 0;
            self.pending.push(PlayerEvent::ItemTransition(self.current_id()));
        }
    }

    fn seek_to(&mut self, index: usize, position_ms: u64) {
        if self.queue.is_empty() {
            return;
        }
        let index = index.min(self.queue.len() - 1);
        let changed = self.current_index != Some(index);
        self.current_index = Some(index);
        self.position_ms = position_ms.min(self.duration_ms());

        if changed {
            self.pending.push(PlayerEvent::ItemTransition(self.current_id()));
        }
        self.pending
            .push(PlayerEvent::PositionDiscontinuity(self.position_ms));

        // Seeking out of the terminal state resumes a playable session.
        if self.state == EngineState::Ended {
            self.set_state(EngineState::Ready);
        }
    }

    fn step(&mut self, delta: i64) {
        let Some(index) = self.current_index else {
            return;
        };
        let target = index as i64 + delta;
        if target < 0 || target >= self.queue.len() as i64 {
            return;
        }
        self.seek_to(target as usize, 0);
    }

    fn stop(&mut self) {
        self.play_when_ready = false;
        self.set_state(EngineState::Idle);
    }

    fn clear_queue(&mut self) {
        if self.current_id().is_some() {
            self.pending.push(PlayerEvent::ItemTransition(None));
        }
        self.queue.clear();
        self.current_index = None;
        self.position_ms = 0;
        self.set_state(EngineState::Idle);
    }

    fn prepare(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        if matches!(self.state, EngineState::Idle | EngineState::Ended) {
            self.set_state(EngineState::Buffering);
            // Bundled sources load instantly, so readiness is immediate.
            self.set_state(EngineState::Ready);
        }
    }

    /// Advances the playhead by the elapsed milliseconds while playing,
    /// transitioning through queued items and into `Ended` past the last one.
    fn advance(&mut self, elapsed_ms: u64) {
        if !self.is_playing() || elapsed_ms == 0 {
            return;
        }

        let mut remaining = elapsed_ms;
        loop {
            let Some(index) = self.current_index else {
                break;
            };
            let duration = self.duration_ms();
            let left = duration.saturating_sub(self.position_ms);
            if remaining < left {
                self.position_ms += remaining;
                break;
            }
            remaining -= left;

            if index + 1 < self.queue.len() {
                self.current_index = Some(index + 1);
                self.position_ms = 0;
                self.pending.push(PlayerEvent::ItemTransition(self.current_id()));
            } else {
                self.position_ms = duration;
                self.set_state(EngineState::Ended);
                break;
            }
        }

        self.note_playing_change();
    }

    fn set_state(&mut self, state: EngineState) {
        if self.state != state {
            self.state = state;
            self.pending.push(PlayerEvent::StateChanged(state));
        }
    }

    fn note_playing_change(&mut self) {
        let is_playing = self.is_playing();
        if is_playing != self.was_playing {
            self.was_playing = is_playing;
            self.pending.push(PlayerEvent::IsPlayingChanged(is_playing));
        }
    }

    fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            queue_ids: self.queue.iter().map(|item| item.id).collect(),
            current_index: self.current_index,
            current_id: self.current_id(),
            is_playing: self.is_playing(),
            play_when_ready: self.play_when_ready,
            position_ms: self.position_ms,
            duration_ms: self.duration_ms(),
            state: self.state,
        }
    }

    fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn item(id: TrackId, duration_ms: u64) -> QueueItem {
        QueueItem {
            id,
            title: format!("track {id}"),
            source: format!("assets/{id}.ogg"),
            duration_ms,
        }
    }

    fn ready_core(items: Vec<QueueItem>) -> EngineCore {
        let mut core = EngineCore::new();
        core.apply(PlayerCommand::SetQueue(items, true));
        core.apply(PlayerCommand::Prepare);
        core.drain_events();
        core
    }

    #[test]
    fn prepare_moves_idle_engine_to_ready() {
        let mut core = EngineCore::new();
        core.apply(PlayerCommand::SetQueue(vec![item(1, 1000)], true));
        core.apply(PlayerCommand::Prepare);

        assert_eq!(core.state, EngineState::Ready);
        assert_eq!(core.current_id(), Some(1));
        assert!(!core.is_playing());

        let events = core.drain_events();
        assert!(events.contains(&PlayerEvent::StateChanged(EngineState::Buffering)));
        assert!(events.contains(&PlayerEvent::StateChanged(EngineState::Ready)));
    }

    #[test]
    fn play_reports_is_playing_once_ready() {
        let mut core = ready_core(vec![item(1, 1000)]);
        core.apply(PlayerCommand::Play);

        assert!(core.is_playing());
        assert_eq!(
            core.drain_events(),
            vec![PlayerEvent::IsPlayingChanged(true)]
        );
    }

    #[test]
    fn advance_transitions_items_and_ends_after_the_last() {
        let mut core = ready_core(vec![item(1, 100), item(2, 100)]);
        core.apply(PlayerCommand::Play);
        core.drain_events();

        core.advance(150);
        assert_eq!(core.current_id(), Some(2));
        assert_eq!(core.position_ms, 50);
        assert_eq!(
            core.drain_events(),
            vec![PlayerEvent::ItemTransition(Some(2))]
        );

        core.advance(100);
        assert_eq!(core.state, EngineState::Ended);
        assert!(!core.is_playing());
        let events = core.drain_events();
        assert!(events.contains(&PlayerEvent::StateChanged(EngineState::Ended)));
        assert!(events.contains(&PlayerEvent::IsPlayingChanged(false)));
    }

    #[test]
    fn set_queue_without_reset_keeps_the_playhead() {
        let mut core = ready_core(vec![item(1, 1000), item(2, 1000)]);
        core.apply(PlayerCommand::SeekTo(1, 400));
        core.drain_events();

        core.apply(PlayerCommand::SetQueue(
            vec![item(2, 1000), item(1, 1000), item(3, 1000)],
            false,
        ));

        // Index is retained; the item under it changed, so the position is
        // reset and a transition is reported. The reconciler follows up with
        // an explicit seek when it wants continuity by id.
        assert_eq!(core.current_index, Some(1));
        assert_eq!(core.current_id(), Some(1));
        assert_eq!(core.position_ms, 0);
        assert_eq!(
            core.drain_events(),
            vec![PlayerEvent::ItemTransition(Some(1))]
        );
    }

    #[test]
    fn set_queue_with_reset_restarts_from_the_first_item() {
        let mut core = ready_core(vec![item(1, 1000), item(2, 1000)]);
        core.apply(PlayerCommand::SeekTo(1, 400));
        core.drain_events();

        core.apply(PlayerCommand::SetQueue(vec![item(2, 1000)], true));
        assert_eq!(core.current_index, Some(0));
        assert_eq!(core.current_id(), Some(2));
        assert_eq!(core.position_ms, 0);
    }

    #[test]
    fn stop_keeps_the_queue_but_clears_play_intent() {
        let mut core = ready_core(vec![item(1, 1000)]);
        core.apply(PlayerCommand::Play);
        core.drain_events();

        core.apply(PlayerCommand::Stop);

        assert_eq!(core.state, EngineState::Idle);
        assert!(!core.play_when_ready);
        assert_eq!(core.queue.len(), 1);
        let events = core.drain_events();
        assert!(events.contains(&PlayerEvent::StateChanged(EngineState::Idle)));
        assert!(events.contains(&PlayerEvent::IsPlayingChanged(false)));
    }

    #[test]
    fn clear_queue_empties_the_transport() {
        let mut core = ready_core(vec![item(1, 1000)]);
        core.apply(PlayerCommand::ClearQueue);

        assert!(core.queue.is_empty());
        assert_eq!(core.current_index, None);
        assert_eq!(core.position_ms, 0);
        assert_eq!(core.state, EngineState::Idle);
        assert!(
            core.drain_events()
                .contains(&PlayerEvent::ItemTransition(None))
        );
    }

    #[test]
    fn seek_clamps_index_and_position() {
        let mut core = ready_core(vec![item(1, 1000), item(2, 500)]);
        core.apply(PlayerCommand::SeekTo(9, 9_999));

        assert_eq!(core.current_index, Some(1));
        assert_eq!(core.position_ms, 500);
        let events = core.drain_events();
        assert!(events.contains(&PlayerEvent::ItemTransition(Some(2))));
        assert!(events.contains(&PlayerEvent::PositionDiscontinuity(500)));
    }

    #[test]
    fn step_is_bounded_by_the_queue() {
        let mut core = ready_core(vec![item(1, 1000), item(2, 1000)]);
        core.apply(PlayerCommand::PreviousItem);
        assert_eq!(core.current_index, Some(0));

        core.apply(PlayerCommand::NextItem);
        assert_eq!(core.current_index, Some(1));

        core.apply(PlayerCommand::NextItem);
        assert_eq!(core.current_index, Some(1));
    }

    #[test]
    fn worker_plays_a_queue_through_to_ended() {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let snapshot = spawn_engine_worker(command_rx, event_tx);

        command_tx
            .send(PlayerCommand::SetQueue(
                vec![item(1, 120), item(2, 120)],
                true,
            ))
            .unwrap();
        command_tx.send(PlayerCommand::Prepare).unwrap();
        command_tx.send(PlayerCommand::Play).unwrap();

        let mut seen = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(3);
        while Instant::now() < deadline {
            match event_rx.recv_timeout(Duration::from_millis(200)) {
                Ok(AppEvent::Player(event)) => {
                    let ended = event == PlayerEvent::StateChanged(EngineState::Ended);
                    seen.push(event);
                    if ended {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }

        assert!(seen.contains(&PlayerEvent::IsPlayingChanged(true)));
        assert!(seen.contains(&PlayerEvent::ItemTransition(Some(2))));
        assert!(seen.contains(&PlayerEvent::StateChanged(EngineState::Ended)));

        let published = snapshot.lock().unwrap().clone();
        assert_eq!(published.state, EngineState::Ended);
        assert!(!published.is_playing);
    }
}
