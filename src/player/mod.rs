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

//! Playback control and state management.
//!
//! This module provides the high-level [`PlaybackHandle`] interface used by
//! the UI to control playback. It manages a background engine worker thread
//! that owns the live queue and transport state, ensuring that playback
//! bookkeeping does not block the main application thread.
//!
//! The command-and-observe surface of the engine is abstracted behind the
//! [`PlaybackSession`] trait so the playlist reconciler can be exercised
//! against a recording fake in tests.

mod engine;
mod poller;
mod sync;

pub(crate) use engine::{EngineSnapshot, PlayerEvent};
pub(crate) use poller::ProgressPoller;
pub(crate) use sync::{SyncOutcome, reconcile};

use std::sync::{Arc, Mutex, mpsc};

use thiserror::Error;

use crate::{
    events::AppEvent,
    model::{PlayerStatus, Track, TrackId},
};

/// Represents the current playback status shown in the UI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PlayerState {
    Playing,
    Paused,
    Stopped,
}

impl PlayerState {
    // Maps the mirrored engine status to a simplified [`PlayerState`].
    pub(crate) fn from_status(status: &PlayerStatus) -> Self {
        if status.is_playing {
            PlayerState::Playing
        } else if status.current_track.is_some() {
            PlayerState::Paused
        } else {
            PlayerState::Stopped
        }
    }
}

/// Transport states reported by the playback engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum EngineState {
    #[default]
    Idle,
    Buffering,
    Ready,
    Ended,
}

/// One entry of the engine's loaded queue.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QueueItem {
    pub(crate) id: TrackId,
    pub(crate) title: String,
    pub(crate) source: String,
    pub(crate) duration_ms: u64,
}

impl From<&Track> for QueueItem {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id,
            title: track.title.to_string(),
            source: track.source.to_string(),
            duration_ms: track.duration_ms,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum PlayerError {
    /// The engine worker has shut down and can no longer accept commands.
    #[error("playback engine disconnected")]
    Disconnected,
}

/// Commands accepted by the engine worker.
#[derive(Debug)]
pub(crate) enum PlayerCommand {
    SetQueue(Vec<QueueItem>, bool),
    SeekTo(usize, u64),
    SeekToDefault(usize),
    Play,
    Pause,
    Stop,
    ClearQueue,
    Prepare,
    NextItem,
    PreviousItem,
}

/// The command-and-observe surface of a playback session.
///
/// Commands are fire-and-forget; the engine confirms their effect through
/// its asynchronous event stream. The accessors report the latest state the
/// engine has published, not a synchronous round trip into the engine.
pub(crate) trait PlaybackSession {
    fn set_queue(&self, items: Vec<QueueItem>, reset_position: bool) -> Result<(), PlayerError>;
    fn seek_to(&self, index: usize, position_ms: u64) -> Result<(), PlayerError>;
    fn seek_to_default(&self, index: usize) -> Result<(), PlayerError>;
    fn play(&self) -> Result<(), PlayerError>;
    fn pause(&self) -> Result<(), PlayerError>;
    fn stop(&self) -> Result<(), PlayerError>;
    fn clear_queue(&self) -> Result<(), PlayerError>;
    fn prepare(&self) -> Result<(), PlayerError>;

    fn is_playing(&self) -> bool;
    fn play_when_ready(&self) -> bool;
    fn current_id(&self) -> Option<TrackId>;
    fn current_index(&self) -> Option<usize>;
    fn position_ms(&self) -> u64;
    fn duration_ms(&self) -> u64;
    fn playback_state(&self) -> EngineState;
    fn queue_ids(&self) -> Vec<TrackId>;
}

/// A handle to the playback engine.
///
/// This struct acts as a command proxy; it does not advance playback itself
/// but instead sends instructions to the background engine worker and reads
/// the state snapshot the worker publishes.
pub(crate) struct PlaybackHandle {
    /// Channel for sending commands to the background worker thread.
    command_tx: mpsc::Sender<PlayerCommand>,
    /// The worker's latest published transport state.
    snapshot: Arc<Mutex<EngineSnapshot>>,
}

impl PlaybackHandle {
    /// Spawns the engine worker thread and returns a new player handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send application-level events (playback
    ///   state changes, item transitions and so on) back to the main event
    ///   loop.
    pub(crate) fn new(event_tx: mpsc::Sender<AppEvent>) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<PlayerCommand>();

        let snapshot = engine::spawn_engine_worker(command_rx, event_tx);

        Self {
            command_tx,
            snapshot,
        }
    }

    /// Moves playback to the next queued item, if there is one.
    pub(crate) fn next_item(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::NextItem)
    }

    /// Moves playback to the previous queued item, if there is one.
    pub(crate) fn previous_item(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::PreviousItem)
    }

    fn send(&self, command: PlayerCommand) -> Result<(), PlayerError> {
        self.command_tx
            .send(command)
            .map_err(|_| PlayerError::Disconnected)
    }

    fn snapshot(&self) -> EngineSnapshot {
        self.snapshot.lock().unwrap().clone()
    }
}

impl PlaybackSession for PlaybackHandle {
    fn set_queue(&self, items: Vec<QueueItem>, reset_position: bool) -> Result<(), PlayerError> {
        self.send(PlayerCommand::SetQueue(items, reset_position))
    }

    fn seek_to(&self, index: usize, position_ms: u64) -> Result<(), PlayerError> {
        self.send(PlayerCommand::SeekTo(index, position_ms))
    }

    fn seek_to_default(&self, index: usize) -> Result<(), PlayerError> {
        self.send(PlayerCommand::SeekToDefault(index))
    }

    fn play(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Play)
    }

    fn pause(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Pause)
    }

    fn stop(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Stop)
    }

    fn clear_queue(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::ClearQueue)
    }

    fn prepare(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Prepare)
    }

    fn is_playing(&self) -> bool {
        self.snapshot().is_playing
    }

    fn play_when_ready(&self) -> bool {
        self.snapshot().play_when_ready
    }

    fn current_id(&self) -> Option<TrackId> {
        self.snapshot().current_id
    }

    fn current_index(&self) -> Option<usize> {
        self.snapshot().current_index
    }

    fn position_ms(&self) -> u64 {
        self.snapshot().position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.snapshot().duration_ms
    }

    fn playback_state(&self) -> EngineState {
        self.snapshot().state
    }

    fn queue_ids(&self) -> Vec<TrackId> {
        self.snapshot().queue_ids
    }
}
