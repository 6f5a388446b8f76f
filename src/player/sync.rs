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

//! Playlist reconciliation.
//!
//! This module compares the active playlist (the checked tracks, in list
//! order) against the queue the engine actually has loaded, and issues the
//! minimal set of commands to bring the engine in line without interrupting
//! an in-progress session.
//!
//! The engine's asynchronous event stream remains the sole confirmation of
//! the outcome; nothing here blocks waiting for it. A reconciliation pass
//! always diffs against the latest state the engine has published, so when
//! changes arrive faster than the engine responds, the most recent pass
//! wins and intermediate queue states may be skipped.

use log::debug;

use crate::{
    model::{Track, TrackId},
    player::{EngineState, PlaybackSession, PlayerError, QueueItem},
};

/// What a reconciliation pass did to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SyncOutcome {
    /// Desired and loaded queues already match; no commands were issued.
    Unchanged,
    /// The desired playlist is empty; playback was stopped and the queue
    /// cleared.
    Cleared,
    /// The queue was replaced, preserving playback continuity where
    /// possible.
    Updated,
}

/// Brings the engine's loaded queue in line with the desired playlist.
///
/// Continuity rules, in order of preference:
/// 1. If the currently-loaded track survives in the new playlist, seek to
///    its new index at its previous position, so a reorder does not restart
///    the playing track.
/// 2. Otherwise, if the previous index is still valid in the new playlist,
///    seek to the start of that index.
/// 3. Otherwise seek to the start of the playlist.
///
/// If the engine was playing with the intent to keep playing but the queue
/// reload left it paused, playback is resumed explicitly.
pub(crate) fn reconcile<S: PlaybackSession>(
    session: &S,
    desired: &[Track],
) -> Result<SyncOutcome, PlayerError> {
    let desired_ids: Vec<TrackId> = desired.iter().map(|t| t.id).collect();
    let current_ids = session.queue_ids();

    // An identical queue must not be reloaded; the reload is audible.
    if desired_ids == current_ids {
        return Ok(SyncOutcome::Unchanged);
    }

    if desired.is_empty() {
        debug!("active playlist is empty, stopping and clearing the engine");
        if session.is_playing() || session.playback_state() != EngineState::Idle {
            session.stop()?;
            session.clear_queue()?;
        }
        return Ok(SyncOutcome::Cleared);
    }

    // Capture the pre-change transport state before any command lands.
    let was_playing = session.is_playing();
    let play_when_ready = session.play_when_ready();
    let previous_state = session.playback_state();
    let previous_id = session.current_id();
    let previous_index = session.current_index();
    let previous_position = session.position_ms();

    let player_was_effectively_empty = current_ids.is_empty()
        && matches!(previous_state, EngineState::Idle | EngineState::Ended);

    debug!(
        "syncing playlist: {} items, reset_position: {}",
        desired_ids.len(),
        player_was_effectively_empty
    );

    let items: Vec<QueueItem> = desired.iter().map(QueueItem::from).collect();
    session.set_queue(items, player_was_effectively_empty)?;

    let surviving_index =
        previous_id.and_then(|id| desired_ids.iter().position(|&desired_id| desired_id == id));
    if let Some(new_index) = surviving_index {
        session.seek_to(new_index, previous_position)?;
    } else if let Some(index) = previous_index.filter(|&i| i < desired_ids.len()) {
        session.seek_to_default(index)?;
    } else {
        session.seek_to_default(0)?;
    }

    if matches!(
        session.playback_state(),
        EngineState::Idle | EngineState::Ended
    ) {
        session.prepare()?;
    }

    // The queue reload can transiently pause playback; restore it when the
    // pre-change intent was to play.
    if was_playing && play_when_ready && !session.is_playing() {
        debug!("resuming playback after playlist sync");
        session.play()?;
    }

    Ok(SyncOutcome::Updated)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::model::Track;

    #[derive(Debug, Clone, PartialEq)]
    enum Issued {
        SetQueue(Vec<TrackId>, bool),
        SeekTo(usize, u64),
        SeekToDefault(usize),
        Play,
        Pause,
        Stop,
        ClearQueue,
        Prepare,
    }

    /// A recording stand-in for the engine.
    ///
    /// Commands update its state synchronously the way the engine's
    /// published snapshot eventually would, and every command is recorded so
    /// tests can assert the exact sequence. Replacing the queue drops
    /// `is_playing` until `play` is issued again, modelling the transient
    /// pause of a queue reload.
    #[derive(Default)]
    struct FakeSession {
        issued: RefCell<Vec<Issued>>,
        queue: RefCell<Vec<TrackId>>,
        index: Cell<Option<usize>>,
        position: Cell<u64>,
        playing: Cell<bool>,
        intent: Cell<bool>,
        state: Cell<EngineState>,
    }

    impl FakeSession {
        fn playing_at(ids: &[TrackId], index: usize, position: u64) -> Self {
            let fake = FakeSession::default();
            *fake.queue.borrow_mut() = ids.to_vec();
            fake.index.set(Some(index));
            fake.position.set(position);
            fake.playing.set(true);
            fake.intent.set(true);
            fake.state.set(EngineState::Ready);
            fake
        }

        fn issued(&self) -> Vec<Issued> {
            self.issued.borrow().clone()
        }
    }

    impl PlaybackSession for FakeSession {
        fn set_queue(&self, items: Vec<QueueItem>, reset_position: bool) -> Result<(), PlayerError> {
            let ids: Vec<TrackId> = items.iter().map(|i| i.id).collect();
            self.issued
                .borrow_mut()
                .push(Issued::SetQueue(ids.clone(), reset_position));
            *self.queue.borrow_mut() = ids;
            if reset_position {
                self.index.set(Some(0));
                self.position.set(0);
            }
            self.playing.set(false);
            Ok(())
        }

        fn seek_to(&self, index: usize, position_ms: u64) -> Result<(), PlayerError> {
            self.issued.borrow_mut().push(Issued::SeekTo(index, position_ms));
            self.index.set(Some(index));
            self.position.set(position_ms);
            Ok(())
        }

        fn seek_to_default(&self, index: usize) -> Result<(), PlayerError> {
            self.issued.borrow_mut().push(Issued::SeekToDefault(index));
            self.index.set(Some(index));
            self.position.set(0);
            Ok(())
        }

        fn play(&self) -> Result<(), PlayerError> {
            self.issued.borrow_mut().push(Issued::Play);
            self.intent.set(true);
            self.playing.set(true);
            Ok(())
        }

        fn pause(&self) -> Result<(), PlayerError> {
            self.issued.borrow_mut().push(Issued::Pause);
            self.intent.set(false);
            self.playing.set(false);
            Ok(())
        }

        fn stop(&self) -> Result<(), PlayerError> {
            self.issued.borrow_mut().push(Issued::Stop);
            self.intent.set(false);
            self.playing.set(false);
            self.state.set(EngineState::Idle);
            Ok(())
        }

        fn clear_queue(&self) -> Result<(), PlayerError> {
            self.issued.borrow_mut().push(Issued::ClearQueue);
            self.queue.borrow_mut().clear();
            self.index.set(None);
            self.position.set(0);
            Ok(())
        }

        fn prepare(&self) -> Result<(), PlayerError> {
            self.issued.borrow_mut().push(Issued::Prepare);
            if !self.queue.borrow().is_empty() {
                self.state.set(EngineState::Ready);
            }
            Ok(())
        }

        fn is_playing(&self) -> bool {
            self.playing.get()
        }

        fn play_when_ready(&self) -> bool {
            self.intent.get()
        }

        fn current_id(&self) -> Option<TrackId> {
            let queue = self.queue.borrow();
            self.index.get().and_then(|i| queue.get(i).copied())
        }

        fn current_index(&self) -> Option<usize> {
            self.index.get()
        }

        fn position_ms(&self) -> u64 {
            self.position.get()
        }

        fn duration_ms(&self) -> u64 {
            60_000
        }

        fn playback_state(&self) -> EngineState {
            self.state.get()
        }

        fn queue_ids(&self) -> Vec<TrackId> {
            self.queue.borrow().clone()
        }
    }

    fn track(id: TrackId) -> Track {
        Track {
            id,
            title: "aarti",
            source: "assets/aarti.ogg",
            duration_ms: 60_000,
        }
    }

    fn tracks(ids: &[TrackId]) -> Vec<Track> {
        ids.iter().map(|&id| track(id)).collect()
    }

    #[test]
    fn identical_queue_issues_no_commands() {
        let fake = FakeSession::playing_at(&[1, 2, 3], 1, 12_000);

        let outcome = reconcile(&fake, &tracks(&[1, 2, 3])).unwrap();

        assert_eq!(outcome, SyncOutcome::Unchanged);
        assert!(fake.issued().is_empty());
    }

    #[test]
    fn reconcile_is_idempotent() {
        let fake = FakeSession::default();

        assert_eq!(
            reconcile(&fake, &tracks(&[1, 2])).unwrap(),
            SyncOutcome::Updated
        );
        let after_first = fake.issued().len();

        assert_eq!(
            reconcile(&fake, &tracks(&[1, 2])).unwrap(),
            SyncOutcome::Unchanged
        );
        assert_eq!(fake.issued().len(), after_first);
    }

    #[test]
    fn empty_playlist_stops_then_clears_while_playing() {
        let fake = FakeSession::playing_at(&[1, 2, 3], 0, 5_000);

        let outcome = reconcile(&fake, &[]).unwrap();

        assert_eq!(outcome, SyncOutcome::Cleared);
        assert_eq!(fake.issued(), vec![Issued::Stop, Issued::ClearQueue]);
    }

    #[test]
    fn empty_playlist_on_empty_engine_is_unchanged() {
        let fake = FakeSession::default();
        assert_eq!(reconcile(&fake, &[]).unwrap(), SyncOutcome::Unchanged);
        assert!(fake.issued().is_empty());
    }

    #[test]
    fn first_load_resets_position_and_prepares() {
        let fake = FakeSession::default();

        let outcome = reconcile(&fake, &tracks(&[1, 2])).unwrap();

        assert_eq!(outcome, SyncOutcome::Updated);
        assert_eq!(
            fake.issued(),
            vec![
                Issued::SetQueue(vec![1, 2], true),
                Issued::SeekToDefault(0),
                Issued::Prepare,
            ]
        );
    }

    #[test]
    fn reorder_keeps_the_playing_track_at_its_position() {
        // [1, 2, 3] playing track 3 at 42s, reordered to [3, 1, 2].
        let fake = FakeSession::playing_at(&[1, 2, 3], 2, 42_000);

        let outcome = reconcile(&fake, &tracks(&[3, 1, 2])).unwrap();

        assert_eq!(outcome, SyncOutcome::Updated);
        assert_eq!(
            fake.issued(),
            vec![
                Issued::SetQueue(vec![3, 1, 2], false),
                Issued::SeekTo(0, 42_000),
                Issued::Play,
            ]
        );
    }

    #[test]
    fn removed_current_track_falls_back_to_the_same_index() {
        let fake = FakeSession::playing_at(&[1, 2], 1, 30_000);

        reconcile(&fake, &tracks(&[1, 3])).unwrap();

        assert_eq!(
            fake.issued(),
            vec![
                Issued::SetQueue(vec![1, 3], false),
                Issued::SeekToDefault(1),
                Issued::Play,
            ]
        );
    }

    #[test]
    fn invalid_previous_index_falls_back_to_the_start() {
        let fake = FakeSession::playing_at(&[1, 2, 3], 2, 30_000);

        reconcile(&fake, &tracks(&[4])).unwrap();

        assert_eq!(
            fake.issued(),
            vec![
                Issued::SetQueue(vec![4], false),
                Issued::SeekToDefault(0),
                Issued::Play,
            ]
        );
    }

    #[test]
    fn paused_session_is_not_resumed_by_a_sync() {
        let fake = FakeSession::playing_at(&[1, 2], 0, 10_000);
        fake.playing.set(false);
        fake.intent.set(false);

        reconcile(&fake, &tracks(&[2, 1])).unwrap();

        assert!(!fake.issued().contains(&Issued::Play));
    }

    #[test]
    fn ready_engine_is_not_prepared_again() {
        let fake = FakeSession::playing_at(&[1], 0, 0);

        reconcile(&fake, &tracks(&[1, 2])).unwrap();

        assert!(!fake.issued().contains(&Issued::Prepare));
    }
}
