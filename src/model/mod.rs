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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application: the aarti
//! tracks of the fixed catalog, the user's ordered selection of them, and
//! the mirrored status of the playback engine.

pub(crate) mod catalog;
pub(crate) mod selection;

pub(crate) type TrackId = i32;

/// One playable aarti in the fixed catalog.
///
/// Tracks are created once at catalog load and never mutated; the list of
/// known tracks does not change for the lifetime of the application.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Track {
    pub(crate) id: TrackId,
    pub(crate) title: &'static str,
    pub(crate) source: &'static str,
    pub(crate) duration_ms: u64,
}

/// Mirror of the live playback engine, as last reported by its events.
///
/// Only the engine event path writes these fields; user intents never touch
/// them directly. Their effects come back as engine events.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PlayerStatus {
    pub(crate) current_track: Option<Track>,
    pub(crate) is_playing: bool,
    pub(crate) position_ms: u64,
    pub(crate) duration_ms: u64,
}

impl PlayerStatus {
    /// The terminal values shown when nothing is selected or a playback pass
    /// has completed.
    pub(crate) fn cleared() -> Self {
        Self::default()
    }
}
