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

//! The user's ordered track selection.
//!
//! This module provides the state behind the checkbox list: every catalog
//! track in user-defined order, each flagged checked or unchecked. The
//! checked subset, in list order, is the active playlist handed to the
//! playlist reconciler.
//!
//! Operations return a new snapshot instead of mutating in place, so the
//! previous and next lists can be compared cheaply for change detection.
//! Invariant: the list always contains exactly one entry per catalog track.

use crate::model::{Track, TrackId};

/// One row of the selection list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SelectionEntry {
    pub(crate) track: Track,
    pub(crate) is_checked: bool,
}

/// The full ordered track list with checked flags.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Selection {
    entries: Vec<SelectionEntry>,
}

impl Selection {
    /// Builds the initial selection from the catalog, everything unchecked.
    pub(crate) fn from_catalog(tracks: Vec<Track>) -> Self {
        let entries = tracks
            .into_iter()
            .map(|track| SelectionEntry {
                track,
                is_checked: false,
            })
            .collect();
        Self { entries }
    }

    pub(crate) fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn find_track(&self, id: TrackId) -> Option<Track> {
        self.entries
            .iter()
            .find(|e| e.track.id == id)
            .map(|e| e.track.clone())
    }

    /// Sets the checked flag on the entry with the given id.
    ///
    /// An unknown id is not a user-facing error; the selection is returned
    /// unchanged.
    pub(crate) fn toggle(&self, id: TrackId, checked: bool) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|e| {
                if e.track.id == id {
                    SelectionEntry {
                        track: e.track.clone(),
                        is_checked: checked,
                    }
                } else {
                    e.clone()
                }
            })
            .collect();
        Self { entries }
    }

    /// Swaps the entries at the two positions.
    ///
    /// The reorder gesture moves one row per step, so a positional swap and
    /// a contiguous shift coincide. Out-of-range indices are ignored.
    pub(crate) fn move_entry(&self, from: usize, to: usize) -> Self {
        let mut entries = self.entries.clone();
        if from < entries.len() && to < entries.len() {
            entries.swap(from, to);
        }
        Self { entries }
    }

    /// Unchecks every entry; used when a playback pass completes.
    pub(crate) fn reset_all_unchecked(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|e| SelectionEntry {
                track: e.track.clone(),
                is_checked: false,
            })
            .collect();
        Self { entries }
    }

    /// The active playlist: checked tracks in selection order.
    pub(crate) fn active_playlist(&self) -> Vec<Track> {
        self.entries
            .iter()
            .filter(|e| e.is_checked)
            .map(|e| e.track.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::load_catalog;

    fn checked_ids(selection: &Selection) -> Vec<TrackId> {
        selection.active_playlist().iter().map(|t| t.id).collect()
    }

    #[test]
    fn toggle_checks_and_unchecks_by_id() {
        let selection = Selection::from_catalog(load_catalog());

        let selection = selection.toggle(2, true);
        assert_eq!(checked_ids(&selection), vec![2]);

        let selection = selection.toggle(2, false);
        assert!(checked_ids(&selection).is_empty());
    }

    #[test]
    fn toggle_unknown_id_is_a_no_op() {
        let selection = Selection::from_catalog(load_catalog()).toggle(1, true);
        let after = selection.toggle(99, true);
        assert_eq!(after, selection);
    }

    #[test]
    fn move_entry_swaps_positions() {
        let selection = Selection::from_catalog(load_catalog());
        let moved = selection.move_entry(0, 2);

        let ids: Vec<TrackId> = moved.entries().iter().map(|e| e.track.id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4, 5, 6]);
    }

    #[test]
    fn move_entry_out_of_range_is_a_no_op() {
        let selection = Selection::from_catalog(load_catalog());
        assert_eq!(selection.move_entry(0, 42), selection);
        assert_eq!(selection.move_entry(42, 0), selection);
    }

    #[test]
    fn active_playlist_preserves_selection_order() {
        let selection = Selection::from_catalog(load_catalog())
            .toggle(1, true)
            .toggle(3, true)
            .toggle(5, true)
            .move_entry(0, 4); // order becomes 5, 2, 3, 4, 1, 6

        assert_eq!(checked_ids(&selection), vec![5, 3, 1]);
    }

    #[test]
    fn reset_all_unchecked_clears_every_flag() {
        let selection = Selection::from_catalog(load_catalog())
            .toggle(1, true)
            .toggle(4, true)
            .reset_all_unchecked();

        assert!(selection.entries().iter().all(|e| !e.is_checked));
    }

    #[test]
    fn operations_never_duplicate_or_drop_entries() {
        let selection = Selection::from_catalog(load_catalog())
            .toggle(3, true)
            .move_entry(1, 5)
            .toggle(3, false)
            .reset_all_unchecked();

        let mut ids: Vec<TrackId> = selection.entries().iter().map(|e| e.track.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }
}
