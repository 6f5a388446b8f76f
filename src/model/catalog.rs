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

//! The fixed aarti catalog.
//!
//! The application ships with a known set of tracks bundled as assets.
//! Tracks are never added or removed at runtime; the user only checks,
//! unchecks, and reorders them. Durations are fixed metadata carried with
//! the catalog entries.

use crate::model::Track;

pub(crate) fn load_catalog() -> Vec<Track> {
    vec![
        Track {
            id: 1,
            title: "Sukhakarta Dukhaharta",
            source: "assets/sukhakarta_dukhaharta.ogg",
            duration_ms: 272_000,
        },
        Track {
            id: 2,
            title: "Durge Durghat Bhari",
            source: "assets/durge_durghat_bhari.ogg",
            duration_ms: 185_000,
        },
        Track {
            id: 3,
            title: "Lavthavati Vikrala",
            source: "assets/lavthavati_vikrala.ogg",
            duration_ms: 228_000,
        },
        Track {
            id: 4,
            title: "Yuge Atthavis Vitthala",
            source: "assets/yuge_atthavis_vitthala.ogg",
            duration_ms: 204_000,
        },
        Track {
            id: 5,
            title: "Datta Aarti",
            source: "assets/datta_aarti.ogg",
            duration_ms: 251_000,
        },
        Track {
            id: 6,
            title: "Ghalin Lotangan Vandin Charan",
            source: "assets/ghalin_lotangan_vandin_charan.ogg",
            duration_ms: 321_000,
        },
    ]
}
