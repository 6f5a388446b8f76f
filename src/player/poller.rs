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

//! Playback position polling.
//!
//! Engine events alone are too coarse to keep a progress bar moving, so a
//! low-frequency poller requests a position refresh while playback is
//! active. The poller must be cancelled the moment playback stops and
//! re-armed when it resumes; starting a new poll always cancels the prior
//! one first, so at most one poll thread is live at any instant.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
    thread,
    time::Duration,
};

use log::debug;

use crate::events::AppEvent;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Periodic position refresh, alive only while playback is active.
pub(crate) struct ProgressPoller {
    cancel: Option<Arc<AtomicBool>>,
}

impl ProgressPoller {
    pub(crate) fn new() -> Self {
        Self { cancel: None }
    }

    /// Arms the poller, cancelling any poll thread already running.
    pub(crate) fn start(&mut self, event_tx: Sender<AppEvent>) {
        self.stop();
        debug!("position poller armed");

        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                thread::sleep(POLL_INTERVAL);
                if flag.load(Ordering::Relaxed) {
                    break;
                }
                if event_tx.send(AppEvent::PollPosition).is_err() {
                    break;
                }
            }
        });

        self.cancel = Some(cancel);
    }

    /// Cancels the current poll thread, if any.
    pub(crate) fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.store(true, Ordering::Relaxed);
            debug!("position poller cancelled");
        }
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for ProgressPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
