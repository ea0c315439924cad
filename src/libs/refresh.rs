//! Periodic re-fetch of the dashboard page.
//!
//! The refresher reloads the current page on a fixed interval so that
//! batches entered on other lines show up without operator action. It never
//! refreshes while an input control holds focus, so a prompt the operator is
//! typing into is not redrawn underneath them. A failed refresh is reported
//! and the next tick simply tries again.

use crate::api::{BatchStore, ReferenceData};
use crate::libs::dashboard::Dashboard;
use crate::libs::focus::FocusManager;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_warning};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tokio::time::{self, Instant, MissedTickBehavior};

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Refreshed,
    SkippedFocused,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AutoRefresh {
    interval: Duration,
    focus: FocusManager,
}

impl AutoRefresh {
    pub fn new(interval: Duration, focus: FocusManager) -> Self {
        Self { interval, focus }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs one refresh unless an input is focused.
    pub async fn tick<S: BatchStore + ReferenceData>(&self, dashboard: &Mutex<Dashboard<S>>) -> RefreshOutcome {
        if self.focus.is_input_focused() {
            msg_debug!(Message::RefreshSkipped(self.focus.focused_controls().join(", ")));
            return RefreshOutcome::SkippedFocused;
        }

        let mut dashboard = dashboard.lock().await;
        match dashboard.refresh().await {
            Ok(()) => RefreshOutcome::Refreshed,
            Err(e) => {
                msg_warning!(Message::RefreshFailed(e.to_string()));
                RefreshOutcome::Failed(e.to_string())
            }
        }
    }

    /// Ticks until `shutdown` fires or its sender is dropped.
    ///
    /// `on_refresh` is called with the dashboard still locked after every
    /// successful refresh, typically to redraw the grid.
    pub async fn run<S, F>(self, dashboard: Arc<Mutex<Dashboard<S>>>, mut shutdown: oneshot::Receiver<()>, mut on_refresh: F)
    where
        S: BatchStore + ReferenceData,
        F: FnMut(&Dashboard<S>),
    {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.tick(&dashboard).await == RefreshOutcome::Refreshed {
                        on_refresh(&*dashboard.lock().await);
                    }
                }
                _ = &mut shutdown => {
                    tracing::debug!("auto refresh stopped");
                    break;
                }
            }
        }
    }
}
