//! Dashboard state update logic
//!
//! Contains all methods for updating dashboard state from events and the controller

use super::state::{DashboardState, FetchingState};

use crate::dashboard::Dashboard;
use crate::events::{Event as ActivityEvent, EventType, Source};

use std::time::Instant;

impl DashboardState {
    /// Advance the tick and move queued events into the activity log.
    pub fn update(&mut self) {
        self.tick += 1;

        while let Some(event) = self.pending_events.pop_front() {
            self.add_to_activity_log(event.clone());
            self.process_event(&event);
        }
    }

    /// Process a single event and update relevant state
    fn process_event(&mut self, event: &ActivityEvent) {
        if event.source != Source::Stats {
            return;
        }
        match event.event_type {
            EventType::Refresh => {
                self.set_fetching_state(FetchingState::Active {
                    started_at: Instant::now(),
                });
            }
            EventType::Success => {
                self.set_fetching_state(FetchingState::Idle);
                self.set_last_refresh_timestamp(Some(event.timestamp.clone()));
            }
            EventType::Error => self.set_fetching_state(FetchingState::Failed),
            EventType::Info => {}
        }
    }

    /// Copy the controller's cards and table into the view.
    pub fn sync_from(&mut self, dashboard: &Dashboard) {
        if let Some(cards) = dashboard.cards() {
            self.cards = cards.clone();
        }
        self.table = dashboard.metrics_table();
    }

    /// Seconds since the dashboard opened.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
    use crate::logging::LogLevel;
    use crate::ui::app::UIConfig;

    fn state() -> DashboardState {
        DashboardState::new(
            "http://localhost:5000".to_string(),
            Instant::now(),
            UIConfig::new(false),
        )
    }

    #[test]
    fn test_refresh_events_drive_fetching_state() {
        let mut state = state();
        state.add_event(ActivityEvent::refresh("Refreshing stats"));
        state.update();
        assert!(matches!(
            state.fetching_state(),
            FetchingState::Active { .. }
        ));

        state.add_event(ActivityEvent::success(Source::Stats, "Stats loaded"));
        state.update();
        assert_eq!(state.fetching_state(), &FetchingState::Idle);
        assert!(state.last_refresh_timestamp().is_some());

        state.add_event(ActivityEvent::error(Source::Stats, "down", LogLevel::Warn));
        state.update();
        assert_eq!(state.fetching_state(), &FetchingState::Failed);
        assert_eq!(state.activity_logs.len(), 3);
    }

    #[test]
    fn test_export_events_do_not_touch_fetching_state() {
        let mut state = state();
        state.add_event(ActivityEvent::success(Source::Export, "saved"));
        state.update();
        assert_eq!(state.fetching_state(), &FetchingState::Idle);
        assert!(state.last_refresh_timestamp().is_none());
    }

    #[test]
    fn test_activity_log_is_bounded() {
        let mut state = state();
        for i in 0..MAX_ACTIVITY_LOGS + 5 {
            state.add_event(ActivityEvent::info(Source::Snapshot, format!("line {}", i)));
        }
        state.update();
        assert_eq!(state.activity_logs.len(), MAX_ACTIVITY_LOGS);
        assert_eq!(state.activity_logs.front().unwrap().msg, "line 5");
    }
}
