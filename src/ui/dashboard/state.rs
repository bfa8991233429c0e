//! Dashboard state management
//!
//! Contains the state the dashboard screen is drawn from

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::dashboard::StatCards;
use crate::events::Event as ActivityEvent;
use crate::export::MetricsTable;
use crate::ui::app::UIConfig;

use std::collections::VecDeque;
use std::time::Instant;

/// Progress of the stats request shown in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchingState {
    Idle,
    Active { started_at: Instant },
    Failed,
}

#[derive(Debug)]
pub struct DashboardState {
    /// Prediction service the stats come from.
    pub base_url: String,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    /// Stat cards as last patched by the controller.
    pub cards: StatCards,
    /// Metrics table, once stats are loaded.
    pub table: Option<MetricsTable>,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<ActivityEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<ActivityEvent>,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,

    /// Local time of the last successful refresh
    last_refresh_timestamp: Option<String>,
    fetching_state: FetchingState,
}

impl DashboardState {
    /// Creates a new instance of the dashboard state.
    pub fn new(base_url: String, start_time: Instant, ui_config: UIConfig) -> Self {
        Self {
            base_url,
            start_time,
            cards: StatCards::default(),
            table: None,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            with_background_color: ui_config.with_background_color,
            tick: 0,
            last_refresh_timestamp: None,
            fetching_state: FetchingState::Idle,
        }
    }

    pub fn fetching_state(&self) -> &FetchingState {
        &self.fetching_state
    }

    pub fn last_refresh_timestamp(&self) -> &Option<String> {
        &self.last_refresh_timestamp
    }

    pub fn set_fetching_state(&mut self, state: FetchingState) {
        self.fetching_state = state;
    }

    pub fn set_last_refresh_timestamp(&mut self, timestamp: Option<String>) {
        self.last_refresh_timestamp = timestamp;
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: ActivityEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: ActivityEvent) {
        self.pending_events.push_back(event);
    }
}
