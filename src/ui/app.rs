//! Main application state and UI loop
//!
//! Contains the App struct and key handling for the dashboard screen

use crate::consts::cli_consts::UI_TICK_MS;
use crate::dashboard::Dashboard;
use crate::events::{Event as ActivityEvent, Source};
use crate::export::{ExportError, ExportFormat};
use crate::logging::LogLevel;
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crossterm::event::{self, Event, KeyCode};
use ratatui::{Terminal, backend::Backend};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
}

impl UIConfig {
    pub fn new(with_background_color: bool) -> Self {
        Self {
            with_background_color,
        }
    }
}

/// What a key press asks the dashboard to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Refresh,
    Export(ExportFormat),
    Print,
    Quit,
}

impl Action {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Refresh),
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Export(ExportFormat::Csv)),
            KeyCode::Char('j') | KeyCode::Char('J') => Some(Action::Export(ExportFormat::Json)),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::Print),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
            _ => None,
        }
    }
}

/// Application state
pub struct App {
    /// Controller owning the stats and the export logic.
    dashboard: Dashboard,

    /// Everything the screen is drawn from.
    state: DashboardState,

    /// Directory exports are written to.
    out_dir: PathBuf,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(dashboard: Dashboard, out_dir: PathBuf, ui_config: UIConfig) -> Self {
        let state = DashboardState::new(dashboard.base_url(), Instant::now(), ui_config);
        Self {
            dashboard,
            state,
            out_dir,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Fetches stats and records the outcome in the activity log.
    pub async fn refresh(&mut self) {
        match self.dashboard.refresh().await {
            Ok(patches) => {
                self.state.sync_from(&self.dashboard);
                self.state.add_event(ActivityEvent::success(
                    Source::Stats,
                    format!("Stats refreshed ({} updates)", patches.len()),
                ));
            }
            Err(e) => {
                self.state.add_event(ActivityEvent::error(
                    Source::Stats,
                    format!("Could not load stats: {}", e.user_message()),
                    e.log_level(),
                ));
            }
        }
        self.state.update();
    }

    pub fn export(&mut self, format: ExportFormat) {
        let result = self
            .dashboard
            .export(format)
            .and_then(|file| file.write_to(&self.out_dir));
        let event = match result {
            Ok(path) => ActivityEvent::success(
                Source::Export,
                format!("Exported {}", path.display()),
            ),
            Err(e @ ExportError::NothingToExport) => {
                ActivityEvent::error(Source::Export, e.to_string(), LogLevel::Warn)
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                ActivityEvent::error(Source::Export, e.to_string(), LogLevel::Error)
            }
        };
        self.state.add_event(event);
    }

    /// Writes the plain-text snapshot into the activity log, one line per event.
    pub fn print(&mut self) {
        for line in self.dashboard.snapshot_text().lines() {
            if !line.trim().is_empty() {
                self.state
                    .add_event(ActivityEvent::info(Source::Snapshot, line.to_string()));
            }
        }
    }

    /// Marks a refresh as started so the next frame shows it.
    pub fn begin_refresh(&mut self, msg: &str) {
        self.state.add_event(ActivityEvent::refresh(msg));
        self.state.update();
    }

    /// Returns `false` once the user asked to quit.
    pub async fn handle(&mut self, action: Action) -> bool {
        match action {
            Action::Refresh => self.refresh().await,
            Action::Export(format) => self.export(format),
            Action::Print => self.print(),
            Action::Quit => return false,
        }
        true
    }
}

/// Runs the application UI in a loop, handling key presses and redrawing the dashboard.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    // Initial load, drawn first so the refresh gauge is visible
    app.begin_refresh("Loading stats");
    terminal.draw(|f| render_dashboard(f, &app.state))?;
    app.refresh().await;

    loop {
        app.state.update();
        terminal.draw(|f| render_dashboard(f, &app.state))?;

        if event::poll(Duration::from_millis(UI_TICK_MS))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }
                let Some(action) = Action::from_key(key.code) else {
                    continue;
                };
                if action == Action::Refresh {
                    app.begin_refresh("Refreshing stats");
                    terminal.draw(|f| render_dashboard(f, &app.state))?;
                }
                if !app.handle(action).await {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::api::{DashboardStats, MockPredictionApi, PredictionApi};
    use crate::events::EventType;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn app_with(result: Result<DashboardStats, ApiError>, out_dir: PathBuf) -> App {
        let mut mock = MockPredictionApi::new();
        let mut result = Some(result);
        mock.expect_base_url()
            .returning(|| "http://localhost:5000".to_string());
        mock.expect_dashboard_stats()
            .returning(move || result.take().unwrap_or_else(|| Ok(DashboardStats::default())));
        let api: Arc<dyn PredictionApi> = Arc::new(mock);
        App::new(Dashboard::new(api), out_dir, UIConfig::new(false))
    }

    fn stats() -> DashboardStats {
        DashboardStats {
            total_predictions: Some(3),
            positive_cases: Some(1),
            accuracy: Some(0.75),
        }
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Action::from_key(KeyCode::Char('r')), Some(Action::Refresh));
        assert_eq!(
            Action::from_key(KeyCode::Char('c')),
            Some(Action::Export(ExportFormat::Csv))
        );
        assert_eq!(
            Action::from_key(KeyCode::Char('j')),
            Some(Action::Export(ExportFormat::Json))
        );
        assert_eq!(Action::from_key(KeyCode::Char('p')), Some(Action::Print));
        assert_eq!(Action::from_key(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(Action::from_key(KeyCode::Char('x')), None);
    }

    #[tokio::test]
    async fn test_refresh_syncs_cards_into_view() {
        let dir = tempdir().unwrap();
        let mut app = app_with(Ok(stats()), dir.path().to_path_buf());
        app.refresh().await;

        assert_eq!(app.state().cards.cards()[0].value, "3");
        assert!(app.state().table.is_some());
        let last = app.state().activity_logs.back().unwrap();
        assert_eq!(last.event_type, EventType::Success);
    }

    #[tokio::test]
    async fn test_export_writes_file_after_refresh() {
        let dir = tempdir().unwrap();
        let mut app = app_with(Ok(stats()), dir.path().to_path_buf());
        app.refresh().await;
        assert!(app.handle(Action::Export(ExportFormat::Json)).await);
        app.state.update();

        let written: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(written.len(), 1);
        let last = app.state().activity_logs.back().unwrap();
        assert_eq!(last.source, Source::Export);
        assert_eq!(last.event_type, EventType::Success);
    }

    #[tokio::test]
    // Exporting before any stats arrive only logs a notice.
    async fn test_export_without_stats_writes_nothing() {
        let dir = tempdir().unwrap();
        let error = ApiError::Http {
            status: 500,
            message: String::new(),
        };
        let mut app = app_with(Err(error), dir.path().to_path_buf());
        app.refresh().await;
        app.export(ExportFormat::Csv);
        app.state.update();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        let last = app.state().activity_logs.back().unwrap();
        assert_eq!(last.msg, "Nothing to export");
    }

    #[tokio::test]
    async fn test_quit_stops_loop() {
        let dir = tempdir().unwrap();
        let mut app = app_with(Ok(stats()), dir.path().to_path_buf());
        assert!(!app.handle(Action::Quit).await);
    }
}
