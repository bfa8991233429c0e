//! Terminal patch sink
//!
//! Applies form patches to stdout: field errors and alerts as coloured messages, the loader as
//! an indicatif progress bar.

use crate::cli_messages::{print_alert, print_error};
use crate::form::{Patch, PatchSink, ResultView};
use crate::print_cmd_info;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const PROGRESS_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}";

#[derive(Default)]
pub struct TerminalSink {
    loader: Option<ProgressBar>,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn show_loader(&mut self, message: String) {
        let bar = ProgressBar::new(100);
        match ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            Ok(style) => bar.set_style(style.progress_chars("█▉▊▋▌▍▎▏ ")),
            Err(e) => log::debug!("Falling back to default progress style: {}", e),
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(100));
        self.loader = Some(bar);
    }

    /// Runs `print` without tearing the progress bar.
    fn print_above_loader(&self, print: impl FnOnce()) {
        match &self.loader {
            Some(bar) => bar.suspend(print),
            None => print(),
        }
    }
}

fn print_result(view: &ResultView) {
    println!();
    println!("  Prediction : {}", view.headline());
    println!("  Confidence : {}", view.confidence);
    if let Some(model) = &view.model {
        println!("  Model      : {}", model);
    }
    println!();
}

impl PatchSink for TerminalSink {
    fn apply(&mut self, patch: Patch) {
        match patch {
            Patch::SetFieldError { field, message } => {
                self.print_above_loader(|| print_error(&format!("{}: {}", field, message), None))
            }
            Patch::ClearFieldError { field } => log::trace!("Cleared error on {}", field),
            Patch::ShowField { field } => log::debug!("{} is now shown", field),
            Patch::HideField { field } => log::debug!("{} is now hidden", field),
            Patch::SetFieldValue { field, value } => {
                self.print_above_loader(|| print_cmd_info!("Field updated", "{} set to {}", field, value))
            }
            Patch::ShowLoader { message } => self.show_loader(message),
            Patch::HideLoader => {
                if let Some(bar) = self.loader.take() {
                    bar.finish_and_clear();
                }
            }
            Patch::SetProgress(percent) => {
                if let Some(bar) = &self.loader {
                    bar.set_position(u64::from(percent));
                }
            }
            Patch::ShowAlert(alert) => self.print_above_loader(|| print_alert(&alert)),
            Patch::RenderResult(view) => self.print_above_loader(|| print_result(&view)),
        }
    }
}
