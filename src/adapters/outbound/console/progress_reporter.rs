use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// StderrProgressReporter adapter for reporting scan progress to stderr
///
/// Keeps stdout free for the JSON report. Per-repository progress is drawn
/// with an indicatif bar that is created on first use.
pub struct StderrProgressReporter {
    progress_bar: Mutex<Option<ProgressBar>>,
}

impl StderrProgressReporter {
    const TEMPLATE: &'static str =
        "   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} repositories - {msg}";

    pub fn new() -> Self {
        Self {
            progress_bar: Mutex::new(None),
        }
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        let mut slot = self.progress_bar.lock().ok()?;
        let pb = slot.get_or_insert_with(|| {
            let style = ProgressStyle::default_bar()
                .template(Self::TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-");
            ProgressBar::new(total as u64).with_style(style)
        });
        pb.set_length(total as u64);
        Some(pb.clone())
    }

    fn finish(&self) {
        if let Ok(mut slot) = self.progress_bar.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        if let Some(pb) = self.progress_bar(total) {
            pb.set_position(current as u64);
            if let Some(msg) = message {
                pb.set_message(msg.to_string());
            }
        }
    }

    fn report_error(&self, message: &str) {
        self.finish();
        eprintln!("{}", message);
    }

    fn report_completion(&self, message: &str) {
        self.finish();
        eprintln!();
        eprintln!("{}", message);
    }
}
