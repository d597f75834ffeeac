//! Per-stage progress bars.

use indicatif::{ProgressBar, ProgressStyle};

use super::theme::NetverTheme;

/// Progress of the units of one inventory stage.
///
/// Draws to stderr so stdout stays clean for catalog JSON. Hidden bars
/// accept every call and draw nothing.
pub struct StageProgress {
    bar: ProgressBar,
}

impl StageProgress {
    pub fn new(stage: &str, units: u64, visible: bool) -> Self {
        if !visible {
            return Self::hidden();
        }

        let bar = ProgressBar::new(units);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "{:<8} {{bar:30.cyan/dim}} {{pos}}/{{len}} {{msg}}",
                    stage
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━╸─"),
        );
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish_success(&self, msg: &str) {
        self.finish(NetverTheme::new().format_success(msg));
    }

    pub fn finish_error(&self, msg: &str) {
        self.finish(NetverTheme::new().format_error(msg));
    }

    fn finish(&self, msg: String) {
        if self.bar.is_hidden() {
            return;
        }
        self.bar
            .set_style(ProgressStyle::default_bar().template("{msg}").unwrap_or_else(|_| ProgressStyle::default_bar()));
        self.bar.finish_with_message(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_progress_counts() {
        let progress = StageProgress::new("probe", 3, false);
        progress.set_message("2.1.5");
        progress.inc();
        progress.inc();
        assert_eq!(progress.position(), 2);
        progress.finish_success("probe: 3 done");
    }

    #[test]
    fn visible_progress_does_not_panic() {
        let progress = StageProgress::new("extract", 1, true);
        progress.inc();
        progress.finish_error("extract: 1 failed");
    }
}
