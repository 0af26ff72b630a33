use feedback_core::ProgressSink;
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal progress bar for batch runs, drawn on stderr.
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    #[must_use]
    pub fn bar(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }

    /// No output; used when logs are machine-readable.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish_ok(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn finish_err(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}

impl ProgressSink for BatchProgress {
    fn on_progress(&mut self, completed: usize, total: usize) {
        self.bar.set_position(completed as u64);
        self.bar
            .set_message(format!("Processing review {completed}/{total}"));
    }
}
