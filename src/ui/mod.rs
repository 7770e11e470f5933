//! UI/Progress presentation layer
//!
//! Crawl progress goes through the [`ProgressReporter`] trait so the crawler
//! stays independent of the terminal:
//! - [`InteractiveProgressReporter`] draws an indicatif spinner on stderr
//! - [`SilentProgressReporter`] does nothing (tests, `--verbose`, non-TTY output)

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for a running crawl
///
/// Called from crawler worker threads, so every method takes `&self`.
pub trait ProgressReporter: Send + Sync {
    /// A package identity was claimed for crawling
    fn package_visited(&self, identity: &str);

    /// The crawl completed
    fn finish(&self);

    /// The crawl failed
    fn abandon(&self);
}

/// Spinner showing how many packages have been visited
pub struct InteractiveProgressReporter {
    spinner: ProgressBar,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {pos} packages {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { spinner }
    }
}

impl Default for InteractiveProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn package_visited(&self, identity: &str) {
        // Keep the line short for narrow terminals
        let display = if identity.len() > 50 {
            let start = identity
                .char_indices()
                .map(|(i, _)| i)
                .find(|&i| identity.len() - i <= 47)
                .unwrap_or(0);
            format!("...{}", &identity[start..])
        } else {
            identity.to_string()
        };
        self.spinner.set_message(display);
        self.spinner.inc(1);
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    fn abandon(&self) {
        self.spinner.abandon();
    }
}

/// No-op reporter
#[derive(Debug, Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn package_visited(&self, _identity: &str) {}

    fn finish(&self) {}

    fn abandon(&self) {}
}
