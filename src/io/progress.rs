//! Progress display for batch stack processing

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static STACK_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} cells"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Stacks: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Coordinates progress display for batch operations
///
/// Shows a per-stack bar counting tracked selections, plus an overall batch
/// bar when more than one stack is being processed.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    stack_bar: Option<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            stack_bar: None,
        }
    }

    /// Initialize the batch bar for the number of stacks to process
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }
    }

    /// Start the per-stack bar for a new file
    pub fn start_stack(&mut self, path: &Path, selections: usize) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let stack_bar = ProgressBar::new(selections as u64);
        stack_bar.set_style(STACK_STYLE.clone());
        stack_bar.set_message(display_name);
        self.stack_bar = Some(self.multi_progress.add(stack_bar));
    }

    /// Record one tracked selection on the current stack
    pub fn update_selection(&self) {
        if let Some(ref stack_bar) = self.stack_bar {
            stack_bar.inc(1);
        }
    }

    /// Mark the current stack as completed
    pub fn finish_stack(&mut self) {
        if let Some(stack_bar) = self.stack_bar.take() {
            stack_bar.finish();
            self.multi_progress.remove(&stack_bar);
        }
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All stacks processed");
        }
        let _ = self.multi_progress.clear();
    }
}
