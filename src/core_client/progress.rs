use crate::core_transfer::{Direction, ProgressObserver, TransferSession};
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal progress bar for client side transfers.
pub struct BarProgress {
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self { bar: None }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for BarProgress {
    fn on_start(&mut self, session: &TransferSession) {
        let bar = ProgressBar::new(session.total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {percent}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        let verb = match session.direction {
            Direction::Send => "Sending",
            Direction::Receive => "Receiving",
        };
        bar.set_message(format!("{} {}", verb, session.filename));
        self.bar = Some(bar);
    }

    fn on_progress(&mut self, session: &TransferSession, _percent: u8) {
        if let Some(bar) = &self.bar {
            bar.set_position(session.transferred());
        }
    }

    fn on_complete(&mut self, session: &TransferSession) {
        if let Some(bar) = self.bar.take() {
            bar.set_position(session.transferred());
            bar.finish_with_message("File transmission complete.");
        }
    }
}

impl Drop for BarProgress {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }
}
