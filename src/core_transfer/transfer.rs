use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Send,
    Receive,
}

/// Book-keeping for one upload or download.
///
/// The receiving side learns `total` from the header before any payload
/// byte arrives; completion means `transferred == total`, never "the
/// stream closed".
#[derive(Debug, Clone)]
pub struct TransferSession {
    pub direction: Direction,
    pub filename: String,
    pub total: u64,
    transferred: u64,
    percent: u8,
}

impl TransferSession {
    pub fn new(direction: Direction, filename: impl Into<String>, total: u64) -> Self {
        Self {
            direction,
            filename: filename.into(),
            total,
            transferred: 0,
            // A declared empty payload is complete before the first read.
            percent: if total == 0 { 100 } else { 0 },
        }
    }

    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    pub fn remaining(&self) -> u64 {
        self.total - self.transferred
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn is_complete(&self) -> bool {
        self.transferred == self.total
    }

    /// Accounts for `n` more bytes and returns the new percentage when it
    /// went up. `n` never exceeds `remaining()`.
    pub fn record(&mut self, n: u64) -> Option<u8> {
        debug_assert!(n <= self.remaining());
        self.transferred = (self.transferred + n).min(self.total);

        if self.total == 0 {
            return None;
        }
        let percent = (self.transferred as u128 * 100 / self.total as u128) as u8;
        if percent > self.percent {
            self.percent = percent;
            Some(percent)
        } else {
            None
        }
    }
}

/// Receives progress notifications from the transfer loops.
pub trait ProgressObserver: Send {
    fn on_start(&mut self, _session: &TransferSession) {}

    fn on_progress(&mut self, session: &TransferSession, percent: u8);

    fn on_complete(&mut self, _session: &TransferSession) {}
}

/// Reports progress through the logger, used by the server.
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_start(&mut self, session: &TransferSession) {
        info!(
            "{} {} ({} bytes)",
            verb(session.direction),
            session.filename,
            session.total
        );
    }

    fn on_progress(&mut self, session: &TransferSession, percent: u8) {
        if session.direction == Direction::Receive {
            info!("Received: {}%...", percent);
        }
    }

    fn on_complete(&mut self, session: &TransferSession) {
        info!("File transmission complete: {}", session.filename);
    }
}

pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _session: &TransferSession, _percent: u8) {}
}

fn verb(direction: Direction) -> &'static str {
    match direction {
        Direction::Send => "Transferring",
        Direction::Receive => "Receiving",
    }
}
