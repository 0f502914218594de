use std::sync::Arc;

use futures_util::StreamExt;

use crate::source::ByteStream;

/// Callback invoked with upload progress as a percentage (0–100).
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Converts byte counts into percentages for one transfer.
///
/// Reported values never decrease, even if a tick arrives out of order.
pub struct ProgressReporter {
    callback: ProgressCallback,
    total: u64,
    loaded: u64,
    last: u8,
}

impl ProgressReporter {
    /// Creates a reporter for a transfer of `total` bytes.
    pub fn new(callback: ProgressCallback, total: u64) -> Self {
        Self {
            callback,
            total,
            loaded: 0,
            last: 0,
        }
    }

    /// Records `n` more bytes sent and reports against the configured total.
    pub fn advance(&mut self, n: u64) {
        self.loaded = self.loaded.saturating_add(n);
        self.tick(self.loaded, self.total);
    }

    /// Reports one progress tick. Ticks without a usable total are ignored.
    pub fn tick(&mut self, loaded: u64, total: u64) {
        if total == 0 {
            return;
        }
        let pct = percent(loaded, total).max(self.last);
        self.last = pct;
        (self.callback)(pct);
    }
}

/// `round(loaded * 100 / total)`, capped at 100.
pub fn percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (loaded as f64 * 100.0 / total as f64).round();
    pct.min(100.0) as u8
}

/// Wraps a content stream so every chunk handed to the transport is
/// reported to `reporter`.
pub fn track_progress(stream: ByteStream, mut reporter: ProgressReporter) -> ByteStream {
    Box::pin(stream.map(move |chunk| {
        if let Ok(bytes) = &chunk {
            reporter.advance(bytes.len() as u64);
        }
        chunk
    }))
}
