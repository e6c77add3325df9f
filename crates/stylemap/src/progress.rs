//! Scan progress and cancellation.
//!
//! A scan reports progress in coarse ticks so a UI can animate a bar. The
//! core has no timers: [`ScanTicks`] is a plain iterator and the host decides
//! how fast to drain it. Each tick checks the scan's [`CancelToken`]; once it
//! is cancelled the iterator yields a single [`ScanProgress::Cancelled`] and
//! stops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// Shared cancellation flag for one scan.
///
/// Clones observe the same flag. Cancelling is idempotent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One progress event of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ScanProgress {
    Progress { scanned: usize, total: usize },
    Done { total: usize },
    Cancelled,
}

/// Iterator over the progress events of a scan of `total` units.
///
/// ```rust
/// use stylemap::progress::{CancelToken, ScanProgress, ScanTicks};
///
/// let ticks: Vec<_> = ScanTicks::new(25, CancelToken::new()).collect();
/// assert_eq!(ticks[0], ScanProgress::Progress { scanned: 3, total: 25 });
/// assert_eq!(ticks.last(), Some(&ScanProgress::Done { total: 25 }));
/// ```
#[derive(Debug, Clone)]
pub struct ScanTicks {
    scanned: usize,
    total: usize,
    step: usize,
    cancel: CancelToken,
    finished: bool,
}

impl ScanTicks {
    pub fn new(total: usize, cancel: CancelToken) -> Self {
        Self {
            scanned: 0,
            total,
            step: total.div_ceil(10).max(1),
            cancel,
            finished: false,
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }
}

impl Iterator for ScanTicks {
    type Item = ScanProgress;

    fn next(&mut self) -> Option<ScanProgress> {
        if self.finished {
            return None;
        }
        if self.cancel.is_cancelled() {
            self.finished = true;
            return Some(ScanProgress::Cancelled);
        }
        self.scanned += self.step;
        if self.scanned >= self.total {
            self.finished = true;
            Some(ScanProgress::Done { total: self.total })
        } else {
            Some(ScanProgress::Progress {
                scanned: self.scanned,
                total: self.total,
            })
        }
    }
}
