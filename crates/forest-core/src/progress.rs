//! Rate-limited progress reporting for long batch phases.
//!
//! Both attractiveness models and the popularity mapper run hundreds of
//! thousands of bounded searches; a counter line every ~2 s of wall time is
//! enough feedback without drowning the log.  `tick()` takes `&self` so the
//! same instance can be shared across rayon workers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::info;

/// Minimum wall time between two progress lines.
const REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// Shared progress counter with rate-limited log output.
pub struct Progress {
    label: &'static str,
    total: usize,
    done: AtomicUsize,
    started: Instant,
    last_report: Mutex<Instant>,
}

impl Progress {
    pub fn new(label: &'static str, total: usize) -> Self {
        let now = Instant::now();
        Self {
            label,
            total,
            done: AtomicUsize::new(0),
            started: now,
            last_report: Mutex::new(now),
        }
    }

    /// Record one completed work item; logs at most every [`REPORT_INTERVAL`].
    pub fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        // try_lock: under contention another worker is already reporting.
        if let Ok(mut last) = self.last_report.try_lock() {
            if last.elapsed() >= REPORT_INTERVAL {
                *last = Instant::now();
                info!(
                    "{}: {} of {}, this is {:5.1}%",
                    self.label,
                    done,
                    self.total,
                    done as f32 * 100.0 / self.total.max(1) as f32
                );
            }
        }
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    /// Log a final summary line with the elapsed wall time.
    pub fn finish(&self) {
        info!(
            "{}: finished {} items in {:.1?}",
            self.label,
            self.done(),
            self.started.elapsed()
        );
    }
}
