use std::borrow::Cow;
use std::time::{Duration, Instant};

use log::{self, Level};

/// Logs how long a scope took when dropped.
///
/// A timer built while its level is disabled records nothing and logs
/// nothing.
pub struct ScopedTimer {
    label: Option<Cow<'static, str>>,
    level: Level,
    start: Instant,
}

impl ScopedTimer {
    pub fn with_level(label: impl Into<Cow<'static, str>>, level: Level) -> Self {
        let label = log::log_enabled!(level).then(|| label.into());
        Self {
            label,
            level,
            start: Instant::now(),
        }
    }

    /// Debug timer whose label is only built when debug logging is on.
    pub fn debug_lazy<F>(label_gen: F) -> Self
    where
        F: FnOnce() -> String,
    {
        let label = log::log_enabled!(Level::Debug).then(|| Cow::Owned(label_gen()));
        Self {
            label,
            level: Level::Debug,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some(label) = &self.label {
            log::log!(self.level, "{} took {} us", label, self.elapsed().as_micros());
        }
    }
}

/// Run `f` under a debug timer.
pub fn timed_debug<T, F, L>(label_gen: L, f: F) -> T
where
    F: FnOnce() -> T,
    L: FnOnce() -> String,
{
    let _timer = ScopedTimer::debug_lazy(label_gen);
    f()
}
