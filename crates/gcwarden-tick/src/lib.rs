//! Named, cancellable periodic pulses for Gcwarden.
//!
//! A [`Pulse`] is one repeating timer with an explicit owner. The session
//! state machine holds exactly two, the hello pulse (~1 s) and the block
//! dispatch pulse (~2.5 s), and pauses/resumes them as part of its state
//! transitions, so a dangling timer can never fire after a transition.
//!
//! # Integration
//!
//! A pulse is designed to sit inside an actor's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(event) = events.recv() => { /* drive the state machine */ }
//!         n = hello.wait() => { /* send a hello */ }
//!         n = dispatch.wait() => { /* dispatch block messages */ }
//!     }
//! }
//! ```
//!
//! While paused, [`Pulse::wait`] pends forever; `select!` simply never
//! takes that branch until the pulse is resumed.

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a single pulse.
#[derive(Debug, Clone)]
pub struct PulseConfig {
    /// Time between pulses.
    pub period: Duration,
    /// Random jitter (0–max µs) added to the *first* pulse so that
    /// multiple pulses armed at the same instant don't fire in lockstep.
    pub initial_jitter_us: u64,
}

impl PulseConfig {
    /// Create a config for a specific period with default jitter.
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            initial_jitter_us: 2_000, // 0–2 ms default jitter
        }
    }
}

// ---------------------------------------------------------------------------
// Pulse
// ---------------------------------------------------------------------------

/// A repeating timer that can be paused and resumed atomically with the
/// state transitions of whoever owns it.
///
/// Overrun handling is always "skip": if the owner's work runs past a
/// deadline, the next pulse is scheduled from *now*, never from the missed
/// deadline, so a slow cycle can't cause a catch-up burst.
pub struct Pulse {
    /// Stable name used in log lines ("hello", "dispatch").
    name: &'static str,
    config: PulseConfig,
    /// When the next pulse fires. `None` while paused.
    next: Option<TokioInstant>,
    /// Monotonically increasing count of fired pulses.
    count: u64,
}

impl Pulse {
    /// Creates a pulse armed to fire one period (plus jitter) from now.
    pub fn new(name: &'static str, config: PulseConfig) -> Self {
        let mut pulse = Self {
            name,
            config,
            next: None,
            count: 0,
        };
        pulse.arm();
        pulse
    }

    /// Creates a pulse in the paused state. It fires only after
    /// [`resume`](Self::resume) is called.
    pub fn paused(name: &'static str, config: PulseConfig) -> Self {
        Self {
            name,
            config,
            next: None,
            count: 0,
        }
    }

    /// Waits until the next pulse is due and returns the pulse number.
    ///
    /// While paused this future pends forever; it will never resolve on
    /// its own, but `tokio::select!` will still process other branches.
    pub async fn wait(&mut self) -> u64 {
        let Some(next) = self.next else {
            // Paused: this future never completes.
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(next).await;

        let now = TokioInstant::now();
        self.count += 1;

        // Overrun detection: woke up noticeably late?
        let late_by = now.saturating_duration_since(next);
        if late_by > self.config.period / 10 {
            warn!(
                pulse = self.name,
                n = self.count,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "pulse overran, rescheduling from now"
            );
        }

        // Always schedule from now, not from the missed deadline.
        self.next = Some(now + self.config.period);

        trace!(pulse = self.name, n = self.count, "pulse fired");
        self.count
    }

    /// Pauses the pulse. [`wait`](Self::wait) pends until resumed.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn pause(&mut self) {
        if self.next.take().is_some() {
            debug!(pulse = self.name, n = self.count, "pulse paused");
        }
    }

    /// Resumes a paused pulse.
    ///
    /// The next deadline is `now + period`, never a stale deadline from
    /// before the pause, so resuming can't release a burst. Calling
    /// resume on a running pulse restarts its cadence the same way.
    pub fn resume(&mut self) {
        self.next = Some(TokioInstant::now() + self.config.period);
        debug!(pulse = self.name, n = self.count, "pulse resumed");
    }

    /// Whether the pulse is currently paused.
    pub fn is_paused(&self) -> bool {
        self.next.is_none()
    }

    /// Number of pulses fired so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The configured period.
    pub fn period(&self) -> Duration {
        self.config.period
    }

    /// Arms the first deadline, applying initial jitter.
    fn arm(&mut self) {
        let jitter = if self.config.initial_jitter_us > 0 {
            let us = rand::rng().random_range(0..self.config.initial_jitter_us);
            Duration::from_micros(us)
        } else {
            Duration::ZERO
        };
        self.next = Some(TokioInstant::now() + self.config.period + jitter);
    }
}

impl std::fmt::Debug for Pulse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pulse")
            .field("name", &self.name)
            .field("period", &self.config.period)
            .field("paused", &self.is_paused())
            .field("count", &self.count)
            .finish()
    }
}
