//! Integration tests for the pulse scheduler.
//!
//! Uses `tokio::time::pause()` (via `start_paused = true`) to control
//! time deterministically, so `sleep_until` resolves instantly as the
//! clock is advanced.

use std::time::Duration;

use gcwarden_tick::{Pulse, PulseConfig};

// =========================================================================
// Helpers
// =========================================================================

fn config_1s() -> PulseConfig {
    PulseConfig {
        period: Duration::from_secs(1),
        initial_jitter_us: 0,
    }
}

/// Runs `fut` with a short timeout, returning `None` if it pends.
async fn with_timeout<T>(
    fut: impl std::future::Future<Output = T>,
) -> Option<T> {
    tokio::time::timeout(Duration::from_secs(30), fut).await.ok()
}

// =========================================================================
// Construction
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_new_pulse_is_armed() {
    let p = Pulse::new("hello", config_1s());
    assert!(!p.is_paused());
    assert_eq!(p.count(), 0);
    assert_eq!(p.period(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_paused_constructor_starts_paused() {
    let p = Pulse::paused("dispatch", config_1s());
    assert!(p.is_paused());
}

#[test]
fn test_with_period_sets_default_jitter() {
    let cfg = PulseConfig::with_period(Duration::from_millis(2500));
    assert_eq!(cfg.period, Duration::from_millis(2500));
    assert!(cfg.initial_jitter_us > 0);
}

// =========================================================================
// Firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_wait_fires_and_counts_monotonically() {
    let mut p = Pulse::new("hello", config_1s());
    for expected in 1..=5u64 {
        assert_eq!(p.wait().await, expected);
    }
    assert_eq!(p.count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_initial_jitter_stays_within_bound() {
    let mut p = Pulse::new(
        "hello",
        PulseConfig {
            period: Duration::from_secs(1),
            initial_jitter_us: 2_000,
        },
    );
    // First pulse must arrive within period + max jitter.
    let fired = tokio::time::timeout(
        Duration::from_secs(1) + Duration::from_micros(2_000),
        p.wait(),
    )
    .await;
    assert_eq!(fired.ok(), Some(1));
}

// =========================================================================
// Pause / resume
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_paused_pulse_pends_forever() {
    let mut p = Pulse::paused("dispatch", config_1s());
    assert!(with_timeout(p.wait()).await.is_none());
    assert_eq!(p.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_a_running_pulse() {
    let mut p = Pulse::new("hello", config_1s());
    p.wait().await;
    p.pause();
    assert!(p.is_paused());
    assert!(with_timeout(p.wait()).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_resume_rearms_without_burst() {
    let mut p = Pulse::new("hello", config_1s());
    p.pause();

    // A long pause must not queue up missed pulses.
    tokio::time::advance(Duration::from_secs(60)).await;
    p.resume();

    let first = tokio::time::timeout(Duration::from_millis(1100), p.wait())
        .await
        .expect("pulse after resume");
    assert_eq!(first, 1);

    // And the next one arrives a full period later, not immediately.
    let quick =
        tokio::time::timeout(Duration::from_millis(100), p.wait()).await;
    assert!(quick.is_err(), "resume released a burst");
}

#[tokio::test(start_paused = true)]
async fn test_resume_on_running_pulse_restarts_cadence() {
    let mut p = Pulse::new("hello", config_1s());

    // Let most of a period elapse, then restart the cadence.
    tokio::time::advance(Duration::from_millis(900)).await;
    p.resume();

    // The old deadline (100ms away) must not fire.
    let early =
        tokio::time::timeout(Duration::from_millis(500), p.wait()).await;
    assert!(early.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_pause_is_idempotent() {
    let mut p = Pulse::new("hello", config_1s());
    p.pause();
    p.pause();
    assert!(p.is_paused());
}

// =========================================================================
// Overrun
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_overrun_schedules_from_now_not_deadline() {
    let mut p = Pulse::new("dispatch", config_1s());
    p.wait().await;

    // Simulate a slow cycle: 3.5 periods pass before the next wait.
    tokio::time::advance(Duration::from_millis(3500)).await;
    assert_eq!(p.wait().await, 2);

    // Only one pulse fired for the whole late window; the next is a
    // full period out.
    let quick =
        tokio::time::timeout(Duration::from_millis(100), p.wait()).await;
    assert!(quick.is_err(), "missed deadlines were replayed");
}
