//! The fixed-tick main loop driver.
//!
//! Ticks at a target rate using `CLOCK_MONOTONIC` via [`std::time::Instant`].
//! When a tick runs long, the next deadline is computed from the actual
//! wake time (`last := actual`) rather than from the missed deadline
//! (`last := next_tick`) — the lag-correcting variant, chosen over the
//! original C source's policy (see DESIGN.md).

use crate::input::StopFlag;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

/// What happened on this call to `tick()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The stop flag was set; the caller should exit its loop. No sleep
    /// happened and no bookkeeping advanced.
    Stop,
    /// The deadline hadn't arrived yet; the caller thread slept until it did.
    OnTime,
    /// The deadline had already passed by `lag` before `tick()` was even
    /// called — no sleep happened, and the next deadline is rebased from
    /// now rather than compounding the delay forward.
    Lagging(Duration),
}

pub struct TickContext {
    stop: StopFlag,
    period: Duration,
    last: Instant,
    tick_count: u64,
    tps_window_start: Instant,
    tps_window_count: u32,
    measured_tps: f64,
}

impl TickContext {
    /// `tps` is clamped to at least 1, matching the source's `tps = max(tps,
    /// 1)` — a requested rate of zero would otherwise divide by zero
    /// computing the period. `stop` is the same shared flag a caller hands
    /// to `InputPipeline`, so setting it from anywhere stops both.
    pub fn init(tps: u32, stop: StopFlag) -> Self {
        let tps = tps.max(1);
        let period = Duration::from_nanos(1_000_000_000 / tps as u64);
        let now = Instant::now();
        TickContext {
            stop,
            period,
            last: now,
            tick_count: 0,
            tps_window_start: now,
            tps_window_count: 0,
            measured_tps: 0.0,
        }
    }

    /// If the stop flag is set, return `Stop` immediately. Otherwise block
    /// until the next tick deadline (or return immediately if it has
    /// already passed), then advance bookkeeping.
    pub fn tick(&mut self) -> TickOutcome {
        if self.stop.load(Ordering::SeqCst) {
            return TickOutcome::Stop;
        }

        let deadline = self.last + self.period;
        let now = Instant::now();

        let outcome = if deadline > now {
            std::thread::sleep(deadline - now);
            TickOutcome::OnTime
        } else {
            TickOutcome::Lagging(now - deadline)
        };

        self.tick_count += 1;
        self.last = Instant::now();
        self.record_tick();
        outcome
    }

    fn record_tick(&mut self) {
        self.tps_window_count += 1;
        let elapsed = self.last.duration_since(self.tps_window_start);
        if elapsed >= Duration::from_secs(1) {
            self.measured_tps = self.tps_window_count as f64 / elapsed.as_secs_f64();
            self.tps_window_count = 0;
            self.tps_window_start = self.last;
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// TPS measured over the most recently completed one-second window;
    /// `0.0` until a full window has elapsed.
    pub fn measured_tps(&self) -> f64 {
        self.measured_tps
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
