//! Cadence detection from discrete pedal-stroke triggers.
//!
//! Each crank revolution produces one left and one right trigger. The two
//! sides are buffered independently in small fixed-capacity windows and
//! merged when estimating revolutions per minute.

use crate::input::types::{PedalEvent, PedalSide};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of triggers kept per pedal side.
pub const PEDAL_WINDOW_CAPACITY: usize = 10;

/// Time without a trigger after which cadence is reported as zero.
pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_millis(2000);

/// Revolutions represented by a single trigger.
const REVOLUTIONS_PER_TRIGGER: f64 = 0.5;

/// Tracks pedal triggers and derives cadence in RPM.
#[derive(Debug, Clone)]
pub struct CadenceTracker {
    /// Recent left-side triggers, oldest first
    left: VecDeque<Instant>,
    /// Recent right-side triggers, oldest first
    right: VecDeque<Instant>,
    /// Time without triggers before the estimate drops to zero
    stall_timeout: Duration,
    /// Window estimate as of the last accepted trigger
    window_rpm: f64,
}

impl Default for CadenceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CadenceTracker {
    /// Create a tracker with the default stall timeout.
    pub fn new() -> Self {
        Self::with_stall_timeout(DEFAULT_STALL_TIMEOUT)
    }

    /// Create a tracker with a custom stall timeout.
    pub fn with_stall_timeout(stall_timeout: Duration) -> Self {
        Self {
            left: VecDeque::with_capacity(PEDAL_WINDOW_CAPACITY + 1),
            right: VecDeque::with_capacity(PEDAL_WINDOW_CAPACITY + 1),
            stall_timeout,
            window_rpm: 0.0,
        }
    }

    pub fn stall_timeout(&self) -> Duration {
        self.stall_timeout
    }

    /// Record a trigger happening now.
    pub fn on_pedal_trigger(&mut self, side: PedalSide) -> bool {
        self.on_pedal_trigger_at(side, Instant::now())
    }

    /// Record a pedal event.
    pub fn record(&mut self, event: PedalEvent) -> bool {
        self.on_pedal_trigger_at(event.side, event.timestamp)
    }

    /// Record a trigger at an explicit time.
    ///
    /// Returns `false` if the trigger is older than the last one stored for
    /// the same side; such triggers are dropped and leave cadence untouched.
    pub fn on_pedal_trigger_at(&mut self, side: PedalSide, at: Instant) -> bool {
        let last_on_side = self.window(side).back().copied();
        if let Some(last) = last_on_side {
            if at < last {
                tracing::debug!("Dropping stale {} pedal trigger", side);
                return false;
            }
        }

        // A trigger after a stall starts a fresh window so pre-stall strokes
        // don't drag the estimate down.
        if let Some(newest) = self.last_trigger() {
            if at.saturating_duration_since(newest) >= self.stall_timeout {
                tracing::debug!("Pedalling resumed after stall, resetting cadence window");
                self.left.clear();
                self.right.clear();
            }
        }

        let window = self.window_mut(side);
        window.push_back(at);
        while window.len() > PEDAL_WINDOW_CAPACITY {
            window.pop_front();
        }

        self.window_rpm = self.compute_window_rpm();
        tracing::trace!("{} pedal trigger, cadence {:.1} rpm", side, self.window_rpm);
        true
    }

    /// Cadence estimated from the current window, ignoring elapsed time.
    pub fn rpm(&self) -> f64 {
        self.window_rpm
    }

    /// Cadence as seen at `now`.
    ///
    /// While no trigger arrives the estimate is capped by half a revolution
    /// over the time since the last trigger, and drops to zero once the stall
    /// timeout passes.
    pub fn rpm_at(&self, now: Instant) -> f64 {
        let Some(last) = self.last_trigger() else {
            return 0.0;
        };

        let since = now.saturating_duration_since(last);
        if since >= self.stall_timeout {
            return 0.0;
        }
        if since.is_zero() {
            return self.window_rpm;
        }

        let bound = REVOLUTIONS_PER_TRIGGER / since.as_secs_f64() * 60.0;
        self.window_rpm.min(bound)
    }

    /// Cadence as seen right now.
    pub fn current_rpm(&self) -> f64 {
        self.rpm_at(Instant::now())
    }

    /// Total buffered triggers across both sides.
    pub fn sample_count(&self) -> usize {
        self.left.len() + self.right.len()
    }

    /// Buffered triggers for one side.
    pub fn side_count(&self, side: PedalSide) -> usize {
        self.window(side).len()
    }

    /// Newest trigger on either side.
    pub fn last_trigger(&self) -> Option<Instant> {
        match (self.left.back(), self.right.back()) {
            (Some(l), Some(r)) => Some(*l.max(r)),
            (Some(l), None) => Some(*l),
            (None, Some(r)) => Some(*r),
            (None, None) => None,
        }
    }

    /// Start of the span both windows still cover completely.
    ///
    /// A full side has evicted triggers older than its front, so the merged
    /// window may not reach back past it.
    fn window_start(&self) -> Option<Instant> {
        let full_fronts = [&self.left, &self.right]
            .into_iter()
            .filter(|w| w.len() >= PEDAL_WINDOW_CAPACITY)
            .filter_map(|w| w.front().copied())
            .max();
        if full_fronts.is_some() {
            return full_fronts;
        }
        [self.left.front(), self.right.front()]
            .into_iter()
            .flatten()
            .min()
            .copied()
    }

    /// Forget all triggers.
    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
        self.window_rpm = 0.0;
    }

    fn compute_window_rpm(&self) -> f64 {
        let (Some(start), Some(newest)) = (self.window_start(), self.last_trigger()) else {
            return 0.0;
        };

        let count = self
            .left
            .iter()
            .chain(self.right.iter())
            .filter(|t| **t >= start)
            .count();
        if count < 2 {
            return 0.0;
        }

        let elapsed = newest.saturating_duration_since(start).as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }

        let revolutions = (count - 1) as f64 * REVOLUTIONS_PER_TRIGGER;
        revolutions / elapsed * 60.0
    }

    fn window(&self, side: PedalSide) -> &VecDeque<Instant> {
        match side {
            PedalSide::Left => &self.left,
            PedalSide::Right => &self.right,
        }
    }

    fn window_mut(&mut self, side: PedalSide) -> &mut VecDeque<Instant> {
        match side {
            PedalSide::Left => &mut self.left,
            PedalSide::Right => &mut self.right,
        }
    }
}
