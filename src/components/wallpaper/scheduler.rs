//! Self-rescheduling frame trigger.
//!
//! The scheduler only tracks the one pending tick. Whoever owns it (the
//! scene) runs the draw step when the backend fires and decides whether to
//! call [`FrameScheduler::schedule_next`] afterwards.

use std::time::Duration;

/// Deferred-callback primitive of the host (e.g. `setTimeout`).
pub trait TimerBackend {
	/// Identifies one posted callback.
	type Handle;

	/// Schedules the tick callback after `delay`. `None` if the host refused.
	fn post(&mut self, delay: Duration) -> Option<Self::Handle>;
	/// Cancels a callback that has not fired yet.
	fn cancel(&mut self, handle: Self::Handle);
	/// Monotonic-ish wall clock in milliseconds, for time-based effects.
	fn now_ms(&self) -> f64;
}

/// Fixed-delay tick loop, not phase-corrected.
pub struct FrameScheduler<T: TimerBackend> {
	backend: T,
	pending: Option<T::Handle>,
	interval: Duration,
}

impl<T: TimerBackend> FrameScheduler<T> {
	/// Idle scheduler ticking every `interval` once started.
	pub fn new(backend: T, interval: Duration) -> Self {
		Self {
			backend,
			pending: None,
			interval,
		}
	}

	/// Cancels any pending tick and schedules one immediately.
	pub fn start(&mut self) {
		self.stop();
		self.pending = self.backend.post(Duration::ZERO);
	}

	/// Cancels the pending tick, if any.
	pub fn stop(&mut self) {
		if let Some(handle) = self.pending.take() {
			self.backend.cancel(handle);
		}
	}

	/// Must be called when the backend fires, before drawing.
	pub fn fired(&mut self) {
		self.pending = None;
	}

	/// Schedules the next tick one interval from now.
	pub fn schedule_next(&mut self) {
		self.stop();
		self.pending = self.backend.post(self.interval);
	}

	/// Whether a tick is posted and not yet fired.
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Delay between ticks.
	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// Clock of the backend, in milliseconds.
	pub fn now_ms(&self) -> f64 {
		self.backend.now_ms()
	}
}

impl<T: TimerBackend> Drop for FrameScheduler<T> {
	fn drop(&mut self) {
		self.stop();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::wallpaper::testing::ManualTimer;

	fn scheduler() -> (FrameScheduler<ManualTimer>, ManualTimer) {
		let timer = ManualTimer::new();
		(
			FrameScheduler::new(timer.clone(), Duration::from_millis(16)),
			timer,
		)
	}

	#[test]
	fn start_posts_immediate_tick() {
		let (mut s, timer) = scheduler();
		s.start();
		assert!(s.is_pending());
		assert_eq!(timer.log().pending, vec![(0, Duration::ZERO)]);
	}

	#[test]
	fn start_is_idempotent() {
		let (mut s, timer) = scheduler();
		s.start();
		s.start();
		let log = timer.log();
		assert_eq!(log.pending.len(), 1);
		assert_eq!(log.cancelled, vec![0]);
	}

	#[test]
	fn stop_is_idempotent() {
		let (mut s, timer) = scheduler();
		s.stop();
		s.start();
		s.stop();
		s.stop();
		assert!(!s.is_pending());
		let log = timer.log();
		assert!(log.pending.is_empty());
		assert_eq!(log.cancelled, vec![0]);
	}

	#[test]
	fn reschedule_uses_interval() {
		let (mut s, timer) = scheduler();
		s.start();
		timer.fire();
		s.fired();
		s.schedule_next();
		assert_eq!(timer.log().pending[0].1, Duration::from_millis(16));
		// the fired handle is not cancelled again
		assert!(timer.log().cancelled.is_empty());
	}

	#[test]
	fn drop_cancels_pending() {
		let (mut s, timer) = scheduler();
		s.start();
		drop(s);
		assert!(timer.log().pending.is_empty());
	}
}
