//! Frame pacing primitives.
//!
//! The simulation may tick faster than the display refreshes. [`FrameThrottle`]
//! decides whether a tick is worth publishing, and [`PendingFrame`] makes sure
//! at most one frame request is outstanding at any time. Both are independent
//! of the browser: the host supplies timestamps and a [`FrameHost`].

/// Minimum spacing between published frames, roughly 60 Hz.
pub const DEFAULT_PUBLISH_INTERVAL_MS: f64 = 16.0;

/// Something that can schedule a callback for the next repaint.
pub trait FrameHost {
	/// Request a frame, returning a handle usable for cancellation.
	/// `None` means the request could not be made.
	fn request_frame(&self) -> Option<i32>;

	fn cancel_frame(&self, handle: i32);
}

/// Wall-clock rate limiter for publishing snapshots.
#[derive(Clone, Debug)]
pub struct FrameThrottle {
	interval_ms: f64,
	last_ms: Option<f64>,
}

impl FrameThrottle {
	pub fn new(interval_ms: f64) -> Self {
		Self {
			interval_ms: interval_ms.max(0.0),
			last_ms: None,
		}
	}

	/// Returns true (and records `now_ms`) if enough time has passed since the
	/// last accepted frame. The first call always passes.
	pub fn ready(&mut self, now_ms: f64) -> bool {
		match self.last_ms {
			Some(last) if now_ms - last < self.interval_ms => false,
			_ => {
				self.last_ms = Some(now_ms);
				true
			}
		}
	}

	/// Record a frame published regardless of the interval.
	pub fn force(&mut self, now_ms: f64) {
		self.last_ms = Some(now_ms);
	}

	pub fn reset(&mut self) {
		self.last_ms = None;
	}
}

impl Default for FrameThrottle {
	fn default() -> Self {
		Self::new(DEFAULT_PUBLISH_INTERVAL_MS)
	}
}

/// Coalesces frame requests: while one is pending, further requests are no-ops.
#[derive(Debug, Default)]
pub struct PendingFrame {
	handle: Option<i32>,
}

impl PendingFrame {
	/// Schedule a frame unless one is already pending. Returns true if a new
	/// request was made.
	pub fn request(&mut self, host: &impl FrameHost) -> bool {
		if self.handle.is_some() {
			return false;
		}
		self.handle = host.request_frame();
		self.handle.is_some()
	}

	/// Must be called from the frame callback before doing work, so that work
	/// done inside the callback can schedule the next frame.
	pub fn fired(&mut self) {
		self.handle = None;
	}

	pub fn cancel(&mut self, host: &impl FrameHost) {
		if let Some(handle) = self.handle.take() {
			host.cancel_frame(handle);
		}
	}

	pub fn is_pending(&self) -> bool {
		self.handle.is_some()
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use std::cell::{Cell, RefCell};

	use super::*;

	/// Records requests and cancellations instead of talking to a browser.
	#[derive(Default)]
	pub(crate) struct FakeHost {
		pub next: Cell<i32>,
		pub requested: Cell<usize>,
		pub cancelled: RefCell<Vec<i32>>,
	}

	impl FrameHost for FakeHost {
		fn request_frame(&self) -> Option<i32> {
			self.requested.set(self.requested.get() + 1);
			self.next.set(self.next.get() + 1);
			Some(self.next.get())
		}

		fn cancel_frame(&self, handle: i32) {
			self.cancelled.borrow_mut().push(handle);
		}
	}

	#[test]
	fn throttle_skips_frames_closer_than_interval() {
		let mut throttle = FrameThrottle::new(16.0);
		assert!(throttle.ready(0.0));
		assert!(!throttle.ready(5.0));
		assert!(!throttle.ready(15.9));
		assert!(throttle.ready(16.0));
		assert!(!throttle.ready(20.0));
		assert!(throttle.ready(40.0));
	}

	#[test]
	fn forced_frame_restarts_interval() {
		let mut throttle = FrameThrottle::new(16.0);
		assert!(throttle.ready(0.0));
		throttle.force(10.0);
		assert!(!throttle.ready(20.0));
		assert!(throttle.ready(26.0));
		throttle.reset();
		assert!(throttle.ready(27.0));
	}

	#[test]
	fn pending_frame_coalesces_requests() {
		let host = FakeHost::default();
		let mut frame = PendingFrame::default();

		assert!(frame.request(&host));
		assert!(!frame.request(&host));
		assert!(!frame.request(&host));
		assert_eq!(host.requested.get(), 1);

		frame.fired();
		assert!(!frame.is_pending());
		assert!(frame.request(&host));
		assert_eq!(host.requested.get(), 2);
	}

	#[test]
	fn cancel_releases_outstanding_request() {
		let host = FakeHost::default();
		let mut frame = PendingFrame::default();

		frame.cancel(&host);
		assert!(host.cancelled.borrow().is_empty());

		frame.request(&host);
		frame.cancel(&host);
		assert_eq!(*host.cancelled.borrow(), [1]);
		assert!(!frame.is_pending());
	}
}
