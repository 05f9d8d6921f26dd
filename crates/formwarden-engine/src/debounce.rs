//! Per-field debounce slot
//!
//! Every trigger joins the pending burst and pushes the burst deadline back
//! by the interval. Triggers sleep until the slot's current deadline; the
//! first one that wakes past it with its burst still pending takes the
//! waiters and runs, so a dropped trigger never strands the rest of the
//! burst. The outcome is delivered to every trigger of the burst. A flush
//! runs the burst immediately and a cancel drops it, in which case the
//! waiting triggers get `None`.

use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

pub(crate) struct DebounceSlot<T> {
	/// Bumped whenever a burst is taken by a run, a flush or a cancel.
	burst: Cell<u64>,
	deadline: Cell<Option<Instant>>,
	waiters: RefCell<Vec<oneshot::Sender<T>>>,
}

impl<T> Default for DebounceSlot<T> {
	fn default() -> Self {
		Self {
			burst: Cell::new(0),
			deadline: Cell::new(None),
			waiters: RefCell::new(Vec::new()),
		}
	}
}

impl<T: Clone> DebounceSlot<T> {
	/// Join the current burst and wait for its outcome.
	pub(crate) async fn schedule<F, Fut>(&self, delay: Duration, run: F) -> Option<T>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = T>,
	{
		let (tx, rx) = oneshot::channel();
		self.waiters.borrow_mut().push(tx);
		self.deadline.set(Some(Instant::now() + delay));
		let burst = self.burst.get();

		while let Some(deadline) = self.deadline.get() {
			tokio::time::sleep_until(deadline).await;
			if self.burst.get() != burst {
				tracing::trace!(burst, "debounced trigger superseded");
				break;
			}
			if self.deadline.get().is_some_and(|d| d <= Instant::now()) {
				let waiters = self.take_burst();
				let outcome = run().await;
				deliver(waiters, &outcome);
				break;
			}
		}
		rx.await.ok()
	}

	/// Run the pending burst now. `None` when nothing is pending.
	pub(crate) async fn flush<F, Fut>(&self, run: F) -> Option<T>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = T>,
	{
		if !self.is_pending() {
			return None;
		}
		let waiters = self.take_burst();
		let outcome = run().await;
		deliver(waiters, &outcome);
		Some(outcome)
	}

	/// Drop the pending burst. Returns whether anything was pending.
	pub(crate) fn cancel(&self) -> bool {
		if !self.is_pending() {
			return false;
		}
		let dropped = self.take_burst();
		tracing::trace!(waiters = dropped.len(), "debounced burst cancelled");
		true
	}

	pub(crate) fn is_pending(&self) -> bool {
		!self.waiters.borrow().is_empty()
	}

	fn take_burst(&self) -> Vec<oneshot::Sender<T>> {
		self.burst.set(self.burst.get() + 1);
		self.deadline.set(None);
		self.waiters.take()
	}
}

fn deliver<T: Clone>(waiters: Vec<oneshot::Sender<T>>, outcome: &T) {
	for waiter in waiters {
		// The receiving trigger may have been dropped.
		let _ = waiter.send(outcome.clone());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::rc::Rc;

	const DELAY: Duration = Duration::from_millis(300);

	fn counting_run(calls: &Rc<Cell<u32>>) -> impl FnOnce() -> futures::future::Ready<u32> {
		let calls = Rc::clone(calls);
		move || {
			calls.set(calls.get() + 1);
			futures::future::ready(calls.get())
		}
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_burst_runs_once_and_shares_outcome() {
		// Arrange
		let slot = DebounceSlot::<u32>::default();
		let calls = Rc::new(Cell::new(0));

		// Act
		let (a, b, c) = tokio::join!(
			slot.schedule(DELAY, counting_run(&calls)),
			async {
				tokio::time::sleep(Duration::from_millis(100)).await;
				slot.schedule(DELAY, counting_run(&calls)).await
			},
			async {
				tokio::time::sleep(Duration::from_millis(200)).await;
				slot.schedule(DELAY, counting_run(&calls)).await
			},
		);

		// Assert
		assert_eq!(calls.get(), 1);
		assert_eq!((a, b, c), (Some(1), Some(1), Some(1)));
		assert!(!slot.is_pending());
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_separate_bursts_run_separately() {
		let slot = DebounceSlot::<u32>::default();
		let calls = Rc::new(Cell::new(0));

		let first = slot.schedule(DELAY, counting_run(&calls)).await;
		let second = slot.schedule(DELAY, counting_run(&calls)).await;

		assert_eq!((first, second), (Some(1), Some(2)));
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_dropped_trigger_hands_burst_over() {
		// Arrange
		let slot = DebounceSlot::<u32>::default();
		let calls = Rc::new(Cell::new(0));
		let start = Instant::now();

		// Act
		let (first, second) = tokio::join!(
			slot.schedule(DELAY, counting_run(&calls)),
			async {
				tokio::time::sleep(Duration::from_millis(100)).await;
				tokio::time::timeout(
					Duration::from_millis(50),
					slot.schedule(DELAY, counting_run(&calls)),
				)
				.await
			},
		);

		// Assert
		assert_eq!(first, Some(1));
		assert!(second.is_err());
		assert_eq!(calls.get(), 1);
		assert_eq!(start.elapsed(), Duration::from_millis(100) + DELAY);
		assert!(!slot.is_pending());
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_flush_runs_pending_burst_immediately() {
		// Arrange
		let slot = DebounceSlot::<u32>::default();
		let calls = Rc::new(Cell::new(0));

		// Act
		let (scheduled, flushed) = tokio::join!(
			slot.schedule(DELAY, counting_run(&calls)),
			async {
				tokio::time::sleep(Duration::from_millis(10)).await;
				slot.flush(counting_run(&calls)).await
			},
		);

		// Assert
		assert_eq!(calls.get(), 1);
		assert_eq!(flushed, Some(1));
		assert_eq!(scheduled, Some(1));
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_flush_without_pending_burst() {
		let slot = DebounceSlot::<u32>::default();
		let calls = Rc::new(Cell::new(0));
		assert_eq!(slot.flush(counting_run(&calls)).await, None);
		assert_eq!(calls.get(), 0);
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_cancel_drops_burst() {
		// Arrange
		let slot = DebounceSlot::<u32>::default();
		let calls = Rc::new(Cell::new(0));

		// Act
		let (scheduled, cancelled) = tokio::join!(
			slot.schedule(DELAY, counting_run(&calls)),
			async {
				tokio::time::sleep(Duration::from_millis(10)).await;
				slot.cancel()
			},
		);

		// Assert
		assert!(cancelled);
		assert_eq!(scheduled, None);
		assert_eq!(calls.get(), 0);
		assert!(!slot.cancel());
	}
}
