use std::time::Duration;

use async_trait::async_trait;
use derive_more::derive::{Display, Error};

/// Returned by [`Queue::try_push`] when the queue is at capacity. The item is
/// dropped; callers decide how loudly to record that.
#[derive(Debug, Display, Error)]
#[display("queue is at capacity")]
pub struct QueueFull;

/// A bounded FIFO with drain semantics. Pushing never blocks; consumers
/// acknowledge each item with `task_done` so `join` can act as a barrier
/// over everything accepted so far.
#[async_trait]
pub trait Queue<B>: Send + Sync + 'static {
	/// Enqueue without blocking. Fails when the queue is full.
	fn try_push(&self, item: B) -> Result<(), QueueFull>;

	/// Dequeue the oldest item, waiting at most `timeout` for one to arrive.
	async fn pop(&self, timeout: Duration) -> Option<B>;

	/// Acknowledge one previously popped item as fully handled.
	fn task_done(&self);

	/// Wait until every accepted item has been acknowledged. On timeout the
	/// residual unfinished count is returned.
	async fn join(&self, timeout: Duration) -> Result<(), usize>;

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
