use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lru::LruCache;
use uuid::Uuid;

use crate::domain::payment::Payment;
use crate::domain::queue::Queue;
use crate::infrastructure::queue::in_memory_queue::InMemoryQueue;

/// A payment plus which retry this is (1-based; the initial dispatch is not
/// a retry).
#[derive(Debug, Clone)]
pub struct RetryEntry {
	pub payment: Payment,
	pub attempt: u32,
}

/// Outcome of asking the retry queue to take a failed payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDisposition {
	/// Enqueued for the given retry attempt.
	Scheduled(u32),
	/// The payment already used up its attempt budget.
	Exhausted,
	/// The retry queue itself is full.
	Overflow,
}

/// Initial dispatch plus two retries.
pub const MAX_TOTAL_ATTEMPTS: u32 = 3;

/// Bounded FIFO of payments whose dispatch failed, with a per-correlation-id
/// attempt counter. The counter map is LRU-bounded so an adversarial stream
/// of distinct correlation ids cannot grow it without limit.
#[derive(Clone)]
pub struct RetryQueue {
	queue:    InMemoryQueue<RetryEntry>,
	attempts: Arc<Mutex<LruCache<Uuid, u32>>>,
}

impl RetryQueue {
	pub fn new(capacity: usize, attempt_capacity: usize) -> Self {
		let attempt_capacity = NonZeroUsize::new(attempt_capacity)
			.unwrap_or(NonZeroUsize::MIN);
		Self {
			queue:    InMemoryQueue::with_capacity(capacity),
			attempts: Arc::new(Mutex::new(LruCache::new(attempt_capacity))),
		}
	}

	/// Record one more failed attempt for this payment and queue it for a
	/// retry, unless its attempt budget is spent.
	pub fn schedule(&self, payment: Payment) -> RetryDisposition {
		let retry_number = {
			let mut attempts = self.attempts.lock().unwrap();
			let made = attempts
				.get(&payment.correlation_id)
				.copied()
				.unwrap_or(1);
			if made >= MAX_TOTAL_ATTEMPTS {
				return RetryDisposition::Exhausted;
			}
			attempts.put(payment.correlation_id, made + 1);
			made
		};

		let entry = RetryEntry {
			payment,
			attempt: retry_number,
		};
		match self.queue.try_push(entry) {
			Ok(()) => RetryDisposition::Scheduled(retry_number),
			Err(_) => RetryDisposition::Overflow,
		}
	}

	pub async fn pop(&self, timeout: Duration) -> Option<RetryEntry> {
		self.queue.pop(timeout).await
	}

	pub fn task_done(&self) {
		self.queue.task_done();
	}

	pub fn len(&self) -> usize {
		self.queue.len()
	}

	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}
}
