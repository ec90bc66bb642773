use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::domain::queue::{Queue, QueueFull};

/// Bounded in-process FIFO shared by the ingress handlers and the worker
/// pool. `unfinished` counts items accepted but not yet acknowledged with
/// `task_done`; `join` waits for it to reach zero, which is what lets the
/// summary coordinator drain the pipeline before reading storage.
pub struct InMemoryQueue<B> {
	inner: Arc<Shared<B>>,
}

struct Shared<B> {
	capacity:   usize,
	items:      Mutex<VecDeque<B>>,
	unfinished: AtomicUsize,
	item_ready: Notify,
	all_done:   Notify,
}

impl<B> InMemoryQueue<B> {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			inner: Arc::new(Shared {
				capacity,
				items: Mutex::new(VecDeque::new()),
				unfinished: AtomicUsize::new(0),
				item_ready: Notify::new(),
				all_done: Notify::new(),
			}),
		}
	}
}

impl<B> Clone for InMemoryQueue<B> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

#[async_trait]
impl<B: Send + 'static> Queue<B> for InMemoryQueue<B> {
	fn try_push(&self, item: B) -> Result<(), QueueFull> {
		{
			let mut items = self.inner.items.lock().unwrap();
			if items.len() >= self.inner.capacity {
				return Err(QueueFull);
			}
			items.push_back(item);
		}
		self.inner.unfinished.fetch_add(1, Ordering::SeqCst);
		self.inner.item_ready.notify_one();
		Ok(())
	}

	async fn pop(&self, timeout: Duration) -> Option<B> {
		let deadline = Instant::now() + timeout;
		loop {
			// Arm the notification before checking the queue, otherwise a
			// push between the check and the await is lost.
			let notified = self.inner.item_ready.notified();
			if let Some(item) = self.inner.items.lock().unwrap().pop_front() {
				return Some(item);
			}
			let now = Instant::now();
			if now >= deadline {
				return None;
			}
			if tokio::time::timeout(deadline - now, notified).await.is_err() {
				return None;
			}
		}
	}

	fn task_done(&self) {
		// Calls must balance successful pushes; workers acknowledge every
		// popped item exactly once.
		let previous = self.inner.unfinished.fetch_sub(1, Ordering::SeqCst);
		if previous == 1 {
			self.inner.all_done.notify_waiters();
		}
	}

	async fn join(&self, timeout: Duration) -> Result<(), usize> {
		let deadline = Instant::now() + timeout;
		loop {
			let notified = self.inner.all_done.notified();
			let pending = self.inner.unfinished.load(Ordering::SeqCst);
			if pending == 0 {
				return Ok(());
			}
			let now = Instant::now();
			if now >= deadline {
				return Err(pending);
			}
			if tokio::time::timeout(deadline - now, notified).await.is_err() {
				return Err(self.inner.unfinished.load(Ordering::SeqCst));
			}
		}
	}

	fn len(&self) -> usize {
		self.inner.items.lock().unwrap().len()
	}
}
