use std::sync::Arc;
use std::time::Duration;

use log::{debug, error};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::payment::ProcessedPayment;
use crate::domain::repository::PaymentRepository;

struct BufferState {
	items:      Vec<ProcessedPayment>,
	last_flush: Instant,
}

/// Batches processed payments between the dispatcher and the store. A flush
/// is triggered from `add` once the batch size or the age threshold is
/// crossed, and unconditionally by `force_flush`. The storage write happens
/// outside the buffer lock; `flush_gate` keeps at most one flush in flight.
/// A failed slice goes back to the buffer head so a later flush retries the
/// oldest payments first.
pub struct WriteBuffer<R: PaymentRepository> {
	repo:           R,
	batch_size:     usize,
	flush_interval: Duration,
	state:          Arc<Mutex<BufferState>>,
	flush_gate:     Arc<Mutex<()>>,
}

impl<R: PaymentRepository + Clone> Clone for WriteBuffer<R> {
	fn clone(&self) -> Self {
		Self {
			repo:           self.repo.clone(),
			batch_size:     self.batch_size,
			flush_interval: self.flush_interval,
			state:          Arc::clone(&self.state),
			flush_gate:     Arc::clone(&self.flush_gate),
		}
	}
}

impl<R: PaymentRepository> WriteBuffer<R> {
	pub fn new(repo: R, batch_size: usize, flush_interval: Duration) -> Self {
		Self {
			repo,
			batch_size,
			flush_interval,
			state: Arc::new(Mutex::new(BufferState {
				items:      Vec::new(),
				last_flush: Instant::now(),
			})),
			flush_gate: Arc::new(Mutex::new(())),
		}
	}

	pub async fn add(&self, payment: ProcessedPayment) {
		let batch = {
			let mut state = self.state.lock().await;
			state.items.push(payment);

			let should_flush = state.items.len() >= self.batch_size ||
				state.last_flush.elapsed() > self.flush_interval;
			if should_flush {
				state.last_flush = Instant::now();
				Some(std::mem::take(&mut state.items))
			} else {
				None
			}
		};

		if let Some(batch) = batch {
			self.flush(batch).await;
		}
	}

	/// Empty the buffer regardless of thresholds. Used by shutdown and by
	/// the summary coordinator's drain barrier.
	pub async fn force_flush(&self) {
		let batch = {
			let mut state = self.state.lock().await;
			state.last_flush = Instant::now();
			std::mem::take(&mut state.items)
		};
		self.flush(batch).await;
	}

	async fn flush(&self, batch: Vec<ProcessedPayment>) {
		if batch.is_empty() {
			return;
		}

		let _gate = self.flush_gate.lock().await;
		let count = batch.len();
		let result = if count == 1 {
			self.repo.save(&batch[0]).await
		} else {
			self.repo.save_batch(&batch).await
		};
		match result {
			Ok(()) => debug!("flushed {count} payments to storage"),
			Err(e) => {
				error!("failed to flush {count} payments: {e}");
				// Put the slice back in front of anything added meanwhile.
				let mut state = self.state.lock().await;
				let newer = std::mem::take(&mut state.items);
				state.items = batch;
				state.items.extend(newer);
			}
		}
	}

	pub async fn len(&self) -> usize {
		self.state.lock().await.items.len()
	}
}
