use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::time::sleep;

use crate::domain::payment::Payment;
use crate::domain::processor_client::ProcessorClient;
use crate::domain::queue::Queue;
use crate::domain::repository::PaymentRepository;
use crate::domain::router::ProcessorRouter;
use crate::infrastructure::queue::retry_queue::{
	MAX_TOTAL_ATTEMPTS, RetryDisposition, RetryQueue,
};
use crate::use_cases::process_payment::ProcessPaymentUseCase;

/// How long a worker waits on an empty queue before looping.
const POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// One member of the worker pool: drain the ingress queue, dispatch, and
/// hand failures to the retry queue. The queue is acknowledged after every
/// outcome so the drain barrier in the summary path terminates.
pub async fn payment_worker<Q, C, R, P>(
	queue: Q,
	retry_queue: RetryQueue,
	dispatcher: ProcessPaymentUseCase<C, R, P>,
) where
	Q: Queue<Payment> + Clone,
	C: ProcessorClient + Clone,
	R: ProcessorRouter + Clone,
	P: PaymentRepository + Clone,
{
	loop {
		let Some(payment) = queue.pop(POLL_TIMEOUT).await else {
			continue;
		};

		match dispatcher.execute(payment.clone()).await {
			Ok(processor) => debug!(
				"payment {} processed by {processor}",
				payment.correlation_id
			),
			Err(e) => {
				warn!(
					"payment {} failed on both processors: {e}",
					payment.correlation_id
				);
				route_to_retry(&retry_queue, payment);
			}
		}

		queue.task_done();
	}
}

/// Single consumer of the retry queue. Applies a short fixed back-off
/// before each re-dispatch so a flapping processor gets a moment to
/// recover.
pub async fn retry_worker<C, R, P>(
	retry_queue: RetryQueue,
	dispatcher: ProcessPaymentUseCase<C, R, P>,
	backoff: Duration,
) where
	C: ProcessorClient + Clone,
	R: ProcessorRouter + Clone,
	P: PaymentRepository + Clone,
{
	loop {
		let Some(entry) = retry_queue.pop(POLL_TIMEOUT).await else {
			continue;
		};

		sleep(backoff).await;

		match dispatcher.execute(entry.payment.clone()).await {
			Ok(processor) => info!(
				"payment {} recovered on {processor} after retry {}",
				entry.payment.correlation_id, entry.attempt
			),
			Err(e) => {
				warn!(
					"retry {} for payment {} failed: {e}",
					entry.attempt, entry.payment.correlation_id
				);
				route_to_retry(&retry_queue, entry.payment);
			}
		}

		retry_queue.task_done();
	}
}

fn route_to_retry(retry_queue: &RetryQueue, payment: Payment) {
	let correlation_id = payment.correlation_id;
	match retry_queue.schedule(payment) {
		RetryDisposition::Scheduled(attempt) => {
			info!("payment {correlation_id} queued for retry {attempt}");
		}
		RetryDisposition::Exhausted => error!(
			"dropping payment {correlation_id} after {MAX_TOTAL_ATTEMPTS} \
			 failed attempts"
		),
		RetryDisposition::Overflow => {
			error!("retry queue full, dropping payment {correlation_id}");
		}
	}
}
