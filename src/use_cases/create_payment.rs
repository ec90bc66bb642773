use log::warn;
use time::OffsetDateTime;

use crate::domain::payment::Payment;
use crate::domain::queue::{Queue, QueueFull};
use crate::use_cases::dto::CreatePaymentCommand;

/// Ingress: stamp the payment and hand it to the processing queue. The
/// enqueue never blocks the endpoint; when the queue is full the payment is
/// dropped and the caller is told so.
#[derive(Clone)]
pub struct CreatePaymentUseCase<Q: Queue<Payment>> {
	payment_queue: Q,
}

impl<Q: Queue<Payment>> CreatePaymentUseCase<Q> {
	pub fn new(payment_queue: Q) -> Self {
		Self { payment_queue }
	}

	pub fn execute(
		&self,
		command: CreatePaymentCommand,
	) -> Result<(), QueueFull> {
		let payment = Payment {
			correlation_id: command.correlation_id,
			amount:         command.amount,
			requested_at:   command
				.requested_at
				.unwrap_or_else(OffsetDateTime::now_utc),
		};

		if let Err(full) = self.payment_queue.try_push(payment) {
			warn!(
				"ingress queue full, dropping payment {}",
				command.correlation_id
			);
			return Err(full);
		}
		Ok(())
	}
}
