use log::warn;

use crate::domain::payment::{Payment, ProcessedPayment, ProcessorKind};
use crate::domain::processor_client::ProcessorClient;
use crate::domain::repository::PaymentRepository;
use crate::domain::router::ProcessorRouter;
use crate::infrastructure::buffer::write_buffer::WriteBuffer;

/// The dispatcher: send one payment to the best-looking processor, fall
/// back to the other on any failure, and buffer the acknowledged result for
/// persistence. No internal retries; a payment that both processors refuse
/// is the worker's problem.
#[derive(Clone)]
pub struct ProcessPaymentUseCase<C, R, P>
where
	C: ProcessorClient,
	R: ProcessorRouter,
	P: PaymentRepository,
{
	processor_client: C,
	router:           R,
	buffer:           WriteBuffer<P>,
}

impl<C, R, P> ProcessPaymentUseCase<C, R, P>
where
	C: ProcessorClient,
	R: ProcessorRouter,
	P: PaymentRepository,
{
	pub fn new(processor_client: C, router: R, buffer: WriteBuffer<P>) -> Self {
		Self {
			processor_client,
			router,
			buffer,
		}
	}

	/// Returns which processor acknowledged the payment, or the last error
	/// when both refused it.
	pub async fn execute(
		&self,
		payment: Payment,
	) -> Result<ProcessorKind, Box<dyn std::error::Error + Send>> {
		let primary = self.router.choose_best_processor();

		match self.processor_client.submit(primary, &payment).await {
			Ok(()) => {
				self.buffer
					.add(ProcessedPayment::from_dispatch(payment, primary))
					.await;
				return Ok(primary);
			}
			Err(e) => warn!(
				"{primary} processor refused payment {}: {e}",
				payment.correlation_id
			),
		}

		let alternate = primary.other();
		match self.processor_client.submit(alternate, &payment).await {
			Ok(()) => {
				self.buffer
					.add(ProcessedPayment::from_dispatch(payment, alternate))
					.await;
				Ok(alternate)
			}
			Err(e) => Err(e),
		}
	}
}
