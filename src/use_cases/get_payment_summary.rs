use std::time::Duration;

use log::warn;
use time::OffsetDateTime;
use tokio::time::sleep;

use crate::domain::payment::{Payment, ProcessorKind};
use crate::domain::queue::Queue;
use crate::domain::repository::PaymentRepository;
use crate::infrastructure::buffer::write_buffer::WriteBuffer;
use crate::use_cases::dto::{
	GetPaymentSummaryQuery, PaymentSummaryResult, PaymentsSummaryResponse,
};

/// Cap on waiting for the pipeline to drain before reading storage.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

/// Grace period for storage writes issued by the flush to commit.
const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// The summary coordinator: drain the ingress queue, flush the write
/// buffer, then aggregate what storage holds. A drain timeout degrades to
/// reporting whatever is already persisted.
#[derive(Clone)]
pub struct GetPaymentSummaryUseCase<Q, P>
where
	Q: Queue<Payment>,
	P: PaymentRepository,
{
	payment_queue: Q,
	buffer:        WriteBuffer<P>,
	payment_repo:  P,
}

impl<Q, P> GetPaymentSummaryUseCase<Q, P>
where
	Q: Queue<Payment>,
	P: PaymentRepository,
{
	pub fn new(payment_queue: Q, buffer: WriteBuffer<P>, payment_repo: P) -> Self {
		Self {
			payment_queue,
			buffer,
			payment_repo,
		}
	}

	pub async fn execute(
		&self,
		query: GetPaymentSummaryQuery,
	) -> Result<PaymentsSummaryResponse, Box<dyn std::error::Error + Send>> {
		if let Err(pending) = self.payment_queue.join(DRAIN_TIMEOUT).await {
			warn!(
				"summary drain timed out with {pending} payments still in \
				 flight; the report may under-count"
			);
		}

		self.buffer.force_flush().await;
		sleep(SETTLE_DELAY).await;

		let payments = self.payment_repo.get_all().await?;
		let to = query.to.unwrap_or_else(OffsetDateTime::now_utc);

		let mut default_summary = PaymentSummaryResult::default();
		let mut fallback_summary = PaymentSummaryResult::default();
		for payment in payments {
			if let Some(from) = query.from &&
				payment.requested_at < from
			{
				continue;
			}
			if payment.requested_at > to {
				continue;
			}

			let side = match payment.processor {
				ProcessorKind::Default => &mut default_summary,
				ProcessorKind::Fallback => &mut fallback_summary,
			};
			side.total_requests += 1;
			side.total_amount += payment.amount;
		}

		Ok(PaymentsSummaryResponse {
			default:  default_summary,
			fallback: fallback_summary,
		})
	}
}
