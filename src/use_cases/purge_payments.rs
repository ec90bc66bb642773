use std::error::Error;

use crate::domain::repository::PaymentRepository;

#[derive(Clone)]
pub struct PurgePaymentsUseCase<R: PaymentRepository> {
	repository: R,
}

impl<R: PaymentRepository> PurgePaymentsUseCase<R> {
	pub fn new(repository: R) -> Self {
		Self { repository }
	}

	/// Returns how many payments were deleted.
	pub async fn execute(&self) -> Result<u64, Box<dyn Error + Send>> {
		self.repository.purge().await
	}
}
