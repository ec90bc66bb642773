use async_trait::async_trait;

use crate::domain::payment::ProcessedPayment;

/// Durable, idempotent storage for processed payments, keyed by correlation
/// id. Duplicate saves of the same correlation id must collapse to one row.
#[async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
	async fn save_batch(
		&self,
		payments: &[ProcessedPayment],
	) -> Result<(), Box<dyn std::error::Error + Send>>;

	async fn save(
		&self,
		payment: &ProcessedPayment,
	) -> Result<(), Box<dyn std::error::Error + Send>>;

	async fn get_all(
		&self,
	) -> Result<Vec<ProcessedPayment>, Box<dyn std::error::Error + Send>>;

	/// Delete every stored payment, returning how many rows went away.
	async fn purge(&self) -> Result<u64, Box<dyn std::error::Error + Send>>;
}
