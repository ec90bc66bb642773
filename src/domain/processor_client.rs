use async_trait::async_trait;

use crate::domain::payment::{Payment, ProcessorKind};

/// Submits one payment to one upstream processor. `Ok` means the processor
/// acknowledged the payment; any rejection or transport problem is an error
/// for that attempt, and the caller owns fallback and retry.
#[async_trait]
pub trait ProcessorClient: Send + Sync + 'static {
	async fn submit(
		&self,
		processor: ProcessorKind,
		payment: &Payment,
	) -> Result<(), Box<dyn std::error::Error + Send>>;
}
