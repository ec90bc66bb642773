use crate::domain::payment::ProcessorKind;

/// Picks the processor a payment should be sent to first. Implementations
/// must answer from already-available state; a stale answer is acceptable,
/// blocking is not.
pub trait ProcessorRouter: Send + Sync + 'static {
	fn choose_best_processor(&self) -> ProcessorKind;
}
