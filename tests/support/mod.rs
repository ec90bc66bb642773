#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use payment_gateway::domain::payment::{
	Payment, ProcessedPayment, ProcessorKind,
};
use payment_gateway::domain::processor_client::ProcessorClient;
use payment_gateway::domain::repository::PaymentRepository;
use payment_gateway::domain::router::ProcessorRouter;
use time::OffsetDateTime;
use uuid::Uuid;

pub fn sample_payment(amount: f64) -> Payment {
	Payment {
		correlation_id: Uuid::new_v4(),
		amount,
		requested_at: OffsetDateTime::now_utc(),
	}
}

pub fn processed(
	processor: ProcessorKind,
	amount: f64,
	requested_at: OffsetDateTime,
) -> ProcessedPayment {
	ProcessedPayment {
		correlation_id: Uuid::new_v4(),
		processor,
		amount,
		requested_at,
	}
}

/// In-memory stand-in for the payment store. Mirrors the real store's
/// contract: inserts are idempotent on the correlation id.
#[derive(Clone, Default)]
pub struct RecordingRepository {
	saved:      Arc<Mutex<Vec<ProcessedPayment>>>,
	fail_saves: Arc<Mutex<usize>>,
}

impl RecordingRepository {
	pub fn seeded(payments: Vec<ProcessedPayment>) -> Self {
		let repo = Self::default();
		*repo.saved.lock().unwrap() = payments;
		repo
	}

	pub fn fail_next_saves(&self, count: usize) {
		*self.fail_saves.lock().unwrap() = count;
	}

	pub fn saved(&self) -> Vec<ProcessedPayment> {
		self.saved.lock().unwrap().clone()
	}
}

#[async_trait]
impl PaymentRepository for RecordingRepository {
	async fn save_batch(
		&self,
		payments: &[ProcessedPayment],
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		{
			let mut fail_saves = self.fail_saves.lock().unwrap();
			if *fail_saves > 0 {
				*fail_saves -= 1;
				return Err(Box::new(std::io::Error::other(
					"storage unavailable",
				)));
			}
		}

		let mut saved = self.saved.lock().unwrap();
		for payment in payments {
			if saved
				.iter()
				.any(|p| p.correlation_id == payment.correlation_id)
			{
				continue;
			}
			saved.push(payment.clone());
		}
		Ok(())
	}

	async fn save(
		&self,
		payment: &ProcessedPayment,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		self.save_batch(std::slice::from_ref(payment)).await
	}

	async fn get_all(
		&self,
	) -> Result<Vec<ProcessedPayment>, Box<dyn std::error::Error + Send>> {
		Ok(self.saved())
	}

	async fn purge(&self) -> Result<u64, Box<dyn std::error::Error + Send>> {
		let mut saved = self.saved.lock().unwrap();
		let count = saved.len() as u64;
		saved.clear();
		Ok(count)
	}
}

/// Router with a fixed answer, for driving the dispatcher directly.
#[derive(Clone)]
pub struct StubRouter {
	pub preferred: ProcessorKind,
}

impl ProcessorRouter for StubRouter {
	fn choose_best_processor(&self) -> ProcessorKind {
		self.preferred
	}
}

/// Upstream processors scripted to accept or refuse, recording every
/// submission they see.
#[derive(Clone)]
pub struct ScriptedProcessorClient {
	accept:      Arc<Mutex<HashMap<ProcessorKind, bool>>>,
	submissions: Arc<Mutex<Vec<(ProcessorKind, Payment)>>>,
}

impl ScriptedProcessorClient {
	fn with_accepts(default: bool, fallback: bool) -> Self {
		let mut accept = HashMap::new();
		accept.insert(ProcessorKind::Default, default);
		accept.insert(ProcessorKind::Fallback, fallback);
		Self {
			accept:      Arc::new(Mutex::new(accept)),
			submissions: Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub fn accepting_all() -> Self {
		Self::with_accepts(true, true)
	}

	pub fn rejecting_all() -> Self {
		Self::with_accepts(false, false)
	}

	pub fn accepting_only(processor: ProcessorKind) -> Self {
		match processor {
			ProcessorKind::Default => Self::with_accepts(true, false),
			ProcessorKind::Fallback => Self::with_accepts(false, true),
		}
	}

	pub fn set_accept(&self, processor: ProcessorKind, accept: bool) {
		self.accept.lock().unwrap().insert(processor, accept);
	}

	pub fn submissions(&self) -> Vec<(ProcessorKind, Payment)> {
		self.submissions.lock().unwrap().clone()
	}
}

#[async_trait]
impl ProcessorClient for ScriptedProcessorClient {
	async fn submit(
		&self,
		processor: ProcessorKind,
		payment: &Payment,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		self.submissions
			.lock()
			.unwrap()
			.push((processor, payment.clone()));

		if self.accept.lock().unwrap()[&processor] {
			Ok(())
		} else {
			Err(Box::new(std::io::Error::other("payment refused")))
		}
	}
}
