use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Upstream processor a payment can be routed to. The default processor is
/// cheaper, the fallback more reliable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorKind {
	Default,
	Fallback,
}

impl ProcessorKind {
	pub fn other(self) -> Self {
		match self {
			ProcessorKind::Default => ProcessorKind::Fallback,
			ProcessorKind::Fallback => ProcessorKind::Default,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			ProcessorKind::Default => "default",
			ProcessorKind::Fallback => "fallback",
		}
	}

	pub fn from_tag(tag: &str) -> Option<Self> {
		match tag {
			"default" => Some(ProcessorKind::Default),
			"fallback" => Some(ProcessorKind::Fallback),
			_ => None,
		}
	}
}

impl fmt::Display for ProcessorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A payment accepted at ingress. The correlation id is the idempotency key
/// across retries; the serialized form is exactly what goes upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
	pub correlation_id: Uuid,
	pub amount:         f64,
	#[serde(with = "time::serde::rfc3339")]
	pub requested_at:   OffsetDateTime,
}

/// A payment some processor acknowledged with a 200. Immutable once created;
/// this is the record that reaches durable storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPayment {
	pub correlation_id: Uuid,
	pub processor:      ProcessorKind,
	pub amount:         f64,
	#[serde(with = "time::serde::rfc3339")]
	pub requested_at:   OffsetDateTime,
}

impl ProcessedPayment {
	pub fn from_dispatch(payment: Payment, processor: ProcessorKind) -> Self {
		Self {
			correlation_id: payment.correlation_id,
			processor,
			amount: payment.amount,
			requested_at: payment.requested_at,
		}
	}
}
