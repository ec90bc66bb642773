use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
	pub correlation_id: Uuid,
	pub amount:         f64,
	pub requested_at:   Option<OffsetDateTime>,
}

/// Optional reporting window; both endpoints are inclusive. A missing
/// `from` means "since forever", a missing `to` means "until now".
#[derive(Debug, Clone, Default)]
pub struct GetPaymentSummaryQuery {
	pub from: Option<OffsetDateTime>,
	pub to:   Option<OffsetDateTime>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummaryResult {
	pub total_requests: usize,
	pub total_amount:   f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsSummaryResponse {
	pub default:  PaymentSummaryResult,
	pub fallback: PaymentSummaryResult,
}
