use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
	pub correlation_id: Uuid,
	pub amount:         f64,
	#[serde(
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none",
		default
	)]
	pub requested_at:   Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MessageResponse {
	pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PaymentsSummaryFilter {
	#[serde(with = "time::serde::rfc3339::option", default)]
	pub from: Option<OffsetDateTime>,
	#[serde(with = "time::serde::rfc3339::option", default)]
	pub to:   Option<OffsetDateTime>,
}
