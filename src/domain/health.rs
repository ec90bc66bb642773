use serde::{Deserialize, Serialize};

/// Latest observation of one processor's health endpoint. An unknown or
/// probe-failed processor is indistinguishable from a failing one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
	pub failing:           bool,
	pub min_response_time: f64,
}

impl HealthSnapshot {
	pub fn unknown() -> Self {
		Self {
			failing:           true,
			min_response_time: f64::INFINITY,
		}
	}
}
