use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use log::{debug, warn};
use redis::AsyncCommands;
use reqwest::Client;

use crate::domain::health::HealthSnapshot;
use crate::domain::payment::ProcessorKind;
use crate::domain::router::ProcessorRouter;
use crate::infrastructure::processors::http_processor_client::ProcessorEndpoints;

/// Hard cap on one health request.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// One consistent observation of both processors. Replaced wholesale on
/// every probe so readers never see a half-updated pair.
#[derive(Debug, Clone, Copy)]
pub struct HealthBoard {
	pub default:  HealthSnapshot,
	pub fallback: HealthSnapshot,
}

impl HealthBoard {
	fn unknown() -> Self {
		Self {
			default:  HealthSnapshot::unknown(),
			fallback: HealthSnapshot::unknown(),
		}
	}
}

/// Probes the processors' health endpoints and keeps the latest snapshot
/// board readable without locks. The board is authoritative; the cache
/// mirror exists only so operators can peek at it.
#[derive(Clone)]
pub struct HealthMonitor {
	board:       Arc<ArcSwap<HealthBoard>>,
	endpoints:   ProcessorEndpoints,
	http_client: Client,
	cache:       Option<redis::Client>,
}

impl HealthMonitor {
	pub fn new(
		endpoints: ProcessorEndpoints,
		http_client: Client,
		cache: Option<redis::Client>,
	) -> Self {
		Self {
			board: Arc::new(ArcSwap::from_pointee(HealthBoard::unknown())),
			endpoints,
			http_client,
			cache,
		}
	}

	/// Probe both processors once and publish the refreshed board.
	pub async fn probe_once(&self) {
		for processor in [ProcessorKind::Default, ProcessorKind::Fallback] {
			let snapshot = self.probe(processor).await;
			self.apply(processor, snapshot);
			self.mirror(processor, &snapshot).await;
		}
	}

	async fn probe(&self, processor: ProcessorKind) -> HealthSnapshot {
		let url = format!(
			"{}/payments/service-health",
			self.endpoints.base_url(processor)
		);

		match self
			.http_client
			.get(&url)
			.timeout(PROBE_TIMEOUT)
			.send()
			.await
		{
			Ok(response) if response.status().is_success() => {
				match response.json::<HealthSnapshot>().await {
					Ok(snapshot) => snapshot,
					Err(e) => {
						warn!(
							"unreadable health response from {processor}: {e}"
						);
						HealthSnapshot::unknown()
					}
				}
			}
			Ok(response) => {
				warn!(
					"health probe for {processor} answered {}",
					response.status()
				);
				HealthSnapshot::unknown()
			}
			Err(e) => {
				warn!("health probe for {processor} failed: {e}");
				HealthSnapshot::unknown()
			}
		}
	}

	fn apply(&self, processor: ProcessorKind, snapshot: HealthSnapshot) {
		let current = self.board.load();
		let next = match processor {
			ProcessorKind::Default => HealthBoard {
				default:  snapshot,
				fallback: current.fallback,
			},
			ProcessorKind::Fallback => HealthBoard {
				default:  current.default,
				fallback: snapshot,
			},
		};
		self.board.store(Arc::new(next));
	}

	/// Write-through mirror for observability. Never read back; failures
	/// must not disturb routing.
	async fn mirror(&self, processor: ProcessorKind, snapshot: &HealthSnapshot) {
		let Some(cache) = &self.cache else {
			return;
		};

		let key = match processor {
			ProcessorKind::Default => "health_default",
			ProcessorKind::Fallback => "health_fallback",
		};
		let payload = match serde_json::to_string(snapshot) {
			Ok(payload) => payload,
			Err(e) => {
				debug!("failed to encode health snapshot for {processor}: {e}");
				return;
			}
		};

		match cache.get_multiplexed_async_connection().await {
			Ok(mut con) => {
				if let Err(e) = con.set::<_, _, ()>(key, payload).await {
					debug!("failed to mirror {key}: {e}");
				}
			}
			Err(e) => debug!("health mirror unavailable: {e}"),
		}
	}
}

impl ProcessorRouter for HealthMonitor {
	fn choose_best_processor(&self) -> ProcessorKind {
		let board = self.board.load();

		if !board.default.failing &&
			(board.fallback.failing ||
				board.default.min_response_time <=
					board.fallback.min_response_time)
		{
			ProcessorKind::Default
		} else if !board.fallback.failing {
			ProcessorKind::Fallback
		} else {
			// Both look dead; retry optimistically through the cheap one.
			ProcessorKind::Default
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn monitor() -> HealthMonitor {
		let endpoints = ProcessorEndpoints::new(
			"http://default:8080".to_string(),
			"http://fallback:8080".to_string(),
		);
		HealthMonitor::new(endpoints, Client::new(), None)
	}

	fn healthy(min_response_time: f64) -> HealthSnapshot {
		HealthSnapshot {
			failing: false,
			min_response_time,
		}
	}

	#[test]
	fn test_unprobed_monitor_still_routes_to_default() {
		assert_eq!(
			monitor().choose_best_processor(),
			ProcessorKind::Default
		);
	}

	#[test]
	fn test_faster_default_wins_over_healthy_fallback() {
		let monitor = monitor();
		monitor.apply(ProcessorKind::Default, healthy(10.0));
		monitor.apply(ProcessorKind::Fallback, healthy(20.0));

		assert_eq!(monitor.choose_best_processor(), ProcessorKind::Default);
	}

	#[test]
	fn test_equal_latency_prefers_default() {
		let monitor = monitor();
		monitor.apply(ProcessorKind::Default, healthy(15.0));
		monitor.apply(ProcessorKind::Fallback, healthy(15.0));

		assert_eq!(monitor.choose_best_processor(), ProcessorKind::Default);
	}

	#[test]
	fn test_slower_default_loses_to_fallback() {
		let monitor = monitor();
		monitor.apply(ProcessorKind::Default, healthy(80.0));
		monitor.apply(ProcessorKind::Fallback, healthy(20.0));

		assert_eq!(monitor.choose_best_processor(), ProcessorKind::Fallback);
	}

	#[test]
	fn test_failing_default_routes_to_fallback() {
		let monitor = monitor();
		monitor.apply(ProcessorKind::Default, HealthSnapshot::unknown());
		monitor.apply(ProcessorKind::Fallback, healthy(20.0));

		assert_eq!(monitor.choose_best_processor(), ProcessorKind::Fallback);
	}

	#[test]
	fn test_both_failing_falls_back_to_default() {
		let monitor = monitor();
		monitor.apply(ProcessorKind::Default, HealthSnapshot::unknown());
		monitor.apply(ProcessorKind::Fallback, HealthSnapshot::unknown());

		assert_eq!(monitor.choose_best_processor(), ProcessorKind::Default);
	}

	#[test]
	fn test_apply_replaces_only_one_side_of_the_board() {
		let monitor = monitor();
		monitor.apply(ProcessorKind::Default, healthy(10.0));
		monitor.apply(ProcessorKind::Fallback, healthy(20.0));
		monitor.apply(ProcessorKind::Default, HealthSnapshot::unknown());

		let board = monitor.board.load();
		assert!(board.default.failing);
		assert!(!board.fallback.failing);
		assert_eq!(board.fallback.min_response_time, 20.0);
	}
}
