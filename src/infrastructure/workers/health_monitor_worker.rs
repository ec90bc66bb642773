use std::time::Duration;

use log::info;
use tokio::time::sleep;

use crate::infrastructure::health::monitor::HealthMonitor;

/// Background probe loop feeding the health monitor's snapshot board.
pub async fn health_monitor_worker(
	monitor: HealthMonitor,
	probe_interval: Duration,
) {
	info!("probing processor health every {probe_interval:?}");

	loop {
		monitor.probe_once().await;
		sleep(probe_interval).await;
	}
}
