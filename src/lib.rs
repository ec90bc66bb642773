use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use log::{info, warn};
use reqwest::Client;

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod use_cases;

use crate::adapters::web::IngressQueue;
use crate::adapters::web::payments_handler::payments;
use crate::adapters::web::payments_purge_handler::payments_purge;
use crate::adapters::web::payments_summary_handler::payments_summary;
use crate::infrastructure::buffer::write_buffer::WriteBuffer;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::health::monitor::HealthMonitor;
use crate::infrastructure::persistence::postgres_payment_repository::PostgresPaymentRepository;
use crate::infrastructure::processors::http_processor_client::{
	HttpProcessorClient, ProcessorEndpoints,
};
use crate::infrastructure::queue::in_memory_queue::InMemoryQueue;
use crate::infrastructure::queue::retry_queue::RetryQueue;
use crate::infrastructure::workers::health_monitor_worker::health_monitor_worker;
use crate::infrastructure::workers::payment_worker::{
	payment_worker, retry_worker,
};
use crate::use_cases::create_payment::CreatePaymentUseCase;
use crate::use_cases::get_payment_summary::GetPaymentSummaryUseCase;
use crate::use_cases::process_payment::ProcessPaymentUseCase;
use crate::use_cases::purge_payments::PurgePaymentsUseCase;

/// Upper bound on idle upstream connections kept per processor host.
const KEEPALIVE_CONNECTIONS: usize = 10;

/// LRU capacity of the retry attempt map.
const RETRY_ATTEMPT_CAPACITY: usize = 16_384;

pub async fn run(config: Arc<Config>) -> std::io::Result<()> {
	env_logger::init();

	let repository = PostgresPaymentRepository::connect(&config.database_url)
		.expect("Invalid database configuration");
	repository
		.init_schema()
		.await
		.map_err(|e| std::io::Error::other(e.to_string()))?;

	let cache_client = match redis::Client::open(config.cache_url.clone()) {
		Ok(client) => Some(client),
		Err(e) => {
			warn!("health mirror disabled, invalid cache url: {e}");
			None
		}
	};

	let http_client = Client::builder()
		.pool_max_idle_per_host(KEEPALIVE_CONNECTIONS)
		.build()
		.expect("Failed to build HTTP client");

	let endpoints = ProcessorEndpoints::new(
		config.default_payment_processor.clone(),
		config.fallback_payment_processor.clone(),
	);

	info!("Starting health monitor...");
	let monitor = HealthMonitor::new(
		endpoints.clone(),
		http_client.clone(),
		cache_client,
	);
	let health_task = tokio::spawn(health_monitor_worker(
		monitor.clone(),
		Duration::from_secs(config.probe_interval_secs),
	));

	let ingress_queue: IngressQueue =
		InMemoryQueue::with_capacity(config.queue_capacity);
	let retry_queue =
		RetryQueue::new(config.retry_queue_capacity, RETRY_ATTEMPT_CAPACITY);
	let buffer = WriteBuffer::new(
		repository.clone(),
		config.batch_size,
		Duration::from_millis(config.flush_interval_ms),
	);

	let dispatcher = ProcessPaymentUseCase::new(
		HttpProcessorClient::new(http_client.clone(), endpoints),
		monitor.clone(),
		buffer.clone(),
	);

	info!("Starting {} payment workers...", config.worker_count);
	let mut worker_tasks = Vec::with_capacity(config.worker_count + 1);
	for _ in 0..config.worker_count {
		worker_tasks.push(tokio::spawn(payment_worker(
			ingress_queue.clone(),
			retry_queue.clone(),
			dispatcher.clone(),
		)));
	}
	worker_tasks.push(tokio::spawn(retry_worker(
		retry_queue.clone(),
		dispatcher.clone(),
		Duration::from_millis(config.retry_backoff_ms),
	)));

	let create_payment_use_case =
		CreatePaymentUseCase::new(ingress_queue.clone());
	let get_payment_summary_use_case = GetPaymentSummaryUseCase::new(
		ingress_queue.clone(),
		buffer.clone(),
		repository.clone(),
	);
	let purge_payments_use_case = PurgePaymentsUseCase::new(repository.clone());

	info!("Starting HTTP server on 0.0.0.0:9999...");
	HttpServer::new(move || {
		App::new()
			.app_data(web::Data::new(create_payment_use_case.clone()))
			.app_data(web::Data::new(get_payment_summary_use_case.clone()))
			.app_data(web::Data::new(purge_payments_use_case.clone()))
			.service(payments)
			.service(payments_summary)
			.service(payments_purge)
	})
	.keep_alive(Duration::from_secs(config.server_keepalive))
	.bind(("0.0.0.0", 9999))?
	.run()
	.await?;

	info!("Shutting down: flushing buffered payments...");
	buffer.force_flush().await;
	health_task.abort();
	for task in worker_tasks {
		task.abort();
	}

	Ok(())
}
