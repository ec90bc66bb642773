use std::time::Duration;

use async_trait::async_trait;
use derive_more::derive::{Display, Error};
use reqwest::{Client, StatusCode};

use crate::domain::payment::{Payment, ProcessorKind};
use crate::domain::processor_client::ProcessorClient;

/// Worst case for one upstream payment POST.
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Base URLs of the two upstream processors.
#[derive(Debug, Clone)]
pub struct ProcessorEndpoints {
	default_url:  String,
	fallback_url: String,
}

impl ProcessorEndpoints {
	pub fn new(default_url: String, fallback_url: String) -> Self {
		Self {
			default_url:  default_url.trim_end_matches('/').to_string(),
			fallback_url: fallback_url.trim_end_matches('/').to_string(),
		}
	}

	pub fn base_url(&self, processor: ProcessorKind) -> &str {
		match processor {
			ProcessorKind::Default => &self.default_url,
			ProcessorKind::Fallback => &self.fallback_url,
		}
	}
}

#[derive(Debug, Display, Error)]
#[display("{processor} processor answered {status}")]
pub struct ProcessorRejected {
	pub processor: ProcessorKind,
	pub status:    u16,
}

/// Sends payments to the processors over the shared connection pool. A 200
/// is the only success; every other status or transport error is a failed
/// attempt for the caller to handle.
#[derive(Clone)]
pub struct HttpProcessorClient {
	client:    Client,
	endpoints: ProcessorEndpoints,
}

impl HttpProcessorClient {
	pub fn new(client: Client, endpoints: ProcessorEndpoints) -> Self {
		Self { client, endpoints }
	}
}

#[async_trait]
impl ProcessorClient for HttpProcessorClient {
	async fn submit(
		&self,
		processor: ProcessorKind,
		payment: &Payment,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		let url = format!("{}/payments", self.endpoints.base_url(processor));

		let response = self
			.client
			.post(url)
			.timeout(DISPATCH_TIMEOUT)
			.json(payment)
			.send()
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		if response.status() == StatusCode::OK {
			Ok(())
		} else {
			Err(Box::new(ProcessorRejected {
				processor,
				status: response.status().as_u16(),
			}))
		}
	}
}
