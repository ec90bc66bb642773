use std::time::Duration;

use async_trait::async_trait;
use deadpool_postgres::{Pool, Runtime};
use log::{error, warn};
use time::OffsetDateTime;
use tokio::time::sleep;
use tokio_postgres::NoTls;
use uuid::Uuid;

use crate::domain::payment::{ProcessedPayment, ProcessorKind};
use crate::domain::repository::PaymentRepository;

const CREATE_TABLE: &str = r#"
	CREATE TABLE IF NOT EXISTS payments (
		"correlationId" UUID PRIMARY KEY,
		processor       TEXT NOT NULL,
		amount          DOUBLE PRECISION NOT NULL,
		"requestedAt"   TIMESTAMPTZ NOT NULL
	)
"#;

const INSERT_BATCH: &str = r#"
	INSERT INTO payments ("correlationId", processor, amount, "requestedAt")
	SELECT * FROM UNNEST($1::uuid[], $2::text[], $3::float8[], $4::timestamptz[])
	ON CONFLICT ("correlationId") DO NOTHING
"#;

const INSERT_ONE: &str = r#"
	INSERT INTO payments ("correlationId", processor, amount, "requestedAt")
	VALUES ($1, $2, $3, $4)
	ON CONFLICT ("correlationId") DO NOTHING
"#;

const SELECT_EXISTS: &str =
	r#"SELECT 1 FROM payments WHERE "correlationId" = $1"#;

const SELECT_ALL: &str =
	r#"SELECT "correlationId", processor, amount, "requestedAt" FROM payments"#;

const DELETE_ALL: &str = "DELETE FROM payments";

const BATCH_ATTEMPTS: u32 = 3;
const BATCH_RETRY_DELAY: Duration = Duration::from_millis(100);

fn boxed<E: std::error::Error + Send + 'static>(
	e: E,
) -> Box<dyn std::error::Error + Send> {
	Box::new(e)
}

/// Payment store over Postgres. The primary key on `correlationId` is what
/// makes every write path idempotent; all statements run through the
/// connection pool.
#[derive(Clone)]
pub struct PostgresPaymentRepository {
	pool: Pool,
}

impl PostgresPaymentRepository {
	pub fn new(pool: Pool) -> Self {
		Self { pool }
	}

	pub fn connect(
		database_url: &str,
	) -> Result<Self, Box<dyn std::error::Error + Send>> {
		let mut config = deadpool_postgres::Config::new();
		config.url = Some(database_url.to_string());
		let pool = config
			.create_pool(Some(Runtime::Tokio1), NoTls)
			.map_err(boxed)?;
		Ok(Self { pool })
	}

	/// Create the payments table on a fresh database.
	pub async fn init_schema(
		&self,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		let client = self.pool.get().await.map_err(boxed)?;
		client.batch_execute(CREATE_TABLE).await.map_err(boxed)
	}

	async fn insert_batch(
		&self,
		payments: &[ProcessedPayment],
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		let ids: Vec<Uuid> =
			payments.iter().map(|p| p.correlation_id).collect();
		let processors: Vec<&str> =
			payments.iter().map(|p| p.processor.as_str()).collect();
		let amounts: Vec<f64> = payments.iter().map(|p| p.amount).collect();
		let requested: Vec<OffsetDateTime> =
			payments.iter().map(|p| p.requested_at).collect();

		let client = self.pool.get().await.map_err(boxed)?;
		client
			.execute(INSERT_BATCH, &[&ids, &processors, &amounts, &requested])
			.await
			.map_err(boxed)?;
		Ok(())
	}

	async fn insert_row_checked(
		&self,
		payment: &ProcessedPayment,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		let client = self.pool.get().await.map_err(boxed)?;

		let existing = client
			.query_opt(SELECT_EXISTS, &[&payment.correlation_id])
			.await
			.map_err(boxed)?;
		if existing.is_some() {
			return Ok(());
		}

		client
			.execute(INSERT_ONE, &[
				&payment.correlation_id,
				&payment.processor.as_str(),
				&payment.amount,
				&payment.requested_at,
			])
			.await
			.map_err(boxed)?;
		Ok(())
	}
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
	async fn save_batch(
		&self,
		payments: &[ProcessedPayment],
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		if payments.is_empty() {
			return Ok(());
		}

		for attempt in 1..=BATCH_ATTEMPTS {
			match self.insert_batch(payments).await {
				Ok(()) => return Ok(()),
				Err(e) => {
					warn!(
						"batch insert of {} payments failed (attempt \
						 {attempt}/{BATCH_ATTEMPTS}): {e}",
						payments.len()
					);
					if attempt < BATCH_ATTEMPTS {
						sleep(BATCH_RETRY_DELAY * attempt).await;
					}
				}
			}
		}

		// The statement keeps failing; degrade to row-at-a-time inserts and
		// give up on the rows that still will not go in.
		let mut dead = 0usize;
		for payment in payments {
			if let Err(e) = self.insert_row_checked(payment).await {
				error!(
					"dropping payment {} after failed row insert: {e}",
					payment.correlation_id
				);
				dead += 1;
			}
		}
		if dead > 0 {
			error!("{dead} payments could not be persisted and were dropped");
		}
		Ok(())
	}

	async fn save(
		&self,
		payment: &ProcessedPayment,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		let client = self.pool.get().await.map_err(boxed)?;
		client
			.execute(INSERT_ONE, &[
				&payment.correlation_id,
				&payment.processor.as_str(),
				&payment.amount,
				&payment.requested_at,
			])
			.await
			.map_err(boxed)?;
		Ok(())
	}

	async fn get_all(
		&self,
	) -> Result<Vec<ProcessedPayment>, Box<dyn std::error::Error + Send>> {
		let rows = match self.pool.get().await {
			Ok(client) => match client.query(SELECT_ALL, &[]).await {
				Ok(rows) => rows,
				Err(e) => {
					error!("failed to read payments: {e}");
					return Ok(Vec::new());
				}
			},
			Err(e) => {
				error!("failed to get a storage connection: {e}");
				return Ok(Vec::new());
			}
		};

		let mut payments = Vec::with_capacity(rows.len());
		for row in rows {
			let tag: String = row.get(1);
			let Some(processor) = ProcessorKind::from_tag(&tag) else {
				warn!("skipping payment row with unknown processor '{tag}'");
				continue;
			};
			payments.push(ProcessedPayment {
				correlation_id: row.get(0),
				processor,
				amount: row.get(2),
				requested_at: row.get(3),
			});
		}
		Ok(payments)
	}

	async fn purge(&self) -> Result<u64, Box<dyn std::error::Error + Send>> {
		match self.pool.get().await {
			Ok(client) => match client.execute(DELETE_ALL, &[]).await {
				Ok(count) => Ok(count),
				Err(e) => {
					error!("failed to purge payments: {e}");
					Ok(0)
				}
			},
			Err(e) => {
				error!("failed to get a storage connection: {e}");
				Ok(0)
			}
		}
	}
}
