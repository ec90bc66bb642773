use actix_web::{HttpResponse, Responder, ResponseError, post, web};
use log::{error, info};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::MessageResponse;
use crate::infrastructure::persistence::postgres_payment_repository::PostgresPaymentRepository;
use crate::use_cases::purge_payments::PurgePaymentsUseCase;

#[post("/purge-payments")]
pub async fn payments_purge(
	purge_use_case: web::Data<PurgePaymentsUseCase<PostgresPaymentRepository>>,
) -> impl Responder {
	match purge_use_case.execute().await {
		Ok(count) => {
			info!("purged {count} stored payments");
			HttpResponse::Ok().json(MessageResponse {
				message: "Payments purged".to_string(),
			})
		}
		Err(e) => {
			error!("failed to purge payments: {e}");
			ApiError::Internal.error_response()
		}
	}
}
