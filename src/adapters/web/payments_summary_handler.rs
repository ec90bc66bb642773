use actix_web::{HttpResponse, Responder, ResponseError, get, web};
use log::error;

use crate::adapters::web::IngressQueue;
use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::PaymentsSummaryFilter;
use crate::infrastructure::persistence::postgres_payment_repository::PostgresPaymentRepository;
use crate::use_cases::dto::GetPaymentSummaryQuery;
use crate::use_cases::get_payment_summary::GetPaymentSummaryUseCase;

#[get("/payments-summary")]
pub async fn payments_summary(
	filter: web::Query<PaymentsSummaryFilter>,
	get_payment_summary_use_case: web::Data<
		GetPaymentSummaryUseCase<IngressQueue, PostgresPaymentRepository>,
	>,
) -> impl Responder {
	let query = GetPaymentSummaryQuery {
		from: filter.from,
		to:   filter.to,
	};

	match get_payment_summary_use_case.execute(query).await {
		Ok(summary) => HttpResponse::Ok().json(summary),
		Err(e) => {
			error!("failed to compute payment summary: {e}");
			ApiError::Internal.error_response()
		}
	}
}
