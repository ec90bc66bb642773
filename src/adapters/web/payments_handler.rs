use actix_web::{HttpResponse, Responder, ResponseError, post, web};
use log::info;

use crate::adapters::web::IngressQueue;
use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::{MessageResponse, PaymentRequest};
use crate::use_cases::create_payment::CreatePaymentUseCase;
use crate::use_cases::dto::CreatePaymentCommand;

#[post("/payments")]
pub async fn payments(
	payload: web::Json<PaymentRequest>,
	create_payment_use_case: web::Data<CreatePaymentUseCase<IngressQueue>>,
) -> impl Responder {
	let command = CreatePaymentCommand {
		correlation_id: payload.correlation_id,
		amount:         payload.amount,
		requested_at:   payload.requested_at,
	};

	match create_payment_use_case.execute(command) {
		Ok(()) => {
			info!("payment {} accepted and queued", payload.correlation_id);
			HttpResponse::Ok().json(MessageResponse {
				message: "Payment queued".to_string(),
			})
		}
		Err(_) => ApiError::IngressOverflow.error_response(),
	}
}
