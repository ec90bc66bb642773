use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, error};
use derive_more::derive::{Display, Error};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorResponse {
	error: String,
}

#[derive(Debug, Display, Error)]
pub enum ApiError {
	#[display("payment queue is at capacity")]
	IngressOverflow,
	#[display("internal server error")]
	Internal,
}

impl error::ResponseError for ApiError {
	fn error_response(&self) -> HttpResponse {
		HttpResponse::build(self.status_code())
			.content_type(ContentType::json())
			.json(ErrorResponse {
				error: self.to_string(),
			})
	}

	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::IngressOverflow => StatusCode::SERVICE_UNAVAILABLE,
			ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

#[cfg(test)]
mod tests {
	use actix_web::error::ResponseError;

	use super::*;

	#[test]
	fn test_ingress_overflow_maps_to_service_unavailable() {
		let error = ApiError::IngressOverflow;

		assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);
		let resp = error.error_response();
		assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
	}

	#[test]
	fn test_internal_maps_to_internal_server_error() {
		let error = ApiError::Internal;

		assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
		let resp = error.error_response();
		assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}
}
