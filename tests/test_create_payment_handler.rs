use actix_web::{App, test, web};
use payment_gateway::adapters::web::IngressQueue;
use payment_gateway::adapters::web::payments_handler::payments;
use payment_gateway::domain::queue::Queue;
use payment_gateway::infrastructure::queue::in_memory_queue::InMemoryQueue;
use payment_gateway::use_cases::create_payment::CreatePaymentUseCase;
use serde_json::json;

#[actix_web::test]
async fn test_payments_endpoint_queues_and_acknowledges() {
	let queue: IngressQueue = InMemoryQueue::with_capacity(10);
	let app = test::init_service(
		App::new()
			.app_data(web::Data::new(CreatePaymentUseCase::new(queue.clone())))
			.service(payments),
	)
	.await;

	let req = test::TestRequest::post()
		.uri("/payments")
		.set_json(json!({
			"correlationId": "11111111-1111-1111-1111-111111111111",
			"amount": 100.0,
			"requestedAt": "2024-01-01T00:00:00Z"
		}))
		.to_request();
	let resp = test::call_service(&app, req).await;

	assert!(resp.status().is_success());
	let body: serde_json::Value = test::read_body_json(resp).await;
	assert_eq!(body["message"], "Payment queued");
	assert_eq!(queue.len(), 1);
}

#[actix_web::test]
async fn test_payments_endpoint_reports_overflow_strictly() {
	let queue: IngressQueue = InMemoryQueue::with_capacity(1);
	let app = test::init_service(
		App::new()
			.app_data(web::Data::new(CreatePaymentUseCase::new(queue.clone())))
			.service(payments),
	)
	.await;

	let accepted = test::call_service(
		&app,
		test::TestRequest::post()
			.uri("/payments")
			.set_json(json!({
				"correlationId": "11111111-1111-1111-1111-111111111111",
				"amount": 1.0
			}))
			.to_request(),
	)
	.await;
	assert!(accepted.status().is_success());

	let dropped = test::call_service(
		&app,
		test::TestRequest::post()
			.uri("/payments")
			.set_json(json!({
				"correlationId": "22222222-2222-2222-2222-222222222222",
				"amount": 2.0
			}))
			.to_request(),
	)
	.await;

	assert_eq!(dropped.status().as_u16(), 503);
	let body: serde_json::Value = test::read_body_json(dropped).await;
	assert!(body["error"].is_string());
	assert_eq!(queue.len(), 1);
}

#[actix_web::test]
async fn test_payments_endpoint_rejects_malformed_bodies() {
	let queue: IngressQueue = InMemoryQueue::with_capacity(10);
	let app = test::init_service(
		App::new()
			.app_data(web::Data::new(CreatePaymentUseCase::new(queue.clone())))
			.service(payments),
	)
	.await;

	let req = test::TestRequest::post()
		.uri("/payments")
		.set_json(json!({"correlationId": "not-a-uuid", "amount": 1.0}))
		.to_request();
	let resp = test::call_service(&app, req).await;

	assert!(resp.status().is_client_error());
	assert_eq!(queue.len(), 0);
}
