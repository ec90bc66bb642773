pub mod postgres_payment_repository;
