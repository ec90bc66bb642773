pub mod health;
pub mod payment;
pub mod processor_client;
pub mod queue;
pub mod repository;
pub mod router;
