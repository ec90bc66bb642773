pub mod errors;
pub mod payments_handler;
pub mod payments_purge_handler;
pub mod payments_summary_handler;
pub mod schema;

use crate::domain::payment::Payment;
use crate::infrastructure::queue::in_memory_queue::InMemoryQueue;

/// The concrete queue the HTTP layer feeds.
pub type IngressQueue = InMemoryQueue<Payment>;
