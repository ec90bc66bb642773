pub mod http_processor_client;
