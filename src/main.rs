use std::sync::Arc;

use payment_gateway::infrastructure::config::settings::Config;
use payment_gateway::run;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
	let config =
		Arc::new(Config::load().expect("Failed to load configuration"));

	run(config).await
}
