use crate::{api, api::GatewayConfig, cli::telemetry};
use anyhow::Result;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub config: GatewayConfig,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the HTTP client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        port = args.port,
        auth_backend_url = %args.config.auth_backend_url(),
        public_origin = %args.config.public_origin(),
        environment = %args.config.environment(),
        auth_timeout_seconds = args.config.auth_timeout().as_secs(),
        "Startup configuration"
    );

    let result = api::new(args.port, args.config).await;

    telemetry::shutdown_tracer();

    result
}
