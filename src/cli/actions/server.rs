use crate::{api, cli::telemetry, store};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: SecretString,
    pub max_connections: u32,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database can't be opened or migrated, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!(
        port = args.port,
        max_connections = args.max_connections,
        "starting server"
    );

    let pool = store::connect(args.dsn.expose_secret(), args.max_connections).await?;

    let result = api::new(args.port, pool).await;

    telemetry::shutdown_tracer();

    result
}
