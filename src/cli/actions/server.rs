use crate::{
    api::{self, ServerState},
    session::SessionConfig,
    storage::postgres::PgStore,
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub client_dir: PathBuf,
    pub session_max_age_ms: u64,
    pub cookie_secure: bool,
}

impl Args {
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new()
            .with_max_age_ms(self.session_max_age_ms)
            .with_cookie_secure(self.cookie_secure)
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    if !args.client_dir.join("login.html").is_file() {
        warn!(
            "No login.html in {}, GET /login will answer 404",
            args.client_dir.display()
        );
    }

    let session_config = args.session_config();
    debug!("Session config: {:?}", session_config);

    let store = Arc::new(
        PgStore::connect(&args.dsn)
            .await
            .context("Could not open the task database")?,
    );

    let state = ServerState::new(session_config, store.clone(), store);

    api::new(args.port, &args.client_dir, state).await
}
