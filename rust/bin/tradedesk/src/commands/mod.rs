pub mod context;
pub mod login;
pub mod record;
pub mod user;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;
use tradedesk_client::Session;

use crate::config::Context;

/// Resume the session saved by `tradedesk login`.
pub async fn connect(ctx: &Context) -> Result<Arc<Session>> {
    let server = ctx.server_url()?;
    if !ctx.logged_in() {
        anyhow::bail!("Not logged in to context \"{}\". Run `tradedesk login`.", ctx.name);
    }
    debug!("restoring session for context {} on {}", ctx.name, server);
    let session = Arc::new(Session::new(server));
    session
        .restore(&ctx.token)
        .await
        .map_err(|e| anyhow::anyhow!("Session for \"{}\" is no longer valid ({}). Run `tradedesk login`.", ctx.name, e))?;
    Ok(session)
}
