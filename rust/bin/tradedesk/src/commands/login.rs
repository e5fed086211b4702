//! Login / logout commands.

use std::path::Path;

use anyhow::Result;
use tradedesk_client::Session;

use crate::commands::connect;
use crate::config::ClientConfig;

/// Sign in to the current context's server and save the token.
pub async fn login(email: &str, password: &str, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;
    let ctx = config.require_current()?.clone();

    let session = Session::new(ctx.server_url()?);
    let user = session
        .sign_in(email.trim(), password)
        .await
        .map_err(|e| anyhow::anyhow!("Login failed: {}", e))?;
    let token = session
        .access_token()
        .await
        .ok_or_else(|| anyhow::anyhow!("No access token after sign-in"))?;

    config.store_token(&ctx.name, token)?;
    config.save(client_config_path)?;

    println!("Logged in as {} <{}>.", user.name, user.email);
    println!("Token saved to context \"{}\".", ctx.name);
    Ok(())
}

/// Clear the token from the current context.
pub fn logout(client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;

    let current_name = config.require_current()?.name.clone();
    config.store_token(&current_name, String::new())?;
    config.save(client_config_path)?;
    println!("Logged out from context \"{}\".", current_name);
    Ok(())
}

pub async fn whoami(client_config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;
    let ctx = config.require_current()?;
    let session = connect(ctx).await?;
    match session.current_user() {
        Some(user) => println!("{} <{}> on \"{}\"", user.name, user.email, ctx.name),
        None => println!("Not logged in."),
    }
    Ok(())
}

/// Check server health.
pub async fn status(client_config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;
    let ctx = config.require_current()?;
    let url = format!("{}/health", ctx.server_url()?);

    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => {
            let body: serde_json::Value = resp.json().await.unwrap_or_default();
            println!("Server: {} ({})", ctx.server, body["status"].as_str().unwrap_or("ok"));
        }
        Ok(resp) => println!("Server: {} (HTTP {})", ctx.server, resp.status()),
        Err(e) => println!("Server: {} unreachable: {}", ctx.server, e),
    }
    println!("Logged in: {}", if ctx.logged_in() { "yes" } else { "no" });
    Ok(())
}
