//! Server-side user management for local contexts.
//!
//! Edits the `[[users]]` table of the context's server config file.
//! The server reads users at startup, so changes need a restart.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tradedesk_identity::{hash_password, verify_password};

use crate::config::ClientConfig;

/// Server config file of the named (or current) context.
fn server_config_path(context_name: Option<&str>, client_config_path: &Path) -> Result<PathBuf> {
    let config = ClientConfig::load(client_config_path)?;
    Ok(config.resolve(context_name)?.local_config()?.to_path_buf())
}

fn load_toml(path: &Path) -> Result<toml::Value> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    Ok(toml::from_str(&text)?)
}

fn users_mut(doc: &mut toml::Value) -> Result<&mut Vec<toml::Value>> {
    let table = doc
        .as_table_mut()
        .ok_or_else(|| anyhow::anyhow!("Server config is not a table"))?;
    table
        .entry("users")
        .or_insert_with(|| toml::Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| anyhow::anyhow!("`users` in server config is not an array"))
}

fn email_of(user: &toml::Value) -> &str {
    user.get("email").and_then(|v| v.as_str()).unwrap_or_default()
}

/// Add a user to the server config.
pub fn add(
    context_name: Option<&str>,
    email: &str,
    name: &str,
    password: &str,
    client_config_path: &Path,
) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        anyhow::bail!("Email cannot be empty.");
    }
    let path = server_config_path(context_name, client_config_path)?;
    let mut doc = load_toml(&path)?;
    let users = users_mut(&mut doc)?;

    if users.iter().any(|u| email_of(u).eq_ignore_ascii_case(email)) {
        anyhow::bail!("User {} already exists.", email);
    }

    let mut entry = toml::map::Map::new();
    entry.insert("email".into(), toml::Value::String(email.to_string()));
    entry.insert("name".into(), toml::Value::String(name.to_string()));
    entry.insert("password_hash".into(), toml::Value::String(hash_password(password)?));
    users.push(toml::Value::Table(entry));

    std::fs::write(&path, toml::to_string_pretty(&doc)?)?;
    println!("User {} added to {}.", email, path.display());
    println!("NOTE: Restart tradedeskd for the change to take effect.");
    Ok(())
}

/// Change a user's password after checking the current one.
pub fn passwd(
    context_name: Option<&str>,
    email: &str,
    old_password: &str,
    new_password: &str,
    client_config_path: &Path,
) -> Result<()> {
    let path = server_config_path(context_name, client_config_path)?;
    let mut doc = load_toml(&path)?;
    let users = users_mut(&mut doc)?;

    let user = users
        .iter_mut()
        .find(|u| email_of(u).eq_ignore_ascii_case(email.trim()))
        .ok_or_else(|| anyhow::anyhow!("User {} not found.", email))?;

    let current_hash = user
        .get("password_hash")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if !verify_password(old_password, current_hash) {
        anyhow::bail!("Current password is incorrect.");
    }

    let table = user
        .as_table_mut()
        .ok_or_else(|| anyhow::anyhow!("User entry is not a table"))?;
    table.insert(
        "password_hash".to_string(),
        toml::Value::String(hash_password(new_password)?),
    );

    std::fs::write(&path, toml::to_string_pretty(&doc)?)?;
    println!("Password updated for {}.", email.trim());
    println!("NOTE: Restart tradedeskd for the change to take effect.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Context;
    use tradedesk_identity::UserEntry;

    fn setup(dir: &Path) -> PathBuf {
        let server = dir.join("shop.toml");
        let owner = UserEntry {
            email: "owner@shop.in".into(),
            name: "Owner".into(),
            password_hash: hash_password("first").unwrap(),
        };
        let text = crate::commands::context::render_server_config("/tmp/shop", owner).unwrap();
        std::fs::write(&server, text).unwrap();

        let client = dir.join("client.toml");
        let mut config = ClientConfig::default();
        config.add(Context {
            name: "shop".into(),
            config_path: server.to_string_lossy().to_string(),
            ..Default::default()
        });
        config.save(&client).unwrap();
        client
    }

    fn users(dir: &Path) -> Vec<toml::Value> {
        let mut doc = load_toml(&dir.join("shop.toml")).unwrap();
        users_mut(&mut doc).unwrap().clone()
    }

    #[test]
    fn add_appends_unique_users() {
        let dir = tempfile::tempdir().unwrap();
        let client = setup(dir.path());

        add(None, "clerk@shop.in", "Clerk", "pw", &client).unwrap();
        let err = add(Some("shop"), "CLERK@shop.in", "Again", "pw", &client).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let users = users(dir.path());
        assert_eq!(users.len(), 2);
        assert_eq!(email_of(&users[1]), "clerk@shop.in");
        let hash = users[1]["password_hash"].as_str().unwrap();
        assert!(verify_password("pw", hash));
    }

    #[test]
    fn passwd_checks_the_old_password() {
        let dir = tempfile::tempdir().unwrap();
        let client = setup(dir.path());

        assert!(passwd(None, "owner@shop.in", "wrong", "second", &client).is_err());
        assert!(passwd(None, "nobody@shop.in", "first", "second", &client).is_err());
        passwd(None, "owner@shop.in", "first", "second", &client).unwrap();

        let users = users(dir.path());
        let hash = users[0]["password_hash"].as_str().unwrap();
        assert!(verify_password("second", hash));
        assert!(!verify_password("first", hash));
    }

    #[test]
    fn remote_contexts_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let client = dir.path().join("client.toml");
        let mut config = ClientConfig::default();
        config.add(Context {
            name: "remote".into(),
            server: "http://x".into(),
            ..Default::default()
        });
        config.save(&client).unwrap();

        let err = add(Some("remote"), "a@b.in", "A", "pw", &client).unwrap_err();
        assert!(err.to_string().contains("remote server"));
    }
}
