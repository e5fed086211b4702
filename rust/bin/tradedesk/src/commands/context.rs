//! Context management commands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tradedesk_identity::{hash_password, UserEntry};

use crate::config::{ClientConfig, Context};

#[derive(Serialize)]
struct ServerToml<'a> {
    storage: Storage<'a>,
    jwt: Jwt,
    users: Vec<UserEntry>,
}

#[derive(Serialize)]
struct Storage<'a> {
    data_dir: &'a str,
}

#[derive(Serialize)]
struct Jwt {
    secret: String,
    expire_secs: u64,
}

/// 32 random bytes, hex encoded.
pub fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Render a fresh server config with one user.
pub fn render_server_config(data_dir: &str, owner: UserEntry) -> Result<String> {
    let doc = ServerToml {
        storage: Storage { data_dir },
        jwt: Jwt {
            secret: generate_secret(),
            expire_secs: 86400,
        },
        users: vec![owner],
    };
    Ok(toml::to_string_pretty(&doc)?)
}

/// Create a new context: write the server config and register it locally.
pub fn create(
    name: &str,
    config_dir: &str,
    data_dir: &str,
    email: &str,
    display_name: &str,
    password: &str,
    client_config_path: &Path,
) -> Result<()> {
    let owner = UserEntry {
        email: email.trim().to_string(),
        name: display_name.to_string(),
        password_hash: hash_password(password)?,
    };
    let server_config = render_server_config(data_dir, owner)?;

    let config_path = PathBuf::from(config_dir).join(format!("{}.toml", name));
    std::fs::create_dir_all(config_dir)?;
    std::fs::write(&config_path, &server_config)?;
    std::fs::create_dir_all(data_dir)?;

    let mut client_config = ClientConfig::load(client_config_path)?;
    client_config.add(Context {
        name: name.to_string(),
        config_path: config_path.to_string_lossy().to_string(),
        ..Default::default()
    });
    client_config.save(client_config_path)?;

    println!("Context \"{}\" created.", name);
    println!("  Config: {}", config_path.display());
    println!("  Data:   {}", data_dir);
    println!("Start the server with `tradedeskd -c {}`.", name);
    Ok(())
}

pub fn list(client_config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!("Run: tradedesk context create <name>");
        return Ok(());
    }

    println!("{:2} {:16} {:32} {:8} {}", "", "NAME", "SERVER", "LOGIN", "CONFIG");
    for ctx in &config.contexts {
        let marker = if ctx.name == config.current_context { "*" } else { " " };
        let server = if ctx.server.is_empty() { "-" } else { &ctx.server };
        let login = if ctx.logged_in() { "yes" } else { "no" };
        let config_path = if ctx.config_path.is_empty() { "-" } else { &ctx.config_path };
        println!("{:2} {:16} {:32} {:8} {}", marker, ctx.name, server, login, config_path);
    }
    Ok(())
}

pub fn use_context(name: &str, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;
    config.select(name)?;
    config.save(client_config_path)?;
    println!("Switched to context \"{}\".", name);
    Ok(())
}

/// Set properties on a context, creating it when `server` is given for a new name.
pub fn set(name: &str, server: Option<&str>, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;

    let exists = config.find(name).is_ok();
    match server.map(|s| s.trim_end_matches('/').to_string()) {
        Some(server) if exists => config.find_mut(name)?.server = server,
        Some(server) => config.add(Context {
            name: name.to_string(),
            server,
            ..Default::default()
        }),
        None => {
            config.find(name)?;
        }
    }

    config.save(client_config_path)?;
    println!("Context \"{}\" updated.", name);
    Ok(())
}

/// Delete a context. The server config file is left in place.
pub fn delete(name: &str, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;
    config.remove(name)?;
    config.save(client_config_path)?;
    println!("Context \"{}\" deleted.", name);
    Ok(())
}
