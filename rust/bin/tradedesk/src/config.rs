//! Saved contexts.
//!
//! A context names one tradedeskd deployment: the URL the CLI talks to,
//! the token from the last `tradedesk login`, and for deployments created
//! on this machine the server config file that holds its users. They live
//! in `~/.tradedesk/config.toml`, or wherever `TRADEDESK_CONFIG` points.
//!
//! ```toml
//! current-context = "shop"
//!
//! [[contexts]]
//! name = "shop"
//! config_path = "/etc/tradedesk/shop.toml"
//! server = "http://localhost:8080"
//! token = "eyJ..."
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    pub name: String,

    /// Server config file, set only for contexts created locally.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub config_path: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// Bearer token; empty when logged out.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
}

impl Context {
    pub fn server_url(&self) -> Result<&str> {
        if self.server.is_empty() {
            anyhow::bail!(
                "No server URL set for context \"{}\". Run `tradedesk context set {} --server <url>`.",
                self.name,
                self.name
            );
        }
        Ok(&self.server)
    }

    /// Server config file of a context created on this machine.
    pub fn local_config(&self) -> Result<&Path> {
        if self.config_path.is_empty() {
            anyhow::bail!(
                "Context \"{}\" has no local config_path set. Cannot manage users of a remote server.",
                self.name
            );
        }
        Ok(Path::new(&self.config_path))
    }

    pub fn logged_in(&self) -> bool {
        !self.token.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl ClientConfig {
    /// `$TRADEDESK_CONFIG`, else `~/.tradedesk/config.toml`.
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os("TRADEDESK_CONFIG") {
            return PathBuf::from(path);
        }
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .unwrap_or_else(|| ".".into());
        PathBuf::from(home).join(".tradedesk").join("config.toml")
    }

    /// A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(anyhow::anyhow!("failed to read {}: {}", path.display(), e)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn current(&self) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == self.current_context)
    }

    pub fn require_current(&self) -> Result<&Context> {
        self.current().ok_or_else(|| {
            anyhow::anyhow!("No current context. Run `tradedesk context use <name>`.")
        })
    }

    pub fn find(&self, name: &str) -> Result<&Context> {
        self.contexts
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| anyhow::anyhow!("Context \"{}\" not found.", name))
    }

    pub fn find_mut(&mut self, name: &str) -> Result<&mut Context> {
        self.contexts
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| anyhow::anyhow!("Context \"{}\" not found.", name))
    }

    /// The named context, or the current one when no name is given.
    pub fn resolve(&self, name: Option<&str>) -> Result<&Context> {
        match name {
            Some(name) => self.find(name),
            None => self.require_current(),
        }
    }

    /// Add or replace a context. The first context becomes current.
    pub fn add(&mut self, ctx: Context) {
        if self.current_context.is_empty() {
            self.current_context = ctx.name.clone();
        }
        match self.contexts.iter_mut().find(|c| c.name == ctx.name) {
            Some(existing) => *existing = ctx,
            None => self.contexts.push(ctx),
        }
    }

    pub fn select(&mut self, name: &str) -> Result<()> {
        self.find(name).map_err(|_| {
            anyhow::anyhow!(
                "Context \"{}\" not found. Run `tradedesk context list` to see available contexts.",
                name
            )
        })?;
        self.current_context = name.to_string();
        Ok(())
    }

    /// Forget a context. Removing the current one leaves none selected.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        self.find(name)?;
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context.clear();
        }
        Ok(())
    }

    /// Replace the token of a context; an empty token logs it out.
    pub fn store_token(&mut self, name: &str, token: String) -> Result<()> {
        self.find_mut(name)?.token = token;
        Ok(())
    }
}
