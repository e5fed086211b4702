//! Server configuration, loaded from TOML.
//!
//! ```toml
//! [storage]
//! data_dir = "/var/lib/tradedesk/main"
//!
//! [jwt]
//! secret = "..."
//! expire_secs = 86400
//!
//! [[users]]
//! email = "owner@example.com"
//! name = "Owner"
//! password_hash = "$argon2id$..."
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tradedesk_identity::{IdentityConfig, UserEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expire_secs")]
    pub expire_secs: u64,
}

fn default_expire_secs() -> u64 {
    86400
}

impl ServerConfig {
    /// Resolve a context name or path to a config file.
    ///
    /// Anything containing `/` or ending in `.toml` is a path; otherwise
    /// it names `/etc/tradedesk/<name>.toml`.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.ends_with(".toml") {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from("/etc/tradedesk").join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn identity_config(&self) -> IdentityConfig {
        IdentityConfig {
            users: self.users.clone(),
            jwt_secret: self.jwt.secret.clone(),
            expire_secs: self.jwt.expire_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_context_name() {
        assert_eq!(
            ServerConfig::resolve_path("main"),
            PathBuf::from("/etc/tradedesk/main.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./dev.toml"),
            PathBuf::from("./dev.toml")
        );
        assert_eq!(ServerConfig::resolve_path("dev.toml"), PathBuf::from("dev.toml"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.toml");
        std::fs::write(
            &path,
            r#"
[storage]
data_dir = "/var/lib/tradedesk/main"

[jwt]
secret = "abc"

[[users]]
email = "owner@tradedesk.in"
name = "Owner"
password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"
"#,
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.storage.data_dir, "/var/lib/tradedesk/main");
        assert_eq!(config.jwt.expire_secs, 86400);
        assert_eq!(config.users.len(), 1);

        let identity = config.identity_config();
        assert_eq!(identity.jwt_secret, "abc");
        assert_eq!(identity.users[0].name, "Owner");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ServerConfig::load(Path::new("/nonexistent/tradedesk.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
