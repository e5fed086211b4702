//! First-start checks. The server refuses to start on a config it
//! cannot serve sign-ins from.

use crate::config::ServerConfig;

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.users.is_empty() {
        anyhow::bail!(
            "No users found in configuration.\n\
             Run `tradedesk context create <name>` to set up the server first."
        );
    }
    for (i, user) in config.users.iter().enumerate() {
        if user.email.trim().is_empty() {
            anyhow::bail!("User #{} has an empty email.", i + 1);
        }
        if !user.password_hash.starts_with("$argon2") {
            anyhow::bail!(
                "User {} has no argon2 password hash. Generate one with `tradedesk hash-password`.",
                user.email
            );
        }
        let duplicate = config.users[..i]
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email));
        if duplicate {
            anyhow::bail!("User {} is configured twice.", user.email);
        }
    }
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JwtConfig, StorageConfig};
    use tradedesk_identity::UserEntry;

    fn user(email: &str) -> UserEntry {
        UserEntry {
            email: email.to_string(),
            name: String::new(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        }
    }

    fn config(users: Vec<UserEntry>) -> ServerConfig {
        ServerConfig {
            storage: StorageConfig { data_dir: "/tmp".to_string() },
            jwt: JwtConfig { secret: "test".to_string(), expire_secs: 3600 },
            users,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(verify_config(&config(vec![user("a@b.in")])).is_ok());
    }

    #[test]
    fn no_users_rejected() {
        assert!(verify_config(&config(vec![])).is_err());
    }

    #[test]
    fn plain_password_rejected() {
        let mut u = user("a@b.in");
        u.password_hash = "hunter2".to_string();
        let err = verify_config(&config(vec![u])).unwrap_err();
        assert!(err.to_string().contains("hash-password"));
    }

    #[test]
    fn duplicate_email_rejected() {
        assert!(verify_config(&config(vec![user("a@b.in"), user("A@B.in")])).is_err());
    }

    #[test]
    fn empty_secret_rejected() {
        let mut c = config(vec![user("a@b.in")]);
        c.jwt.secret.clear();
        assert!(verify_config(&c).is_err());
    }
}
