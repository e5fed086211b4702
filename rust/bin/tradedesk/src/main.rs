//! `tradedesk`: the TradeDesk CLI client.
//!
//! Manages contexts, sign-in, and master records on a tradedeskd server.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use tradedesk_masters::model::{Agent, Hsn, Item, Party, Transport, Unit};

use commands::record::{parse_assignment, EntityKind};

/// Run a generic record command for the entity named on the command line.
macro_rules! dispatch {
    ($kind:expr, $f:ident($($arg:expr),*)) => {
        match $kind {
            EntityKind::Agent => commands::record::$f::<Agent>($($arg),*).await,
            EntityKind::Party => commands::record::$f::<Party>($($arg),*).await,
            EntityKind::Unit => commands::record::$f::<Unit>($($arg),*).await,
            EntityKind::Hsn => commands::record::$f::<Hsn>($($arg),*).await,
            EntityKind::Item => commands::record::$f::<Item>($($arg),*).await,
            EntityKind::Transport => commands::record::$f::<Transport>($($arg),*).await,
        }
    };
}

/// TradeDesk CLI tool.
#[derive(Parser, Debug)]
#[command(name = "tradedesk", about = "TradeDesk CLI client")]
struct Cli {
    /// Path to client config file (default: $TRADEDESK_CONFIG or ~/.tradedesk/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage contexts (server connections).
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Manage users of a local context's server.
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Sign in to the current context's server.
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Password (not recommended; omit for a prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the saved token of the current context.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// Show the fields of an entity.
    Fields { entity: EntityKind },

    /// Create a record. Prompts for each field when no --set is given.
    New {
        entity: EntityKind,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// List records.
    List {
        entity: EntityKind,
        /// Case-insensitive filter on the display field.
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Edit a record.
    Edit {
        entity: EntityKind,
        id: String,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Delete a record.
    Delete {
        entity: EntityKind,
        id: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Print an argon2id hash for a `[[users]]` entry.
    HashPassword,

    /// Check server status.
    Status,

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Create a local context: server config, data directory and first user.
    Create {
        name: String,
        /// Server config directory.
        #[arg(long, default_value = "/etc/tradedesk")]
        config_dir: String,
        /// Data directory (default: /var/lib/tradedesk/<name>).
        #[arg(long)]
        data_dir: Option<String>,
        /// Email of the first user.
        #[arg(long)]
        email: String,
        /// Display name of the first user.
        #[arg(long, default_value = "Owner")]
        user_name: String,
        /// Password (non-interactive, for CI/automation).
        #[arg(long)]
        password: Option<String>,
    },
    /// List all contexts.
    List,
    /// Set the server URL of a context, adding it if new.
    Set {
        name: String,
        #[arg(long)]
        server: Option<String>,
    },
    /// Switch the current context.
    Use { name: String },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UserAction {
    /// Add a user.
    Add {
        email: String,
        #[arg(long, default_value = "")]
        name: String,
        /// Target context (default: current).
        #[arg(long)]
        context: Option<String>,
    },
    /// Change a user's password.
    Passwd {
        email: String,
        #[arg(long)]
        context: Option<String>,
    },
}

/// Prompt twice for a new password.
fn prompt_new_password(label: &str) -> anyhow::Result<String> {
    let pw = rpassword::prompt_password(format!("{}: ", label))?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if pw != confirm {
        anyhow::bail!("Passwords do not match.");
    }
    if pw.is_empty() {
        anyhow::bail!("Password cannot be empty.");
    }
    Ok(pw)
}

fn read_line(prompt: &str) -> anyhow::Result<String> {
    eprint!("{}", prompt);
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(config::ClientConfig::default_path);
    let json_output = cli.output == "json";

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Create {
                name,
                config_dir,
                data_dir,
                email,
                user_name,
                password,
            } => {
                let data_dir = data_dir.unwrap_or_else(|| format!("/var/lib/tradedesk/{}", name));
                let password = match password {
                    Some(p) if p.is_empty() => anyhow::bail!("Password cannot be empty."),
                    Some(p) => p,
                    None => prompt_new_password(&format!("Password for {}", email))?,
                };
                commands::context::create(
                    &name,
                    &config_dir,
                    &data_dir,
                    &email,
                    &user_name,
                    &password,
                    &config_path,
                )?;
            }
            ContextAction::List => commands::context::list(&config_path)?,
            ContextAction::Set { name, server } => {
                commands::context::set(&name, server.as_deref(), &config_path)?;
            }
            ContextAction::Use { name } => commands::context::use_context(&name, &config_path)?,
            ContextAction::Delete { name } => commands::context::delete(&name, &config_path)?,
        },

        Commands::User { action } => match action {
            UserAction::Add { email, name, context } => {
                let password = prompt_new_password(&format!("Password for {}", email))?;
                commands::user::add(context.as_deref(), &email, &name, &password, &config_path)?;
            }
            UserAction::Passwd { email, context } => {
                let old = rpassword::prompt_password("Current password: ")?;
                let new = prompt_new_password("New password")?;
                commands::user::passwd(context.as_deref(), &email, &old, &new, &config_path)?;
            }
        },

        Commands::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => read_line("Email: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            commands::login::login(&email, &password, &config_path).await?;
        }

        Commands::Logout => commands::login::logout(&config_path)?,

        Commands::Whoami => commands::login::whoami(&config_path).await?,

        Commands::Fields { entity } => {
            let mut out = std::io::stdout();
            match entity {
                EntityKind::Agent => commands::record::fields::<Agent>(&mut out)?,
                EntityKind::Party => commands::record::fields::<Party>(&mut out)?,
                EntityKind::Unit => commands::record::fields::<Unit>(&mut out)?,
                EntityKind::Hsn => commands::record::fields::<Hsn>(&mut out)?,
                EntityKind::Item => commands::record::fields::<Item>(&mut out)?,
                EntityKind::Transport => commands::record::fields::<Transport>(&mut out)?,
            }
        }

        Commands::New { entity, set } => {
            let config = config::ClientConfig::load(&config_path)?;
            let ctx = config.require_current()?;
            dispatch!(entity, create(ctx, &set))?;
        }

        Commands::List { entity, search } => {
            let config = config::ClientConfig::load(&config_path)?;
            let ctx = config.require_current()?;
            dispatch!(entity, list(ctx, search.as_deref(), json_output))?;
        }

        Commands::Edit { entity, id, set } => {
            let config = config::ClientConfig::load(&config_path)?;
            let ctx = config.require_current()?;
            dispatch!(entity, edit(ctx, &id, &set))?;
        }

        Commands::Delete { entity, id, yes } => {
            if !yes && !read_line("Are you sure? [y/N]: ")?.eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
            let config = config::ClientConfig::load(&config_path)?;
            let ctx = config.require_current()?;
            dispatch!(entity, delete(ctx, &id))?;
        }

        Commands::HashPassword => {
            let password = prompt_new_password("Password")?;
            println!("{}", tradedesk_identity::hash_password(&password)?);
        }

        Commands::Status => commands::login::status(&config_path).await?,

        Commands::Version => println!("tradedesk cli v{}", env!("CARGO_PKG_VERSION")),
    }

    Ok(())
}
