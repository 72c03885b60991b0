//! `legalease` - legal-education assistant for Indian law.
//!
//! Chat and simplify never fail: without `GEMINI_API_KEY` they answer from
//! the canned table. Set `RUST_LOG` (or pass `-v`) to see which path served
//! a request.

mod input;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use legalease_core::rights::{self, RightsCategory};
use legalease_runtime::{
    BackendClient, ProviderRegistry, ResilientRequestGateway, RuntimeConfig, Session,
};

#[derive(Parser, Debug)]
#[command(name = "legalease", version, about = "Understand Indian law in plain language")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask a legal question
    Chat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Rewrite a legal document in plain language (reads stdin without --file)
    Simplify {
        /// Plain-text (.txt) document, at most 10 MB
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Browse the rights catalog
    Rights {
        /// Filter by title or description
        #[arg(short, long)]
        search: Option<String>,

        /// Show one category by id
        #[arg(long, conflicts_with = "search")]
        id: Option<u32>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in to the LegalEase backend
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Create a LegalEase account
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Show provider and backend configuration
    Status,
}

impl Command {
    /// Subcommand name for logs. Arguments may hold credentials.
    fn name(&self) -> &'static str {
        match self {
            Command::Chat { .. } => "chat",
            Command::Simplify { .. } => "simplify",
            Command::Rights { .. } => "rights",
            Command::Login { .. } => "login",
            Command::Register { .. } => "register",
            Command::Status => "status",
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<RuntimeConfig> {
    match path {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(RuntimeConfig::default()),
    }
}

fn gateway(config: &RuntimeConfig) -> Result<ResilientRequestGateway> {
    ResilientRequestGateway::from_config(config, &ProviderRegistry::with_defaults())
        .context("failed to initialize gateway")
}

fn print_category(category: &RightsCategory) {
    println!("{}. {}", category.id, category.title);
    println!("   {}", category.description);
    for detail in &category.details {
        println!("   - {detail}");
    }
    println!("   {}", category.link);
}

fn print_session(session: &Session) {
    println!("Signed in as {} <{}>", session.user.name, session.user.email);
    println!("User ID: {}", session.user.id);
    println!("Token: {}", session.token());
    if session.offline {
        println!("(offline session: the backend could not be reached)");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::info!(command = cli.command.name(), config = ?cli.config, "Running command");

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Chat { message } => {
            let message = message.join(" ");
            input::require_text(&message, "message")?;
            println!("{}", gateway(&config)?.chat(&message).await);
        }

        Command::Simplify { file } => {
            let document = match file {
                Some(path) => input::read_document(&path)?,
                None => input::read_stdin_document(std::io::stdin().lock())?,
            };
            println!("{}", gateway(&config)?.simplify(&document).await);
        }

        Command::Rights { search, id, json } => {
            let categories: Vec<&RightsCategory> = match (id, search.as_deref()) {
                (Some(id), _) => match rights::find(id) {
                    Some(category) => vec![category],
                    None => bail!("no rights category with id {id}"),
                },
                (None, Some(query)) => rights::search(query),
                (None, None) => rights::catalog().iter().collect(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else if categories.is_empty() {
                println!("No rights categories match.");
            } else {
                for category in categories {
                    print_category(category);
                    println!();
                }
            }
        }

        Command::Login { email, password } => {
            input::require_text(&email, "email")?;
            input::require_text(&password, "password")?;
            let client = BackendClient::new(&config.backend)?;
            let session = client.login(&email, &password).await.context("login failed")?;
            print_session(&session);
        }

        Command::Register {
            name,
            email,
            password,
        } => {
            input::require_text(&name, "name")?;
            input::require_text(&email, "email")?;
            input::require_text(&password, "password")?;
            let client = BackendClient::new(&config.backend)?;
            let session = client
                .register(&name, &email, &password)
                .await
                .context("registration failed")?;
            print_session(&session);
        }

        Command::Status => {
            let gateway = gateway(&config)?;
            match gateway.provider_name() {
                Some(name) => println!("AI provider: {name} ({})", config.model),
                None => println!(
                    "AI provider: unavailable, serving canned responses (set {})",
                    config.api_key_env
                ),
            }
            if gateway.provider_name().is_some() {
                println!(
                    "Provider health: {}",
                    if gateway.health_check().await { "ok" } else { "failing" }
                );
            }
            println!("Canned entries: {}", gateway.table().entries().len());
            println!("Backend: {}", config.backend.base_url);
            println!(
                "Offline auth: {}",
                if config.backend.offline_auth { "enabled" } else { "disabled" }
            );
        }
    }

    Ok(())
}
