//! Jaangkhon CLI - drive the marketplace storefront client from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password from -p or JAANGKHON_PASSWORD)
//! jk-cli login -e buyer@example.com
//!
//! # Who is logged in
//! jk-cli whoami
//!
//! # Browse products, optionally by category and search text
//! jk-cli products list --category Food --search curry
//!
//! # Manage products (seller or admin account)
//! jk-cli products create --name "Silk Scarf" --price 890 --category Clothing
//! jk-cli products update 7 --stock 12
//! jk-cli products delete 7
//!
//! # Forget the stored session
//! jk-cli logout
//! ```
//!
//! The session is kept in `JAANGKHON_SESSION_FILE` between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jaangkhon_core::ProductId;
use jaangkhon_storefront::config::{ConfigError, StorefrontConfig};
use jaangkhon_storefront::session::FileStore;
use jaangkhon_storefront::state::AppState;

mod commands;

#[derive(Parser)]
#[command(name = "jk-cli")]
#[command(author, version, about = "Jaangkhon marketplace CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "JAANGKHON_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a new account (does not log in)
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "JAANGKHON_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Only products in this category (filtered by the server)
        #[arg(short, long)]
        category: Option<String>,

        /// Only products whose name or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one product
    Show { id: ProductId },
    /// Create a product
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        category: String,

        #[arg(long)]
        image_url: Option<String>,

        #[arg(long, default_value_t = 0)]
        stock: u32,

        /// Create the product hidden from the storefront
        #[arg(long)]
        inactive: bool,
    },
    /// Update some fields of a product
    Update {
        id: ProductId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<Decimal>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        image_url: Option<String>,

        #[arg(long)]
        stock: Option<u32>,

        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a product
    Delete { id: ProductId },
}

/// Initialize Sentry error tracking.
///
/// Returns a guard that must be kept alive for the duration of the program.
/// If `SENTRY_DSN` is not configured, returns `None` and Sentry is disabled.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Report a configuration error before logging is set up, then exit.
#[allow(clippy::print_stderr)]
fn config_failure(e: &ConfigError) -> ! {
    eprintln!("Configuration error: {e}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    // Load .env before clap so JAANGKHON_PASSWORD can come from it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = StorefrontConfig::from_env().unwrap_or_else(|e| config_failure(&e));

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jaangkhon_storefront=info,jaangkhon_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(FileStore::new(config.session_file.clone()));
    let state = AppState::new(config, store)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&state, &email, SecretString::from(password)).await?;
        }
        Commands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            let form = commands::auth::RegisterForm {
                username,
                email,
                password: SecretString::from(password),
                first_name,
                last_name,
            };
            commands::auth::register(&state, form).await?;
        }
        Commands::Logout => commands::auth::logout(&state),
        Commands::Whoami => commands::auth::whoami(&state),
        Commands::Products { action } => match action {
            ProductAction::List { category, search } => {
                commands::products::list(&state, category, search.as_deref()).await?;
            }
            ProductAction::Show { id } => commands::products::show(&state, id).await?,
            ProductAction::Create {
                name,
                description,
                price,
                category,
                image_url,
                stock,
                inactive,
            } => {
                let product = jaangkhon_core::NewProduct {
                    name,
                    description,
                    price: price.into(),
                    image_url,
                    category,
                    stock,
                    is_active: !inactive,
                };
                commands::products::create(&state, &product).await?;
            }
            ProductAction::Update {
                id,
                name,
                description,
                price,
                category,
                image_url,
                stock,
                active,
            } => {
                let patch = jaangkhon_core::ProductPatch {
                    name,
                    description,
                    price: price.map(Into::into),
                    image_url,
                    category,
                    stock,
                    is_active: active,
                };
                commands::products::update(&state, id, &patch).await?;
            }
            ProductAction::Delete { id } => commands::products::delete(&state, id).await?,
        },
    }
    Ok(())
}
