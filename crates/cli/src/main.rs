//! FeastFlow CLI - Database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ff-cli migrate
//!
//! # Create a user (e.g. the default administrator)
//! ff-cli user create -e admin@feastflow.com -p 'change-me-now' -f Admin -l User -r admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create a user of any role

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ff-cli")]
#[command(author, version, about = "FeastFlow CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Plain-text password, hashed before storage
        #[arg(short, long)]
        password: String,

        #[arg(short, long)]
        first_name: String,

        #[arg(short, long)]
        last_name: String,

        /// Role (`customer`, `restaurant_owner`, `admin`)
        #[arg(short, long, default_value = "customer")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                password,
                first_name,
                last_name,
                role,
            } => {
                commands::user::create_user(commands::user::CreateUser {
                    email: &email,
                    password: &password,
                    first_name: &first_name,
                    last_name: &last_name,
                    role: &role,
                })
                .await?;
            }
        },
    }
    Ok(())
}
