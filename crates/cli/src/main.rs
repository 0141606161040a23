//! Cartpay CLI - Token and payment RPC tools.
//!
//! # Usage
//!
//! ```bash
//! # Print a signed token for a user (needs JWT_SECRET)
//! cartpay-cli token u1
//!
//! # Record a payment, authenticating as a freshly issued user token
//! cartpay-cli payments --user u1 create --amount 100.5
//!
//! # List payments with an existing token against a specific endpoint
//! cartpay-cli payments --endpoint http://localhost:9061 --token eyJ... list
//!
//! # Fetch or delete one payment
//! cartpay-cli payments --user u1 get 65f1c0ffee0123456789abcd
//! cartpay-cli payments --user u1 delete 65f1c0ffee0123456789abcd
//! ```
//!
//! # Commands
//!
//! - `token` - Issue a token
//! - `payments` - Drive the payment RPC service

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::payments::{Credentials, PaymentAction};

#[derive(Parser)]
#[command(name = "cartpay-cli")]
#[command(author, version, about = "Cartpay CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a signed token for a user id
    Token {
        /// Subject to put in the token
        user_id: String,
    },
    /// Call the payment RPC service
    Payments {
        /// Service address (default: `PAYMENT_SERVICE_BASE_URI`)
        #[arg(long)]
        endpoint: Option<String>,

        /// Existing bearer token
        #[arg(long, conflicts_with = "user")]
        token: Option<String>,

        /// Issue a token for this user id (needs `JWT_SECRET`)
        #[arg(long)]
        user: Option<String>,

        #[command(subcommand)]
        action: PaymentCommand,
    },
}

#[derive(Subcommand)]
enum PaymentCommand {
    /// Record a payment
    Create {
        /// Amount, must be greater than 0
        #[arg(long)]
        amount: f64,
    },
    /// List all payments
    List,
    /// Show one payment
    Get {
        /// Payment id (24 hex characters)
        id: String,
    },
    /// Delete one payment
    Delete {
        /// Payment id (24 hex characters)
        id: String,
    },
}

impl From<PaymentCommand> for PaymentAction {
    fn from(command: PaymentCommand) -> Self {
        match command {
            PaymentCommand::Create { amount } => Self::Create { amount },
            PaymentCommand::List => Self::List,
            PaymentCommand::Get { id } => Self::Get { id },
            PaymentCommand::Delete { id } => Self::Delete { id },
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Token { user_id } => commands::token::issue(&user_id)?,
        Commands::Payments {
            endpoint,
            token,
            user,
            action,
        } => {
            let credentials = match (token, user) {
                (Some(token), _) => Credentials::Token(token),
                (None, Some(user)) => Credentials::User(user),
                (None, None) => Credentials::None,
            };
            commands::payments::run(endpoint, credentials, action.into()).await?;
        }
    }
    Ok(())
}
