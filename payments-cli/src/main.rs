//! Payments CLI
//!
//! Drives the payment service against the configured repository:
//! - Load configuration from environment
//! - Initialize logging and the repository adapter
//! - Run one command and print the resulting payment(s) as JSON

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use payments_repo::{Repo, build_repo};
use payments_service::{PaymentService, TracingPublisher};
use payments_types::{AppError, CreatePaymentInput, Payment, PaymentId, PaymentPrimitives};

use config::{Config, LogFormat};

const DEFAULT_LOG_FILTER: &str = "info,payments_service=debug";

type Service = PaymentService<Repo, TracingPublisher<Repo>>;

#[derive(Parser)]
#[command(name = "payments")]
#[command(author, version, about = "ISO 20022 payment lifecycle CLI", long_about = None)]
struct Cli {
    /// Repository URL (`sqlite://path.db` or `memory://`); overrides DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initiate a payment from a JSON file
    Create {
        /// Path to a `CreatePaymentInput` JSON document
        #[arg(long)]
        input: PathBuf,
    },
    /// Show one payment
    Show {
        /// Payment ID (UUID v7)
        id: PaymentId,
    },
    /// List all payments, newest first
    List,
    /// Mark a payment as cleared (ACCC)
    Clear {
        id: PaymentId,
        /// Clearing reference from the clearing system
        #[arg(long)]
        reference: String,
    },
    /// Mark a cleared payment as settled (ACSC)
    Settle {
        id: PaymentId,
        /// Settlement date, defaults to today (UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Reject a payment (RJCT)
    Reject {
        id: PaymentId,
        /// ISO 20022 reason code, e.g. AC01
        #[arg(long)]
        reason: String,
    },
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout carries the JSON result.
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn read_input(path: &Path) -> Result<CreatePaymentInput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid payment input in {}", path.display()))
}

fn print_payment(payment: &Payment) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&payment.to_primitives())?);
    Ok(())
}

async fn run(service: &Service, command: Commands) -> Result<()> {
    match command {
        Commands::Create { input } => {
            let payment = service.create_payment(read_input(&input)?).await?;
            print_payment(&payment)?;
        }
        Commands::Show { id } => {
            let payment = service.get_payment(id).await?;
            print_payment(&payment)?;
        }
        Commands::List => {
            let payments: Vec<PaymentPrimitives> = service
                .list_payments()
                .await?
                .iter()
                .map(Payment::to_primitives)
                .collect();
            println!("{}", serde_json::to_string_pretty(&payments)?);
        }
        Commands::Clear { id, reference } => {
            let payment = service.mark_as_cleared(id, &reference).await?;
            print_payment(&payment)?;
        }
        Commands::Settle { id, date } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let payment = service.mark_as_settled(id, date).await?;
            print_payment(&payment)?;
        }
        Commands::Reject { id, reason } => {
            let payment = service.reject(id, &reason).await?;
            print_payment(&payment)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let database_url = cli.database_url.unwrap_or(config.database_url);
    tracing::debug!(%database_url, "using database");

    // Build repository (handles connection and migration)
    let repo = build_repo(&database_url).await?;
    let service = PaymentService::new(repo.clone(), TracingPublisher::new(repo));

    if let Err(err) = run(&service, cli.command).await {
        // Domain errors are reported as JSON with their payload.
        if let Some(AppError::Domain(domain)) = err.downcast_ref::<AppError>() {
            let kind = if domain.is_validation() {
                "ValidationError"
            } else {
                "InvalidTransitionError"
            };
            let report = serde_json::json!({
                "error": kind,
                "message": domain.message(),
                "details": domain.payload(),
            });
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
            std::process::exit(2);
        }
        return Err(err);
    }

    Ok(())
}
