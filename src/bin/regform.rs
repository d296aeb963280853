//! regform: validate one registration from the command line.
//!
//! # Usage
//!
//! ```bash
//! regform --username newuser1 --email fresh@new.com --password 'Abcdef1!' --mobile 9123456789
//! regform --live --config regform.toml --username ab --email x@x.com
//! ```
//!
//! Exits with status 1 when the report contains an error entry.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use futures::executor::block_on;

use regform::form::{FieldId, FormOptions, StaleResultPolicy, ValidationOrchestrator};
use regform::{ValidationConfig, telemetry};

#[derive(Debug, Parser)]
#[command(name = "regform", version, about = "Validate a registration form")]
struct Cli {
    #[arg(long, default_value = "")]
    username: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    password: String,
    #[arg(long, default_value = "")]
    mobile: String,
    /// TOML file overriding latencies and the taken usernames/emails.
    #[arg(long, env = "REGFORM_CONFIG")]
    config: Option<PathBuf>,
    /// Print per-field live feedback before the submission report.
    #[arg(long)]
    live: bool,
    /// Skip the simulated latencies.
    #[arg(long)]
    instant: bool,
}

fn main() -> Result<ExitCode> {
    telemetry::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ValidationConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ValidationConfig::default(),
    };
    if cli.instant {
        config = config.without_latency();
    }

    let orchestrator = ValidationOrchestrator::from_config(
        &config,
        FormOptions {
            stale_results: StaleResultPolicy::DiscardStale,
        },
    );
    for (field, value) in [
        (FieldId::Username, &cli.username),
        (FieldId::Email, &cli.email),
        (FieldId::Password, &cli.password),
        (FieldId::Mobile, &cli.mobile),
    ] {
        orchestrator.set_value(field, value.as_str())?;
    }

    if cli.live {
        let results = block_on(orchestrator.validate_all())?;
        for (field, feedback) in results {
            println!(
                "[{}] {}: {}",
                feedback.status.style_class(),
                field.title(),
                feedback.message
            );
        }
        println!();
    }

    let report = block_on(orchestrator.submit())?;
    println!("{}", report.render());

    Ok(if report.outcome() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
