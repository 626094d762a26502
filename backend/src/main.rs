//! Rosterload CLI - Moodle accounts, email merge and cohort lists from a roster CSV
//!
//! # Commands
//!
//! ```bash
//! rosterload generate -i roster.csv              # accounts via the password web API
//! rosterload generate -i roster.csv -o out.csv -l  # local password generator
//! rosterload check                               # probe the remote services
//! rosterload password -n 10                      # print local passwords
//! ```

use clap::{Args, Parser, Subcommand};
use rosterload::config::{Endpoints, DEFAULT_API_KEY_FILE, DEFAULT_OUTPUT};
use rosterload::credential::remote::PASSWORD_SERVICE;
use rosterload::logs::{log_info, log_separator, log_success, log_warning};
use rosterload::remote::probe_service;
use rosterload::{
    generate, GenerateOptions, LocalPasswordGenerator, PasswordPolicy, RunConfig, SlovnykClient,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rosterload")]
#[command(about = "Generate Moodle user accounts information, email and cohorts lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a roster CSV into accounts, email, cohorts and duplicates files
    Generate {
        /// Roster CSV with name, email and cohort columns
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Accounts CSV; the other outputs are named after it
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Use local password generator instead of Web API
        #[arg(short, long)]
        local: bool,

        /// JSON file with "male" and "female" first-name lists
        #[arg(long)]
        names: Option<PathBuf>,

        /// File holding the password API key
        #[arg(long, default_value = DEFAULT_API_KEY_FILE)]
        api_key_file: PathBuf,

        /// Do not probe the remote services before starting
        #[arg(long)]
        skip_checks: bool,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Check that the remote services are reachable
    Check {
        /// Only check the transliteration service
        #[arg(short, long)]
        local: bool,
    },

    /// Print passwords from the local generator
    Password {
        /// How many passwords to print
        #[arg(short = 'n', long, default_value = "5")]
        count: usize,

        #[command(flatten)]
        policy: PolicyArgs,
    },
}

/// Local password generator settings
#[derive(Args)]
struct PolicyArgs {
    /// Password length
    #[arg(long, default_value = "12")]
    password_length: usize,

    /// Exact number of special characters
    #[arg(long, default_value = "2")]
    special: usize,

    /// Characters that must never appear
    #[arg(long, default_value = "lI")]
    exclude: String,
}

impl From<PolicyArgs> for PasswordPolicy {
    fn from(args: PolicyArgs) -> Self {
        PasswordPolicy {
            length: args.password_length,
            special_count: args.special,
            exclude: args.exclude,
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            local,
            names,
            api_key_file,
            skip_checks,
            policy,
        } => {
            let options = GenerateOptions {
                input,
                output,
                local_passwords: local,
                policy: policy.into(),
                names_file: names,
                api_key_file,
                skip_checks,
            };
            cmd_generate(&options).await
        }

        Commands::Check { local } => cmd_check(local).await,

        Commands::Password { count, policy } => cmd_password(count, policy.into()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_generate(options: &GenerateOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = RunConfig::from_options(options)?;

    log_separator();
    println!("A program for generating Moodle user accounts information for bulk uploading, emailing, and cohort lists.");
    log_separator();

    let summary = generate(&config).await?;

    log_separator();
    log_success("Done!");
    log_info(format!("Processed {} rows.", summary.processed));
    log_info(format!(
        "{} accounts, {} duplicates, {} cohorts",
        summary.accepted,
        summary.duplicates,
        summary.outputs.cohorts.len()
    ));
    log_info(format!("💾 Accounts: {}", summary.outputs.paths.accounts.display()));
    log_info(format!("💾 Email:    {}", summary.outputs.paths.email.display()));
    log_info(format!("💾 Cohorts:  {}", summary.outputs.paths.cohorts.display()));
    if summary.outputs.duplicates_kept {
        log_warning(format!(
            "Duplicates: {}",
            summary.outputs.paths.duplicates.display()
        ));
    }
    log_separator();

    Ok(())
}

async fn cmd_check(local: bool) -> Result<(), Box<dyn std::error::Error>> {
    let endpoints = Endpoints::from_env();

    SlovnykClient::new(&endpoints.translit_url)?.probe().await?;
    if !local {
        probe_service(
            &reqwest::Client::new(),
            &endpoints.password_status_url,
            PASSWORD_SERVICE,
        )
        .await?;
    }

    Ok(())
}

fn cmd_password(count: usize, policy: PasswordPolicy) -> Result<(), Box<dyn std::error::Error>> {
    let generator = LocalPasswordGenerator::new(policy)?;

    for _ in 0..count {
        println!("{}", generator.generate()?.password);
    }

    Ok(())
}
