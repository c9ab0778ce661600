//! EPR end-to-end automation CLI.
//!
//! One subcommand per business flow:
//!
//! ```bash
//! epr-e2e enrol                                  # enrolment + regulator acceptance
//! epr-e2e submit-registration-data --email ...   # organisation data upload
//! epr-e2e complete-registration --email ...      # fee + application submission
//! epr-e2e grant-registration --company-name ...  # regulator grants registration
//! epr-e2e report-packaging-data --email ...      # packaging data submission
//! epr-e2e create-pom-file --org-id ...           # standalone CSV generation
//! ```

mod error;

use clap::{Args, Parser, Subcommand};
use epr_e2e::flows::enrolment::EnrolmentDetails;
use epr_e2e::flows::{self, EnrolmentResult, FlowContext};
use epr_e2e::pages::create_account::{OrganisationRole, UkNation};
use epr_e2e::{
    BrowserConfig, CompaniesHouseClient, CompaniesHouseConfig, Config, NotificationsClient,
    NotifyConfig, DEFAULT_PROFILE,
};
use error::{CliError, CliResult};
use rand::Rng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_ACCOUNT_PASSWORD: &str = "Password123";
const DEFAULT_REGISTRATION_YEAR: &str = "2026";
const DEFAULT_REPORTING_PERIOD: &str = "January to June 2025 (large producers)";
const DEFAULT_DECLARER_NAME: &str = "Automation Tester";

#[derive(Debug, Parser)]
#[command(name = "epr-e2e", version, about = "EPR portal end-to-end automation flows")]
struct Cli {
    /// Environment profile (selects config/environments/.env.<profile>)
    #[arg(long, global = true, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Configuration directory
    #[arg(long, global = true, default_value = "config")]
    config_dir: PathBuf,

    /// CSV template directory
    #[arg(long, global = true, default_value = "templates")]
    templates_dir: PathBuf,

    /// Output directory for generated files and failure screenshots
    #[arg(long, global = true, default_value = "output")]
    output_dir: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a producer enrolment and have the regulator accept it
    Enrol(EnrolArgs),
    /// Upload and submit the organisation registration data
    SubmitRegistrationData(SubmitRegistrationDataArgs),
    /// Acknowledge the registration fee and submit the application
    CompleteRegistration(CompleteRegistrationArgs),
    /// Regulator: grant a submitted registration
    GrantRegistration(GrantRegistrationArgs),
    /// Report packaging data for a submission period
    ReportPackagingData(ReportPackagingDataArgs),
    /// Generate a POM CSV from the template without driving the UI
    CreatePomFile(CreatePomFileArgs),
}

#[derive(Debug, Args)]
struct EnrolArgs {
    /// Account email; a random one is generated when omitted
    #[arg(long)]
    email: Option<String>,

    /// Account password
    #[arg(long, default_value = DEFAULT_ACCOUNT_PASSWORD)]
    password: String,

    /// Organisation nation (England, Scotland, Wales, Northern Ireland)
    #[arg(long, default_value = "England")]
    nation: String,

    /// Role in the organisation (Director, Company Secretary, …)
    #[arg(long, default_value = "Director")]
    role: String,

    /// Skip the regulator acceptance step
    #[arg(long)]
    skip_acceptance: bool,
}

#[derive(Debug, Args)]
struct SubmitRegistrationDataArgs {
    /// Producer account email
    #[arg(long)]
    email: String,

    /// Producer account password
    #[arg(long, default_value = DEFAULT_ACCOUNT_PASSWORD)]
    password: String,

    /// Registration year
    #[arg(long, default_value = DEFAULT_REGISTRATION_YEAR)]
    year: String,

    /// Organisation ID from the enrolment
    #[arg(long)]
    org_id: String,

    /// Company legal name from the enrolment
    #[arg(long)]
    company_name: String,

    /// Companies House number from the enrolment
    #[arg(long)]
    company_number: String,
}

#[derive(Debug, Args)]
struct CompleteRegistrationArgs {
    /// Producer account email
    #[arg(long)]
    email: String,

    /// Producer account password
    #[arg(long, default_value = DEFAULT_ACCOUNT_PASSWORD)]
    password: String,

    /// Registration year
    #[arg(long, default_value = DEFAULT_REGISTRATION_YEAR)]
    year: String,
}

#[derive(Debug, Args)]
struct GrantRegistrationArgs {
    /// Company name to search for
    #[arg(long)]
    company_name: String,
}

#[derive(Debug, Args)]
struct ReportPackagingDataArgs {
    /// Producer account email
    #[arg(long)]
    email: String,

    /// Producer account password
    #[arg(long, default_value = DEFAULT_ACCOUNT_PASSWORD)]
    password: String,

    /// Organisation ID from the enrolment
    #[arg(long)]
    org_id: String,

    /// Submission period as shown on the reporting card
    #[arg(long, default_value = DEFAULT_REPORTING_PERIOD)]
    period: String,
}

#[derive(Debug, Args)]
struct CreatePomFileArgs {
    /// Organisation ID to populate
    #[arg(long)]
    org_id: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("epr_e2e={default_level},epr_e2e_cli={default_level}")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn run(cli: Cli) -> CliResult<()> {
    let Cli {
        profile,
        config_dir,
        templates_dir,
        output_dir,
        verbose: _,
        command,
    } = cli;

    let config = epr_e2e::load_config(&config_dir, &profile)?;
    let browser = BrowserConfig::default().with_headless(config.environment.headless);
    let ctx = FlowContext {
        browser: &browser,
        screenshots_dir: &output_dir,
    };

    match command {
        Commands::Enrol(args) => run_enrol(ctx, &config, args).await,
        Commands::SubmitRegistrationData(args) => {
            let enrolment = EnrolmentResult {
                organisation_id: args.org_id,
                email: args.email,
                company_name: args.company_name,
                company_number: args.company_number,
            };
            flows::submit_registration_data(
                ctx,
                &config.environment.producer_base_url,
                &args.password,
                &args.year,
                &enrolment,
                DEFAULT_DECLARER_NAME,
                &templates_dir,
                &output_dir,
            )
            .await?;
            Ok(())
        }
        Commands::CompleteRegistration(args) => {
            let reference = flows::complete_registration_submission(
                ctx,
                &config.environment.producer_base_url,
                &args.email,
                &args.password,
                &args.year,
            )
            .await?;
            println!("Application reference: {reference}");
            Ok(())
        }
        Commands::GrantRegistration(args) => {
            let reference = flows::regulator_grant_registration(
                ctx,
                &config.environment.regulator_base_url,
                &config.environment.regulator_email,
                &config.environment.regulator_password,
                &args.company_name,
            )
            .await?;
            println!("Registration reference: {reference}");
            Ok(())
        }
        Commands::ReportPackagingData(args) => {
            flows::report_packaging_data(
                ctx,
                &config.environment.producer_base_url,
                &args.email,
                &args.password,
                &args.org_id,
                &args.period,
                DEFAULT_DECLARER_NAME,
                &templates_dir,
                &output_dir,
            )
            .await?;
            Ok(())
        }
        Commands::CreatePomFile(args) => {
            let written =
                flows::create_pom_file(&templates_dir, &output_dir, &args.org_id)?;
            println!("POM CSV created: {}", written.display());
            Ok(())
        }
    }
}

async fn run_enrol(
    ctx: FlowContext<'_>,
    config: &Config,
    args: EnrolArgs,
) -> CliResult<()> {
    let nation: UkNation = args
        .nation
        .parse()
        .map_err(|e| CliError::invalid_argument(format!("--nation: {e}")))?;
    let role: OrganisationRole = args
        .role
        .parse()
        .map_err(|e| CliError::invalid_argument(format!("--role: {e}")))?;
    let details = EnrolmentDetails {
        nation,
        role,
        ..EnrolmentDetails::default()
    };

    let email = args
        .email
        .unwrap_or_else(|| format!("Automation+{}@example.test", rand_suffix(8)));

    let companies = CompaniesHouseClient::new(CompaniesHouseConfig::new(
        config.secrets.companies_house_token.clone(),
    ));
    let notifications = NotificationsClient::new(NotifyConfig::new(
        config.secrets.notify_issuer.clone(),
        config.secrets.notify_secret.clone(),
    ));

    let result = flows::producer_enrolment(
        ctx,
        &config.environment.producer_base_url,
        &email,
        &args.password,
        &details,
        &companies,
        &notifications,
    )
    .await?;

    info!(
        organisation_id = %result.organisation_id,
        company_name = %result.company_name,
        "enrolment completed"
    );
    println!(
        "Enrolled organisation {} ({}) as {} / {}",
        result.organisation_id, result.company_name, result.email, args.password
    );

    if !args.skip_acceptance {
        flows::regulator_accept_approved_person(
            ctx,
            &config.environment.regulator_base_url,
            &config.environment.regulator_email,
            &config.environment.regulator_password,
            &result.company_name,
        )
        .await?;
        println!("Approved person accepted for {}", result.company_name);
    }

    Ok(())
}

/// Random lowercase-alphanumeric suffix for generated account emails
fn rand_suffix(length: usize) -> String {
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARS[rng.random_range(0..CHARS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rand_suffix_is_lowercase_alphanumeric() {
        let suffix = rand_suffix(8);
        assert_eq!(suffix.len(), 8);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn cli_parses_enrol_defaults() {
        let cli = Cli::parse_from(["epr-e2e", "enrol"]);
        match cli.command {
            Commands::Enrol(args) => {
                assert!(args.email.is_none());
                assert_eq!(args.password, "Password123");
                assert_eq!(args.nation, "England");
            }
            _ => panic!("expected enrol subcommand"),
        }
        assert_eq!(cli.profile, "dev15");
    }

    #[test]
    fn cli_requires_org_id_for_pom_generation() {
        assert!(Cli::try_parse_from(["epr-e2e", "create-pom-file"]).is_err());
        assert!(Cli::try_parse_from(["epr-e2e", "create-pom-file", "--org-id", "100001"]).is_ok());
    }
}
