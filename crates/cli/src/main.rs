//! Flowcheck CLI - Main Entry Point
//!
//! Runs the booking API flow and the web-form scenarios, against the
//! demo's remote endpoints by default or hermetically against the
//! in-process fixtures with `--fixture`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use flowcheck_common::Credentials;
use flowcheck_fixture::{FixtureServer, WebTablesPage};
use flowcheck_harness::browser::{BrowserConfig, BrowserDriver};
use flowcheck_harness::runner::FlowResult;
use flowcheck_harness::{ApiFlow, BookingClient, FlowRunner, FormFlow};

/// The demo's literal targets.
const DEFAULT_BOOKING_URL: &str = "https://restful-booker.herokuapp.com";
const DEFAULT_PAGE_URL: &str = "https://demoqa.com/webtables";

/// Flowcheck - end-to-end flows for a booking API and a web form
#[derive(Parser)]
#[command(name = "flowcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory for the suite result JSON
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the booking API flow
    Api(ApiArgs),

    /// Run the three web-form scenarios
    Form(FormArgs),

    /// Run everything against the hermetic fixtures
    All,

    /// Show version information
    Version,
}

#[derive(Args)]
struct ApiArgs {
    /// Booking service base URL
    #[arg(long, default_value = DEFAULT_BOOKING_URL, env = "FLOWCHECK_BOOKING_URL")]
    base_url: String,

    /// Run against an in-process fixture instead of the remote service
    #[arg(long)]
    fixture: bool,

    /// Target booking id
    #[arg(long, default_value = "10")]
    booking_id: u32,

    /// Last name the flow writes
    #[arg(long, default_value = "HolyOne")]
    last_name: String,

    /// Auth username
    #[arg(long, default_value = "admin")]
    username: String,

    /// Auth password
    #[arg(long, default_value = "password123")]
    password: String,
}

#[derive(Args)]
struct FormArgs {
    /// Web-tables page URL
    #[arg(long, default_value = DEFAULT_PAGE_URL, env = "FLOWCHECK_PAGE_URL")]
    page_url: String,

    /// Drive the in-process page model instead of a real browser
    #[arg(long)]
    fixture: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let runner = match &cli.output {
        Some(dir) => FlowRunner::with_output_dir(dir),
        None => FlowRunner::new(),
    };

    let started = Instant::now();
    let results = match cli.command {
        Commands::Api(args) => run_api(&runner, args).await?,
        Commands::Form(args) => run_form(&runner, args).await?,
        Commands::All => {
            let mut results = run_api(
                &runner,
                ApiArgs {
                    base_url: DEFAULT_BOOKING_URL.to_string(),
                    fixture: true,
                    booking_id: 10,
                    last_name: "HolyOne".to_string(),
                    username: "admin".to_string(),
                    password: "password123".to_string(),
                },
            )
            .await?;
            results.extend(
                run_form(
                    &runner,
                    FormArgs {
                        page_url: DEFAULT_PAGE_URL.to_string(),
                        fixture: true,
                    },
                )
                .await?,
            );
            results
        }
        Commands::Version => {
            println!("flowcheck {}", flowcheck_common::VERSION);
            return Ok(());
        }
    };

    let suite = runner.summarize(results, started);
    runner.write_results(&suite)?;

    if suite.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_api(runner: &FlowRunner, args: ApiArgs) -> anyhow::Result<Vec<FlowResult>> {
    let flow = ApiFlow {
        credentials: Credentials::new(args.username, args.password),
        booking_id: args.booking_id,
        new_last_name: args.last_name,
    };

    // The fixture handle must outlive the flow run
    let (client, _server) = if args.fixture {
        let server = FixtureServer::spawn().await?;
        let client = BookingClient::new(server.base_url())?;
        client.wait_until_ready(50).await?;
        (client, Some(server))
    } else {
        (BookingClient::new(args.base_url)?, None)
    };
    info!("booking service: {}", client.base_url());

    Ok(vec![runner.run_api(&client, &flow).await])
}

async fn run_form(runner: &FlowRunner, args: FormArgs) -> anyhow::Result<Vec<FlowResult>> {
    let flow = FormFlow::default();

    let results = if args.fixture {
        info!("driving the in-process page model");
        let driver = WebTablesPage::new();
        runner.run_form(&driver, &flow).await
    } else {
        info!("driving {} via playwright", args.page_url);
        let driver = BrowserDriver::new(BrowserConfig::new(args.page_url))?;
        runner.run_form(&driver, &flow).await
    };

    Ok(results)
}
