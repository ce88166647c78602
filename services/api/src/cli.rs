use crate::demo::{
    run_alert_draft, run_alert_predict, run_allocate, run_demo, AlertDraftArgs, AlertPredictArgs,
    AllocateArgs, DemoArgs,
};
use crate::server;
use aidvantage::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "AidVantage",
    about = "Run the AidVantage emergency resource dashboard API and its allocation tools",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run one allocation pass and print the scenario summary
    Allocate(AllocateArgs),
    /// Predict hazard alerts or draft outbound notifications
    Alerts {
        #[command(subcommand)]
        command: AlertsCommand,
    },
    /// Walk through allocation, prediction and drafting on the built-in data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum AlertsCommand {
    /// Generate predictive alerts for every county
    Predict(AlertPredictArgs),
    /// Render an email or SMS draft for one of the seeded alerts
    Draft(AlertDraftArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Allocate(args) => run_allocate(args),
        Command::Alerts {
            command: AlertsCommand::Predict(args),
        } => run_alert_predict(args),
        Command::Alerts {
            command: AlertsCommand::Draft(args),
        } => run_alert_draft(args),
        Command::Demo(args) => run_demo(args),
    }
}
