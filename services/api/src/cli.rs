use crate::predict::{run_fields, run_predict, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use cycle_insight::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Cycle Insight",
    about = "Screen menstrual cycle data for irregularity against a prediction service",
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
    /// Validate one set of inputs, request a prediction, and print the result
    Predict(PredictArgs),
    /// List every input with its type, range, and hint
    Fields,
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
        Command::Predict(args) => run_predict(args).await,
        Command::Fields => {
            run_fields();
            Ok(())
        }
    }
}
