mod cli;
mod dispatch;

use crate::cli::{Cli, Command};
use crate::dispatch::Response;
use clap::Parser;
use mdbridge_config::Settings;
use mdbridge_library::ConvertRequest;
use miette::IntoDiagnostic;
use std::process::ExitCode;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let settings = Settings::load(cli.config.as_deref()).map_err(|err| miette::miette!("{err:?}"))?;
    let response = match cli.command {
        Command::Discover { folder } => Response::Discover(dispatch::discover(folder, &settings).await),
        Command::Convert { output_dir, files } => {
            let output_dir = output_dir.filter(|dir| !dir.as_os_str().is_empty());
            Response::Convert(dispatch::convert(&ConvertRequest { files, output_dir }, &settings).await)
        },
        Command::Handle { message_type } => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await.into_diagnostic()?;
            dispatch::handle(&message_type, &raw, &settings).await
        },
    };

    println!("{}", serde_json::to_string_pretty(&response).into_diagnostic()?);
    Ok(if response.success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Logs go to stderr so stdout carries nothing but the JSON response.
/// `RUST_LOG` takes precedence over `-v`/`-q`.
fn init_tracing(cli: &Cli) -> miette::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(format!("mdbridge={}", cli.log_level()).parse().into_diagnostic()?)
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .into_diagnostic()
}
