use clap::Parser;

mod args;
mod commands;
mod logging;

use args::Cli;
use commands::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, cli.log_dir.as_deref());

    // Build the clients once and pass them down explicitly
    let app = App::from_env(cli.verbose)?;
    tracing::debug!(base_url = %app.rock.client().config().base_url, "rock API ready");

    let output = commands::run(&app, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
