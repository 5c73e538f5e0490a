use anyhow::Context;
use clap::Parser;
use tdl_cli::Cli;
use tdl_logger::Logger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = tdl_cli::settings(&cli).context("Critical: Configuration is malformed")?;

    let _log = Logger::builder().from_config(&config.logging)?.name(env!("CARGO_BIN_NAME")).init()?;

    let mut stdout = std::io::stdout().lock();
    tdl_cli::run(cli.command, &config, &mut stdout).await
}
