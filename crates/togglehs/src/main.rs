use std::process::ExitCode;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = togglehs::ui::cli::Cli::parse();
    togglehs::init(cli.verbose);

    togglehs::ui::cli::run(cli).await
}
