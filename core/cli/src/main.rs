use anyhow::Result;
use clap::Parser;
use distributor_cli::args::Args;
use distributor_cli::cli::Cli;

fn main() -> Result<()> {
    let args = Args::parse();
    let cli = Cli::new(args);

    // Create the tokio runtime and execute the cli
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(cli.exec())
}
