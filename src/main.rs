use anyhow::Result;
use clap::Parser;
use impensa::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    impensa::init_tracing(cli.verbose);
    cli.run()
}
