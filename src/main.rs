use clap::Parser;
use miette::Result;
use mapstyle::cli::{Cli, Commands};
use mapstyle::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Convert(args) => mapstyle::cli::convert::run(args, &printer)?,
        Commands::Check(args) => mapstyle::cli::check::run(args, &printer)?,
        Commands::Tree(args) => mapstyle::cli::tree::run(args, &printer)?,
        Commands::Completions(args) => mapstyle::cli::completions::run(args)?,
    }

    Ok(())
}
