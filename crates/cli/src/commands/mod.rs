mod extract;
mod frames;

use crate::cli::{Cli, Commands};

pub async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let output = match cli.command {
        Commands::Extract(args) => extract::run(args, cli.quiet).await?,
        Commands::Frames(args) => frames::run(args)?,
    };
    println!("{output}");
    Ok(())
}
