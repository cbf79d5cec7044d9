use anyhow::Result;
use clap::Parser;

mod args;
mod cmd;
mod io;
mod output;

fn main() -> Result<()> {
    let cli = args::Cli::parse();
    output::init(cli.json);

    // Mirror of the classic dotenv bootstrap: entries from the env file
    // become process env, where an operator-exported secret also lands.
    dotenv::from_path(&cli.env_file).ok();

    cmd::dispatch(cli)
}
