use anyhow::Result;

use crate::args::{Cli, Command};

mod doctor;
mod identity;
mod run;

pub fn dispatch(cli: Cli) -> Result<()> {
    let Cli { env_file, cluster_url, command, .. } = cli;
    match command {
        Command::Run { record_address, increments, level, program_id } => run::run(
            &env_file,
            &cluster_url,
            record_address.as_deref(),
            increments,
            level,
            program_id.as_deref(),
        ),
        Command::Identity => identity::run(&env_file),
        Command::Doctor => doctor::run(&env_file, &cluster_url),
    }
}
