use clap::{Parser, Subcommand, ValueEnum};

use tally_client::{LevelPlan, SubmitLevel, DEVNET_RPC_URL};

#[derive(Parser, Debug, Clone)]
#[command(name = "tally", version, about = "Devnet counter demonstration client")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Env file holding the persisted signer secret (default: .env)
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: String,

    /// Cluster RPC endpoint.
    #[arg(long, global = true, default_value = DEVNET_RPC_URL)]
    pub cluster_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the full demonstration: fund the identity, create a counter
    /// record, increment it.
    Run {
        /// Reuse an existing record at this address instead of creating a
        /// fresh one (skips the create step).
        #[arg(long)]
        record_address: Option<String>,

        /// Number of increment steps.
        #[arg(long, default_value_t = 2)]
        increments: u32,

        /// Submission level for each step.
        #[arg(long, value_enum, default_value_t = LevelArg::Direct)]
        level: LevelArg,

        /// Override the counter program id.
        #[arg(long)]
        program_id: Option<String>,
    },

    /// Print the configured signing identity, creating one if absent.
    Identity,

    /// Run offline environment checks.
    Doctor,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LevelArg {
    Instruction,
    Transaction,
    Direct,
    /// Rotate through all three levels across the steps.
    All,
}

impl LevelArg {
    pub fn into_plan(self) -> LevelPlan {
        match self {
            Self::Instruction => LevelPlan::Fixed(SubmitLevel::Instruction),
            Self::Transaction => LevelPlan::Fixed(SubmitLevel::Transaction),
            Self::Direct => LevelPlan::Fixed(SubmitLevel::Direct),
            Self::All => LevelPlan::CycleAll,
        }
    }
}
