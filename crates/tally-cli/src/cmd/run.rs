use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Serialize;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;

use tally_client::{
    counter_program_id, run_demo, RecordMode, RpcGateway, RunPlan, RunReport, SubmitOptions,
    FUND_LAMPORTS,
};

use crate::args::LevelArg;
use crate::io::signer;
use crate::output;

#[derive(Debug, Serialize)]
pub struct RunOut {
    pub ok: bool,
    pub cluster: String,
    #[serde(flatten)]
    pub report: RunReport,
}

pub fn run(
    env_file: &str,
    cluster_url: &str,
    record_address: Option<&str>,
    increments: u32,
    level: LevelArg,
    program_id: Option<&str>,
) -> Result<()> {
    let (identity, created) = signer::obtain_identity(Path::new(env_file))?;
    if created {
        output::note(&format!("generated a new signing identity into {env_file}"));
    }

    let program_id: Pubkey = match program_id {
        Some(text) => text.parse().map_err(|_| anyhow!("invalid program id: {text}"))?,
        None => counter_program_id(),
    };
    let record = match record_address {
        Some(text) => {
            RecordMode::Reuse(text.parse().map_err(|_| anyhow!("invalid record address: {text}"))?)
        }
        None => RecordMode::Fresh,
    };

    let plan = RunPlan {
        record,
        increments,
        level: level.into_plan(),
        min_balance: FUND_LAMPORTS,
    };
    let rpc = RpcGateway::new(cluster_url);
    let report = run_demo(&rpc, &identity, program_id, &plan, &SubmitOptions::default())?;

    if output::is_json() {
        return output::print_json(&RunOut {
            ok: true,
            cluster: cluster_url.to_string(),
            report,
        });
    }

    output::labeled("identity", &report.identity)?;
    match report.funded_balance {
        Some(lamports) => output::labeled(
            "funded",
            &format!("{:.9} SOL", lamports as f64 / LAMPORTS_PER_SOL as f64),
        )?,
        None => output::labeled("funded", "skipped (balance sufficient)")?,
    }
    let mode = match plan.record {
        RecordMode::Fresh => "fresh",
        RecordMode::Reuse(_) => "reused",
    };
    output::labeled("record", &format!("{} ({mode})", report.record))?;
    for step in &report.steps {
        output::labeled(
            &step.step,
            &format!("[{}] {}", step.level, explorer_url(cluster_url, &step.signature)),
        )?;
    }
    output::labeled("done", &format!("{} step(s) confirmed", report.steps.len()))?;
    Ok(())
}

fn explorer_url(cluster_url: &str, signature: &str) -> String {
    if cluster_url.contains("devnet") {
        format!("https://explorer.solana.com/tx/{signature}?cluster=devnet")
    } else if cluster_url.contains("testnet") {
        format!("https://explorer.solana.com/tx/{signature}?cluster=testnet")
    } else {
        format!("https://explorer.solana.com/tx/{signature}")
    }
}
