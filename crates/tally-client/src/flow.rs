//! The linear demonstration flow: fund the identity, allocate the record,
//! increment it, one awaited step at a time.
//!
//! Strictly sequential — no two network calls are ever in flight at once,
//! and the first failing step aborts the remainder with no partial-success
//! signaling.

use serde::Serialize;
use solana_program::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

use crate::constants::FUND_LAMPORTS;
use crate::counter_client::{CounterClient, CounterOp, CounterRequest, RoleBindings, SubmitLevel};
use crate::error::TallyResult;
use crate::funding;
use crate::rpc::ClusterRpc;
use crate::submit::SubmitOptions;

/// Lifecycle of the counter record across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMode {
    /// Generate a throwaway record keypair and allocate it with `create`.
    /// State is lost when the run ends.
    Fresh,
    /// Mutate an existing record at a fixed address; no `create` step.
    Reuse(Pubkey),
}

/// Which submission level each step uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPlan {
    Fixed(SubmitLevel),
    /// Rotate through instruction, transaction and direct across the steps,
    /// demonstrating their equivalence.
    CycleAll,
}

impl LevelPlan {
    fn level_for(self, step: usize) -> SubmitLevel {
        match self {
            Self::Fixed(level) => level,
            Self::CycleAll => {
                [SubmitLevel::Instruction, SubmitLevel::Transaction, SubmitLevel::Direct][step % 3]
            }
        }
    }
}

/// Configuration for one demonstration run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub record: RecordMode,
    pub increments: u32,
    pub level: LevelPlan,
    /// Skip funding when the identity already holds at least this much.
    pub min_balance: u64,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            record: RecordMode::Fresh,
            increments: 2,
            level: LevelPlan::Fixed(SubmitLevel::Direct),
            min_balance: FUND_LAMPORTS,
        }
    }
}

/// One confirmed step of a run.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: String,
    pub level: &'static str,
    pub signature: String,
}

/// Everything a run did, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub identity: String,
    pub record: String,
    /// Post-funding balance in lamports; `None` when funding was skipped.
    pub funded_balance: Option<u64>,
    pub steps: Vec<StepReport>,
}

/// Run the whole demonstration against `rpc`.
pub fn run_demo(
    rpc: &dyn ClusterRpc,
    identity: &Keypair,
    program_id: Pubkey,
    plan: &RunPlan,
    options: &SubmitOptions,
) -> TallyResult<RunReport> {
    let authority = identity.pubkey();
    let funded_balance =
        funding::fund_if_needed(rpc, &authority, plan.min_balance, FUND_LAMPORTS, options)?;

    let client = CounterClient::new(program_id, rpc);
    let mut steps = Vec::new();
    let mut step_index = 0usize;

    let record = match plan.record {
        RecordMode::Reuse(address) => address,
        RecordMode::Fresh => {
            let record_key = Keypair::new();
            let address = record_key.pubkey();
            let request = CounterRequest::new(
                CounterOp::Create,
                RoleBindings::for_create(address, authority),
                vec![address],
            )?;
            let level = plan.level.level_for(step_index);
            let signature = client.execute(&request, level, &[identity, &record_key], options)?;
            steps.push(StepReport {
                step: "create".to_string(),
                level: level.as_str(),
                signature: signature.to_string(),
            });
            step_index += 1;
            address
        }
    };

    for n in 1..=plan.increments {
        let request = CounterRequest::new(
            CounterOp::Increment,
            RoleBindings::for_increment(record, authority),
            Vec::new(),
        )?;
        let level = plan.level.level_for(step_index);
        let signature = client.execute(&request, level, &[identity], options)?;
        steps.push(StepReport {
            step: format!("increment {n}/{}", plan.increments),
            level: level.as_str(),
            signature: signature.to_string(),
        });
        step_index += 1;
    }

    Ok(RunReport {
        identity: authority.to_string(),
        record: record.to_string(),
        funded_balance,
        steps,
    })
}
