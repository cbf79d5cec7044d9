//! Test-network funding for a signing identity.

use solana_program::pubkey::Pubkey;

use crate::error::TallyResult;
use crate::rpc::ClusterRpc;
use crate::submit::{self, SubmitOptions};

/// Request `lamports` for `identity` and block until the airdrop is final.
///
/// Single attempt; a denied airdrop or confirmation timeout is fatal.
/// Returns the balance observed afterwards. That read is for display only,
/// so a failed read reports zero rather than failing the run.
pub fn fund(
    rpc: &dyn ClusterRpc,
    identity: &Pubkey,
    lamports: u64,
    options: &SubmitOptions,
) -> TallyResult<u64> {
    let signature = rpc.request_airdrop(identity, lamports)?;
    submit::confirm(rpc, &signature, options)?;
    Ok(rpc.balance(identity).unwrap_or(0))
}

/// Fund only when the identity's balance is below `min_lamports` or cannot
/// be read. Returns the post-funding balance, or `None` when funding was
/// skipped.
pub fn fund_if_needed(
    rpc: &dyn ClusterRpc,
    identity: &Pubkey,
    min_lamports: u64,
    lamports: u64,
    options: &SubmitOptions,
) -> TallyResult<Option<u64>> {
    match rpc.balance(identity) {
        Ok(balance) if balance >= min_lamports => Ok(None),
        _ => fund(rpc, identity, lamports, options).map(Some),
    }
}
