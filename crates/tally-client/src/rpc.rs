//! The cluster RPC seam.
//!
//! The workflow only ever needs five calls from the endpoint; they are
//! captured in [`ClusterRpc`] so tests can stand in an in-memory cluster and
//! assert on call counts. [`RpcGateway`] is the production adapter over the
//! blocking JSON-RPC client.

use solana_client::rpc_client::RpcClient;
use solana_program::pubkey::Pubkey;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use crate::error::TallyResult;

/// The endpoint surface this workflow depends on.
pub trait ClusterRpc {
    fn latest_blockhash(&self) -> TallyResult<Hash>;

    /// Send a fully signed transaction. One network attempt per call.
    fn send_transaction(&self, tx: &Transaction) -> TallyResult<Signature>;

    /// One confirmation probe: has `signature` reached finality yet?
    fn confirm_signature(&self, signature: &Signature) -> TallyResult<bool>;

    fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> TallyResult<Signature>;

    fn balance(&self, of: &Pubkey) -> TallyResult<u64>;
}

/// Blocking JSON-RPC adapter.
pub struct RpcGateway {
    client: RpcClient,
}

impl RpcGateway {
    /// Connect to `url` at confirmed commitment.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_commitment(url, CommitmentConfig::confirmed())
    }

    pub fn with_commitment(url: impl Into<String>, commitment: CommitmentConfig) -> Self {
        Self { client: RpcClient::new_with_commitment(url.into(), commitment) }
    }
}

impl ClusterRpc for RpcGateway {
    fn latest_blockhash(&self) -> TallyResult<Hash> {
        Ok(self.client.get_latest_blockhash()?)
    }

    fn send_transaction(&self, tx: &Transaction) -> TallyResult<Signature> {
        Ok(self.client.send_transaction(tx)?)
    }

    fn confirm_signature(&self, signature: &Signature) -> TallyResult<bool> {
        Ok(self.client.confirm_transaction(signature)?)
    }

    fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> TallyResult<Signature> {
        Ok(self.client.request_airdrop(to, lamports)?)
    }

    fn balance(&self, of: &Pubkey) -> TallyResult<u64> {
        Ok(self.client.get_balance(of)?)
    }
}
