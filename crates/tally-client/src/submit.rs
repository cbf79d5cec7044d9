//! Transaction submission and finality confirmation.
//!
//! One network attempt per call: transient failures surface to the caller
//! instead of being retried here. The caller decides whether to re-run a
//! whole logical step.

use std::thread;
use std::time::{Duration, Instant};

use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;

use crate::counter_client::Payload;
use crate::error::{TallyError, TallyResult};
use crate::rpc::ClusterRpc;

/// Tunables for one submission attempt.
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// How long to wait for finality before giving up.
    pub confirm_timeout: Duration,
    /// Pause between confirmation probes.
    pub poll_interval: Duration,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            confirm_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Attach the signer set to an unsigned payload, send it once, and block
/// until the cluster confirms it.
///
/// Direct-level payloads are submitted when built and are rejected here.
pub fn submit(
    rpc: &dyn ClusterRpc,
    payload: Payload,
    payer: &Keypair,
    co_signers: &[&Keypair],
    options: &SubmitOptions,
) -> TallyResult<Signature> {
    let mut tx = match payload {
        Payload::Instruction(ix) => Transaction::new_with_payer(&[ix], Some(&payer.pubkey())),
        Payload::Transaction(tx) => tx,
        Payload::Confirmed { .. } => {
            return Err(TallyError::construction("direct payloads are submitted when built"));
        }
    };

    let mut keyring: Vec<&Keypair> = Vec::with_capacity(co_signers.len() + 1);
    keyring.push(payer);
    keyring.extend_from_slice(co_signers);
    let signing = required_signers(&tx, &keyring)?;

    let blockhash = rpc.latest_blockhash()?;
    tx.try_sign(&signing, blockhash)
        .map_err(|err| TallyError::construction(format!("signing failed: {err}")))?;

    let signature = rpc.send_transaction(&tx)?;
    confirm(rpc, &signature, options)?;
    Ok(signature)
}

/// Poll until the cluster reports finality for `signature` or the deadline
/// passes.
pub fn confirm(
    rpc: &dyn ClusterRpc,
    signature: &Signature,
    options: &SubmitOptions,
) -> TallyResult<()> {
    let deadline = Instant::now() + options.confirm_timeout;
    loop {
        if rpc.confirm_signature(signature)? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(TallyError::network(format!(
                "confirmation for {signature} did not arrive within {:?}",
                options.confirm_timeout
            )));
        }
        thread::sleep(options.poll_interval);
    }
}

/// Resolve the message's required signer keys against the provided keypairs,
/// in message order. A missing key fails before anything reaches the network.
fn required_signers<'k>(
    tx: &Transaction,
    keyring: &[&'k Keypair],
) -> TallyResult<Vec<&'k Keypair>> {
    let message = &tx.message;
    let required = message.header.num_required_signatures as usize;
    let mut out = Vec::with_capacity(required);
    for key in message.account_keys.iter().take(required) {
        let keypair = keyring
            .iter()
            .find(|keypair| keypair.pubkey() == *key)
            .ok_or_else(|| {
                TallyError::construction(format!("missing keypair for required signer {key}"))
            })?;
        out.push(*keypair);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::cell::Cell;

    use solana_program::pubkey::Pubkey;
    use solana_sdk::hash::Hash;

    use crate::counter_client::{CounterOp, CounterRequest, Payload, RoleBindings, SubmitLevel};
    use crate::counter_client::CounterClient;
    use crate::constants::counter_program_id;

    /// Accepts sends but never reports finality.
    #[derive(Default)]
    struct Pending {
        sends: Cell<u32>,
    }

    impl ClusterRpc for Pending {
        fn latest_blockhash(&self) -> TallyResult<Hash> {
            Ok(Hash::default())
        }
        fn send_transaction(&self, _tx: &Transaction) -> TallyResult<Signature> {
            self.sends.set(self.sends.get() + 1);
            Ok(Signature::from([7u8; 64]))
        }
        fn confirm_signature(&self, _signature: &Signature) -> TallyResult<bool> {
            Ok(false)
        }
        fn request_airdrop(&self, _to: &Pubkey, _lamports: u64) -> TallyResult<Signature> {
            Ok(Signature::from([8u8; 64]))
        }
        fn balance(&self, _of: &Pubkey) -> TallyResult<u64> {
            Ok(0)
        }
    }

    fn fast_options() -> SubmitOptions {
        SubmitOptions {
            confirm_timeout: Duration::from_millis(20),
            poll_interval: Duration::from_millis(1),
        }
    }

    #[test]
    fn confirmation_deadline_is_a_network_error() {
        let rpc = Pending::default();
        let err = confirm(&rpc, &Signature::from([7u8; 64]), &fast_options()).unwrap_err();
        assert_matches!(err, TallyError::Network { .. });
    }

    #[test]
    fn already_confirmed_payloads_are_rejected() {
        let rpc = Pending::default();
        let payer = Keypair::new();
        let payload = Payload::Confirmed { signature: Signature::from([7u8; 64]) };
        let err = submit(&rpc, payload, &payer, &[], &fast_options()).unwrap_err();
        assert_matches!(err, TallyError::Construction { .. });
        assert_eq!(rpc.sends.get(), 0);
    }

    #[test]
    fn missing_co_signer_fails_before_any_send() {
        let rpc = Pending::default();
        let authority = Keypair::new();
        let record = Keypair::new();
        let request = CounterRequest::new(
            CounterOp::Create,
            RoleBindings::for_create(record.pubkey(), authority.pubkey()),
            vec![record.pubkey()],
        )
        .unwrap();
        let client = CounterClient::new(counter_program_id(), &rpc);
        let payload = client
            .build(&request, SubmitLevel::Instruction, &[], &fast_options())
            .unwrap();

        // Record keypair withheld: the message still requires its signature.
        let err = submit(&rpc, payload, &authority, &[], &fast_options()).unwrap_err();
        assert_matches!(err, TallyError::Construction { .. });
        assert_eq!(rpc.sends.get(), 0);
    }

    #[test]
    fn single_send_even_when_confirmation_times_out() {
        let rpc = Pending::default();
        let authority = Keypair::new();
        let record = Keypair::new();
        let request = CounterRequest::new(
            CounterOp::Create,
            RoleBindings::for_create(record.pubkey(), authority.pubkey()),
            vec![record.pubkey()],
        )
        .unwrap();
        let client = CounterClient::new(counter_program_id(), &rpc);
        let payload = client
            .build(&request, SubmitLevel::Instruction, &[], &fast_options())
            .unwrap();

        let err = submit(&rpc, payload, &authority, &[&record], &fast_options()).unwrap_err();
        assert_matches!(err, TallyError::Network { .. });
        assert_eq!(rpc.sends.get(), 1);
    }
}
