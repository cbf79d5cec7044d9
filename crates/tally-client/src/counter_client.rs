//! Client for the on-chain counter program.
//!
//! This client can:
//! - validate role bindings and co-signer sets for the program's operations
//! - build bare instructions
//! - wrap them into unsigned transaction containers
//! - sign, submit and confirm in one call (the direct level)
//!
//! The three output levels are semantically equivalent: for a given request
//! they compile to the identical instruction, so a finalized submission at
//! any level causes the same state transition.

use sha2::{Digest, Sha256};
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;
use solana_program::system_program;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;

use crate::error::{TallyError, TallyResult};
use crate::rpc::ClusterRpc;
use crate::submit::{self, SubmitOptions};

/// Named operations exposed by the counter program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterOp {
    Create,
    Increment,
}

impl CounterOp {
    /// The method name the program dispatches on.
    pub fn method_name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Increment => "increment",
        }
    }
}

/// Mapping from the program's logical account roles to concrete addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleBindings {
    /// The mutable counter record.
    pub record: Pubkey,
    /// The wallet mutating the record and paying fees.
    pub authority: Pubkey,
    /// The system allocator, required by `create` only.
    pub system: Option<Pubkey>,
}

impl RoleBindings {
    pub fn for_create(record: Pubkey, authority: Pubkey) -> Self {
        Self { record, authority, system: Some(system_program::id()) }
    }

    pub fn for_increment(record: Pubkey, authority: Pubkey) -> Self {
        Self { record, authority, system: None }
    }
}

/// A validated request against the counter program. Immutable once built.
///
/// `create` allocates the record account on-chain, so the record must prove
/// ownership of its own keypair by co-signing. `increment` mutates an
/// existing record under its authority and the record must never co-sign.
#[derive(Debug, Clone)]
pub struct CounterRequest {
    op: CounterOp,
    bindings: RoleBindings,
    co_signers: Vec<Pubkey>,
}

impl CounterRequest {
    pub fn new(op: CounterOp, bindings: RoleBindings, co_signers: Vec<Pubkey>) -> TallyResult<Self> {
        match op {
            CounterOp::Create => {
                if bindings.system.is_none() {
                    return Err(TallyError::construction(
                        "create requires a system-allocator binding",
                    ));
                }
                if !co_signers.contains(&bindings.record) {
                    return Err(TallyError::construction(
                        "create requires the record keypair as co-signer",
                    ));
                }
            }
            CounterOp::Increment => {
                if bindings.system.is_some() {
                    return Err(TallyError::construction(
                        "increment takes no system-allocator binding",
                    ));
                }
                if co_signers.contains(&bindings.record) {
                    return Err(TallyError::construction(
                        "increment must not be co-signed by the record",
                    ));
                }
            }
        }
        Ok(Self { op, bindings, co_signers })
    }

    pub fn op(&self) -> CounterOp {
        self.op
    }

    pub fn bindings(&self) -> &RoleBindings {
        &self.bindings
    }

    pub fn co_signers(&self) -> &[Pubkey] {
        &self.co_signers
    }
}

/// Output shape of the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitLevel {
    /// Bare operation descriptor, unsigned and uncombined.
    Instruction,
    /// Submittable container, still missing signatures.
    Transaction,
    /// Built, signed, submitted and confirmed in one call.
    Direct,
}

impl SubmitLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instruction => "instruction",
            Self::Transaction => "transaction",
            Self::Direct => "direct",
        }
    }
}

/// A request realized at one of the three levels.
#[derive(Debug)]
pub enum Payload {
    Instruction(Instruction),
    Transaction(Transaction),
    /// Already submitted and confirmed (direct level only).
    Confirmed { signature: Signature },
}

/// First 8 bytes of sha256 over the namespaced method name: the dispatch tag
/// the program expects at the front of the instruction data.
pub fn instruction_discriminator(method: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("global:{method}").as_bytes());
    let mut tag = [0u8; 8];
    tag.copy_from_slice(&digest[..8]);
    tag
}

pub struct CounterClient<'a> {
    program_id: Pubkey,
    rpc: &'a dyn ClusterRpc,
}

impl<'a> CounterClient<'a> {
    pub fn new(program_id: Pubkey, rpc: &'a dyn ClusterRpc) -> Self {
        Self { program_id, rpc }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn rpc(&self) -> &dyn ClusterRpc {
        self.rpc
    }

    /// Compile a request into the program's instruction encoding.
    ///
    /// Account order and flags must match the program's declared interface
    /// exactly or the endpoint rejects the submission.
    pub fn instruction(&self, request: &CounterRequest) -> Instruction {
        let bindings = request.bindings();
        let accounts = match request.op() {
            CounterOp::Create => vec![
                AccountMeta::new(bindings.record, true),
                AccountMeta::new(bindings.authority, true),
                AccountMeta::new_readonly(
                    bindings.system.unwrap_or_else(system_program::id),
                    false,
                ),
            ],
            CounterOp::Increment => vec![
                AccountMeta::new(bindings.record, false),
                AccountMeta::new_readonly(bindings.authority, true),
            ],
        };
        Instruction {
            program_id: self.program_id,
            accounts,
            data: instruction_discriminator(request.op().method_name()).to_vec(),
        }
    }

    /// Realize a request at the chosen level.
    ///
    /// `signers` is consulted only at the direct level, which signs and
    /// submits internally; the other levels return unsigned shapes for
    /// [`submit::submit`].
    pub fn build(
        &self,
        request: &CounterRequest,
        level: SubmitLevel,
        signers: &[&Keypair],
        options: &SubmitOptions,
    ) -> TallyResult<Payload> {
        let ix = self.instruction(request);
        match level {
            SubmitLevel::Instruction => Ok(Payload::Instruction(ix)),
            SubmitLevel::Transaction => Ok(Payload::Transaction(Transaction::new_with_payer(
                &[ix],
                Some(&request.bindings().authority),
            ))),
            SubmitLevel::Direct => {
                let (payer, co_signers) = split_signers(request, signers)?;
                let signature =
                    submit::submit(self.rpc, Payload::Instruction(ix), payer, &co_signers, options)?;
                Ok(Payload::Confirmed { signature })
            }
        }
    }

    /// Build at the chosen level and carry the request through to a confirmed
    /// signature. The outcome is equivalent across all three levels.
    pub fn execute(
        &self,
        request: &CounterRequest,
        level: SubmitLevel,
        signers: &[&Keypair],
        options: &SubmitOptions,
    ) -> TallyResult<Signature> {
        match self.build(request, level, signers, options)? {
            Payload::Confirmed { signature } => Ok(signature),
            payload => {
                let (payer, co_signers) = split_signers(request, signers)?;
                submit::submit(self.rpc, payload, payer, &co_signers, options)
            }
        }
    }
}

/// Partition the caller's keypairs into the fee-paying authority and the
/// request's co-signers, checking every required co-signer is present.
fn split_signers<'k>(
    request: &CounterRequest,
    signers: &[&'k Keypair],
) -> TallyResult<(&'k Keypair, Vec<&'k Keypair>)> {
    let authority = request.bindings().authority;
    let payer = signers
        .iter()
        .find(|keypair| keypair.pubkey() == authority)
        .ok_or_else(|| TallyError::construction("no keypair provided for the authority role"))?;
    let mut co_signers = Vec::new();
    for want in request.co_signers() {
        if *want == authority {
            continue;
        }
        let keypair = signers
            .iter()
            .find(|keypair| keypair.pubkey() == *want)
            .ok_or_else(|| {
                TallyError::construction(format!("missing keypair for required co-signer {want}"))
            })?;
        co_signers.push(*keypair);
    }
    Ok((*payer, co_signers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use solana_sdk::signature::keypair_from_seed;

    use crate::constants::counter_program_id;
    use crate::error::TallyError;
    use crate::rpc::ClusterRpc;
    use solana_sdk::hash::Hash;

    /// Refuses every call; unsigned levels must never touch the network.
    struct Offline;

    impl ClusterRpc for Offline {
        fn latest_blockhash(&self) -> TallyResult<Hash> {
            Err(TallyError::network("offline"))
        }
        fn send_transaction(&self, _tx: &Transaction) -> TallyResult<Signature> {
            Err(TallyError::network("offline"))
        }
        fn confirm_signature(&self, _signature: &Signature) -> TallyResult<bool> {
            Err(TallyError::network("offline"))
        }
        fn request_airdrop(&self, _to: &Pubkey, _lamports: u64) -> TallyResult<Signature> {
            Err(TallyError::network("offline"))
        }
        fn balance(&self, _of: &Pubkey) -> TallyResult<u64> {
            Err(TallyError::network("offline"))
        }
    }

    fn keys() -> (Pubkey, Pubkey) {
        (Keypair::new().pubkey(), Keypair::new().pubkey())
    }

    #[test]
    fn discriminators_match_the_program_abi() {
        assert_eq!(instruction_discriminator("create"), [24, 30, 200, 40, 5, 28, 7, 119]);
        assert_eq!(instruction_discriminator("increment"), [11, 18, 104, 9, 104, 174, 59, 33]);
    }

    #[test]
    fn create_requires_the_record_as_co_signer() {
        let (record, authority) = keys();
        let err = CounterRequest::new(
            CounterOp::Create,
            RoleBindings::for_create(record, authority),
            Vec::new(),
        )
        .unwrap_err();
        assert_matches!(err, TallyError::Construction { .. });
    }

    #[test]
    fn create_requires_a_system_binding() {
        let (record, authority) = keys();
        let bindings = RoleBindings { record, authority, system: None };
        let err = CounterRequest::new(CounterOp::Create, bindings, vec![record]).unwrap_err();
        assert_matches!(err, TallyError::Construction { .. });
    }

    #[test]
    fn increment_rejects_the_record_as_co_signer() {
        let (record, authority) = keys();
        let err = CounterRequest::new(
            CounterOp::Increment,
            RoleBindings::for_increment(record, authority),
            vec![record],
        )
        .unwrap_err();
        assert_matches!(err, TallyError::Construction { .. });
    }

    #[test]
    fn increment_rejects_a_system_binding() {
        let (record, authority) = keys();
        let bindings = RoleBindings { record, authority, system: Some(system_program::id()) };
        let err = CounterRequest::new(CounterOp::Increment, bindings, Vec::new()).unwrap_err();
        assert_matches!(err, TallyError::Construction { .. });
    }

    #[test]
    fn create_instruction_has_the_declared_account_layout() {
        let (record, authority) = keys();
        let request = CounterRequest::new(
            CounterOp::Create,
            RoleBindings::for_create(record, authority),
            vec![record],
        )
        .unwrap();
        let rpc = Offline;
        let ix = CounterClient::new(counter_program_id(), &rpc).instruction(&request);

        assert_eq!(ix.program_id, counter_program_id());
        assert_eq!(ix.data, instruction_discriminator("create").to_vec());
        assert_eq!(ix.accounts.len(), 3);
        assert_eq!((ix.accounts[0].pubkey, ix.accounts[0].is_signer, ix.accounts[0].is_writable), (record, true, true));
        assert_eq!((ix.accounts[1].pubkey, ix.accounts[1].is_signer, ix.accounts[1].is_writable), (authority, true, true));
        assert_eq!((ix.accounts[2].pubkey, ix.accounts[2].is_signer, ix.accounts[2].is_writable), (system_program::id(), false, false));
    }

    #[test]
    fn increment_instruction_has_the_declared_account_layout() {
        let (record, authority) = keys();
        let request = CounterRequest::new(
            CounterOp::Increment,
            RoleBindings::for_increment(record, authority),
            Vec::new(),
        )
        .unwrap();
        let rpc = Offline;
        let ix = CounterClient::new(counter_program_id(), &rpc).instruction(&request);

        assert_eq!(ix.data, instruction_discriminator("increment").to_vec());
        assert_eq!(ix.accounts.len(), 2);
        assert_eq!((ix.accounts[0].pubkey, ix.accounts[0].is_signer, ix.accounts[0].is_writable), (record, false, true));
        assert_eq!((ix.accounts[1].pubkey, ix.accounts[1].is_signer, ix.accounts[1].is_writable), (authority, true, false));
    }

    proptest! {
        /// The transaction level wraps exactly the instruction-level output,
        /// with the authority recorded as fee payer.
        #[test]
        fn unsigned_levels_compile_the_same_request(
            seed_a in any::<[u8; 32]>(),
            seed_b in any::<[u8; 32]>(),
        ) {
            let record = keypair_from_seed(&seed_a).unwrap().pubkey();
            let authority = keypair_from_seed(&seed_b).unwrap().pubkey();
            let request = CounterRequest::new(
                CounterOp::Create,
                RoleBindings::for_create(record, authority),
                vec![record],
            )
            .unwrap();
            let rpc = Offline;
            let client = CounterClient::new(counter_program_id(), &rpc);
            let options = SubmitOptions::default();

            let ix = match client.build(&request, SubmitLevel::Instruction, &[], &options).unwrap() {
                Payload::Instruction(ix) => ix,
                other => panic!("unexpected payload: {other:?}"),
            };
            let tx = match client.build(&request, SubmitLevel::Transaction, &[], &options).unwrap() {
                Payload::Transaction(tx) => tx,
                other => panic!("unexpected payload: {other:?}"),
            };

            prop_assert_eq!(tx.message.instructions.len(), 1);
            let expected = Transaction::new_with_payer(&[ix], Some(&authority));
            prop_assert_eq!(tx, expected);
        }
    }
}
