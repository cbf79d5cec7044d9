//! Signing identity provisioning backed by the env file.

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use solana_sdk::signature::Keypair;

use tally_client::constants::SIGNER_KEY_ENV;
use tally_client::identity;

use crate::io::env_store::EnvStore;

/// Load the persisted signer, or generate and persist a new one.
///
/// A secret exported into the process environment wins over the env file.
/// Returns the keypair and whether it was created on this call; at most one
/// write to the env file happens per run, on the generate path.
pub fn obtain_identity(env_file: &Path) -> Result<(Keypair, bool)> {
    if let Ok(secret) = env::var(SIGNER_KEY_ENV) {
        return Ok((identity::decode_secret(&secret)?, false));
    }

    let mut store = EnvStore::load(env_file)?;
    if let Some(secret) = store.get(SIGNER_KEY_ENV) {
        return Ok((identity::decode_secret(secret)?, false));
    }

    let keypair = Keypair::new();
    store
        .upsert(SIGNER_KEY_ENV, &identity::encode_secret(&keypair))
        .with_context(|| format!("persisting signer key to {}", env_file.display()))?;
    Ok((keypair, true))
}
