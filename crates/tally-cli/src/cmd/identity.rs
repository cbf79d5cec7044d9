use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use solana_sdk::signature::Signer;

use crate::io::signer;
use crate::output;

#[derive(Debug, Serialize)]
pub struct IdentityOut {
    pub ok: bool,
    pub address: String,
    pub created: bool,
    pub env_file: String,
}

pub fn run(env_file: &str) -> Result<()> {
    let (keypair, created) = signer::obtain_identity(Path::new(env_file))?;
    let out = IdentityOut {
        ok: true,
        address: keypair.pubkey().to_string(),
        created,
        env_file: env_file.to_string(),
    };

    if output::is_json() {
        return output::print_json(&out);
    }
    output::labeled("identity", &out.address)?;
    output::labeled("source", &format!("{} ({})", out.env_file, if created { "created" } else { "existing" }))?;
    Ok(())
}
