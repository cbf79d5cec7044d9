use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use tally_client::constants::{COUNTER_PROGRAM_ID, SIGNER_KEY_ENV};
use tally_client::identity;

use crate::io::env_store::EnvStore;
use crate::output;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub checks: Vec<Check>,
}

/// Offline checks only; nothing here touches the network.
pub fn run(env_file: &str, cluster_url: &str) -> Result<()> {
    let mut checks = Vec::new();

    let store = EnvStore::load(Path::new(env_file))?;
    checks.push(match store.get(SIGNER_KEY_ENV) {
        Some(secret) => match identity::decode_secret(secret) {
            Ok(_) => Check {
                name: "signer-key".to_string(),
                ok: true,
                detail: format!("{SIGNER_KEY_ENV} decodes"),
            },
            Err(err) => Check { name: "signer-key".to_string(), ok: false, detail: err.to_string() },
        },
        None => Check {
            name: "signer-key".to_string(),
            ok: true,
            detail: format!("absent; `tally run` will generate one into {env_file}"),
        },
    });

    checks.push(match url::Url::parse(cluster_url) {
        Ok(_) => Check { name: "cluster-url".to_string(), ok: true, detail: cluster_url.to_string() },
        Err(err) => Check { name: "cluster-url".to_string(), ok: false, detail: err.to_string() },
    });

    checks.push(match COUNTER_PROGRAM_ID.parse::<Pubkey>() {
        Ok(_) => Check {
            name: "program-id".to_string(),
            ok: true,
            detail: COUNTER_PROGRAM_ID.to_string(),
        },
        Err(err) => Check { name: "program-id".to_string(), ok: false, detail: err.to_string() },
    });

    let ok = checks.iter().all(|check| check.ok);
    if output::is_json() {
        output::print_json(&DoctorOut { ok, checks })?;
    } else {
        for check in &checks {
            let status = if check.ok { "ok" } else { "FAIL" };
            output::labeled(&check.name, &format!("{status}: {}", check.detail))?;
        }
    }

    if ok {
        Ok(())
    } else {
        Err(anyhow!("doctor found problems"))
    }
}
